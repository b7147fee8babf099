use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer};

use crate::biome::Biome;
use crate::trail_types::Trail;

/// Slider maximum; a maximum at this value means "no upper bound".
pub const OPEN_ENDED_MAX_KM: f64 = 50.0;

/// Criteria for the trail list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailFilter {
    /// Case-insensitive text matched against name, description and author
    #[serde(default)]
    pub query: Option<String>,

    /// Required dominant biome; blank means any
    #[serde(default, deserialize_with = "optional_biome")]
    pub biome: Option<Biome>,

    #[serde(default)]
    pub min_length_km: Option<f64>,

    /// Upper bound, ignored at 50 km or above
    #[serde(default)]
    pub max_length_km: Option<f64>,
}

impl TrailFilter {
    pub fn matches(&self, trail: &Trail) -> bool {
        self.matches_query(trail) && self.matches_biome(trail) && self.matches_length(trail)
    }

    fn matches_query(&self, trail: &Trail) -> bool {
        let query = match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };

        let author = trail
            .created_by
            .as_ref()
            .and_then(|c| c.full_name.as_deref());

        [Some(trail.name.as_str()), trail.description.as_deref(), author]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&query))
    }

    fn matches_biome(&self, trail: &Trail) -> bool {
        match self.biome {
            None => true,
            Some(biome) => trail.biomes.as_ref().and_then(|b| b.dominant) == Some(biome),
        }
    }

    fn matches_length(&self, trail: &Trail) -> bool {
        let length = trail.length_km.unwrap_or(0.0);
        let above_min = self.min_length_km.is_none_or(|min| length >= min);
        let below_max = match self.max_length_km {
            Some(max) if max < OPEN_ENDED_MAX_KM => length <= max,
            _ => true,
        };
        above_min && below_max
    }
}

fn optional_biome<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Biome>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(name) if !name.trim().is_empty() => {
            Biome::deserialize(name.trim().into_deserializer()).map(Some)
        }
        _ => Ok(None),
    }
}

/// Newest trails first, then keep the ones matching `filter`.
pub fn filter_trails(mut trails: Vec<Trail>, filter: &TrailFilter) -> Vec<Trail> {
    // ISO-8601 timestamps order lexically; `None` sorts last.
    trails.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    trails.retain(|t| filter.matches(t));
    trails
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trails() -> Vec<Trail> {
        serde_json::from_str(
            r#"[
                {
                    "id": 1, "name": "Ošterc Loop", "description": "Forest walk",
                    "lengthKm": 6.4, "createdAt": "2025-03-01T10:00:00",
                    "createdBy": {"fullName": "Ana Horvat"},
                    "biomes": {"dominantBiome": "listopadna"}
                },
                {
                    "id": 2, "name": "Sava Riverside", "description": null,
                    "lengthKm": 18.0, "createdAt": "2025-05-12T08:30:00",
                    "biomes": {"dominantBiome": "livade"}
                },
                {
                    "id": 3, "name": "Velebit Traverse", "description": "Long ridge",
                    "lengthKm": 72.5, "createdAt": "2024-11-20T07:00:00",
                    "createdBy": {"fullName": "Marko Kovač"}
                }
            ]"#,
        )
        .unwrap()
    }

    fn ids(trails: &[Trail]) -> Vec<i64> {
        trails
            .iter()
            .map(|t| t.extra["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_default_filter_sorts_newest_first() {
        let result = filter_trails(trails(), &TrailFilter::default());
        assert_eq!(ids(&result), vec![2, 1, 3]);
    }

    #[test]
    fn test_query_matches_name_description_and_author() {
        let by_name = TrailFilter {
            query: Some("sava".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_trails(trails(), &by_name)), vec![2]);

        let by_description = TrailFilter {
            query: Some("RIDGE".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_trails(trails(), &by_description)), vec![3]);

        let by_author = TrailFilter {
            query: Some("horvat".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_trails(trails(), &by_author)), vec![1]);

        let blank = TrailFilter {
            query: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter_trails(trails(), &blank).len(), 3);
    }

    #[test]
    fn test_biome_filter() {
        let filter = TrailFilter {
            biome: Some(Biome::Deciduous),
            ..Default::default()
        };
        assert_eq!(ids(&filter_trails(trails(), &filter)), vec![1]);
    }

    #[test]
    fn test_length_range() {
        let filter = TrailFilter {
            min_length_km: Some(5.0),
            max_length_km: Some(20.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_trails(trails(), &filter)), vec![2, 1]);

        let open_ended = TrailFilter {
            min_length_km: Some(10.0),
            max_length_km: Some(50.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter_trails(trails(), &open_ended)), vec![2, 3]);
    }

    #[test]
    fn test_filter_from_json() {
        let filter: TrailFilter =
            serde_json::from_str(r#"{"query": "loop", "biome": "listopadna", "maxLengthKm": 10}"#)
                .unwrap();
        assert_eq!(filter.biome, Some(Biome::Deciduous));
        assert_eq!(ids(&filter_trails(trails(), &filter)), vec![1]);
    }

    #[test]
    fn test_blank_biome_means_all() {
        let filter: TrailFilter = serde_json::from_str(
            r#"{"query": "", "biome": "", "minLengthKm": 0, "maxLengthKm": 50}"#,
        )
        .unwrap();
        assert_eq!(filter.biome, None);
        assert_eq!(ids(&filter_trails(trails(), &filter)), vec![2, 1, 3]);

        let filter: TrailFilter = serde_json::from_str(r#"{"biome": null}"#).unwrap();
        assert_eq!(filter.biome, None);
    }
}
