use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::biome::BiomeComposition;
use crate::error::TrailStatsError;

/// A `[lng, lat]` or `[lng, lat, ele]` position as produced by the routing service.
///
/// Anything that is not an array of numbers (`null`, `[15.1, 45.0, null]`, a
/// string) deserializes to an empty coordinate, so one bad point does not
/// reject the whole route; callers skip coordinates without a position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "Vec<f64>")]
pub struct Coordinate(pub Vec<f64>);

impl Coordinate {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self(vec![lng, lat])
    }

    pub fn with_elevation(lng: f64, lat: f64, ele: f64) -> Self {
        Self(vec![lng, lat, ele])
    }

    /// `(longitude, latitude)`, if the coordinate has both.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self.0.as_slice() {
            [lng, lat, ..] => Some((*lng, *lat)),
            _ => None,
        }
    }

    pub fn elevation(&self) -> Option<f64> {
        self.0.get(2).copied()
    }

    /// True iff the coordinate has exactly three components.
    pub fn is_3d(&self) -> bool {
        self.0.len() == 3
    }
}

impl From<JsonValue> for Coordinate {
    fn from(value: JsonValue) -> Self {
        let components: Option<Vec<f64>> = match value {
            JsonValue::Array(items) => items.iter().map(JsonValue::as_f64).collect(),
            _ => None,
        };
        Self(components.unwrap_or_default())
    }
}

impl From<Coordinate> for Vec<f64> {
    fn from(c: Coordinate) -> Self {
        c.0
    }
}

/// A route returned by the routing service, shaped like a GeoJSON Feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub geometry: Option<RouteGeometry>,
    #[serde(default)]
    pub properties: Option<RouteProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(default)]
    pub coordinates: Option<Vec<Coordinate>>,
}

/// Routing metadata. Distances are meters, time is seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProperties {
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub total_time: Option<f64>,
    #[serde(default)]
    pub ascend: Option<f64>,
    #[serde(default)]
    pub descend: Option<f64>,
    #[serde(default)]
    pub instructions: Option<Vec<Instruction>>,
}

/// Per-instruction elevation figures reported by the routing service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(default)]
    pub ascend: Option<f64>,
    #[serde(default)]
    pub descend: Option<f64>,
}

impl Route {
    pub fn from_coordinates(coordinates: Vec<Coordinate>) -> Self {
        Self {
            geometry: Some(RouteGeometry {
                coordinates: Some(coordinates),
            }),
            properties: None,
        }
    }

    /// The route's coordinates, or `InvalidRoute` if there are none.
    pub fn coordinates(&self) -> Result<&[Coordinate], TrailStatsError> {
        match self.geometry.as_ref().and_then(|g| g.coordinates.as_deref()) {
            Some(coords) if !coords.is_empty() => Ok(coords),
            _ => Err(TrailStatsError::InvalidRoute),
        }
    }

    pub fn properties(&self) -> RouteProperties {
        self.properties.clone().unwrap_or_default()
    }
}

/// One persisted point of a trail. `order` is 1-based and contiguous.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub longitude: f64,
    pub latitude: f64,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Waypoint {
    pub fn has_elevation(&self) -> bool {
        self.elevation.is_some()
    }
}

/// A waypoint as received from the backend, before validation.
///
/// Fields of the wrong type read as missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaypointRecord {
    #[serde(default, deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub elevation: Option<f64>,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(JsonValue::deserialize(deserializer)?.as_f64())
}

fn lenient_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let order = lenient_number(deserializer)?
        .filter(|o| o.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(o));
    Ok(order.map(|o| o as u32))
}

impl WaypointRecord {
    /// `None` when longitude, latitude or order is missing.
    pub fn into_waypoint(self) -> Option<Waypoint> {
        Some(Waypoint {
            longitude: self.longitude?,
            latitude: self.latitude?,
            order: self.order?,
            elevation: self.elevation,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// User-entered fields of the save form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrailDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

/// Body of `POST /trails`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrailRequest {
    pub name: String,
    pub description: Option<String>,
    pub length_km: f64,
    pub height_km: f64,
    pub difficulty: Difficulty,
    pub waypoints: Vec<Waypoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailCreator {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// A trail as returned by the backend. Fields this crate does not use are
/// carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub length_km: Option<f64>,
    #[serde(default)]
    pub biomes: Option<BiomeComposition>,
    #[serde(default)]
    pub created_by: Option<TrailCreator>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_lenient() {
        let coords: Vec<Coordinate> =
            serde_json::from_str("[[15.0, 45.0, 120.5], null, [15.1]]").unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0].position(), Some((15.0, 45.0)));
        assert_eq!(coords[0].elevation(), Some(120.5));
        assert!(coords[0].is_3d());
        assert_eq!(coords[1].position(), None);
        assert_eq!(coords[2].position(), None);
    }

    #[test]
    fn test_coordinate_with_bad_component() {
        let coords: Vec<Coordinate> =
            serde_json::from_str(r#"[[15.1, 45.0, null], [15.2, "45.0"], "15.3,45.0", [15, 45]]"#)
                .unwrap();
        assert_eq!(coords[0].position(), None);
        assert_eq!(coords[1].position(), None);
        assert_eq!(coords[2].position(), None);
        assert_eq!(coords[3].position(), Some((15.0, 45.0)));
    }

    #[test]
    fn test_route_without_geometry_is_invalid() {
        let route: Route = serde_json::from_str("{}").unwrap();
        assert!(matches!(route.coordinates(), Err(TrailStatsError::InvalidRoute)));

        let route: Route = serde_json::from_str(r#"{"geometry": {"coordinates": []}}"#).unwrap();
        assert!(matches!(route.coordinates(), Err(TrailStatsError::InvalidRoute)));

        let route: Route = serde_json::from_str(r#"{"geometry": null}"#).unwrap();
        assert!(matches!(route.coordinates(), Err(TrailStatsError::InvalidRoute)));
    }

    #[test]
    fn test_route_properties() {
        let route: Route = serde_json::from_str(
            r#"{
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[15.0, 45.0]]},
                "properties": {"totalDistance": 1234.5, "totalTime": 900, "waypointCount": 2}
            }"#,
        )
        .unwrap();
        let props = route.properties();
        assert_eq!(props.total_distance, Some(1234.5));
        assert_eq!(props.total_time, Some(900.0));
        assert_eq!(props.ascend, None);
    }

    #[test]
    fn test_waypoint_elevation_omitted() {
        let wp = Waypoint {
            longitude: 15.0,
            latitude: 45.0,
            order: 1,
            elevation: None,
        };
        let json = serde_json::to_value(&wp).unwrap();
        assert!(json.get("elevation").is_none());
        assert_eq!(json["order"], 1);
    }

    #[test]
    fn test_waypoint_record_requires_position_and_order() {
        let records: Vec<WaypointRecord> = serde_json::from_str(
            r#"[
                {"longitude": 15.0, "latitude": 45.0, "order": 1, "elevation": null},
                {"latitude": 45.0, "order": 2},
                {"longitude": 15.0, "latitude": 45.0}
            ]"#,
        )
        .unwrap();
        let waypoints: Vec<Waypoint> = records
            .into_iter()
            .filter_map(WaypointRecord::into_waypoint)
            .collect();
        assert_eq!(waypoints.len(), 1);
        assert_eq!(waypoints[0].elevation, None);
    }

    #[test]
    fn test_waypoint_record_wrong_types_read_as_missing() {
        let records: Vec<WaypointRecord> = serde_json::from_str(
            r#"[
                {"longitude": "bad", "latitude": 45.0, "order": 1},
                {"longitude": 15.0, "latitude": 45.0, "order": 2.5},
                {"longitude": 15.0, "latitude": 45.0, "order": -1},
                {"longitude": 15.0, "latitude": 45.0, "order": 4, "elevation": "high"},
                {"longitude": 15.0, "latitude": 45.0, "order": 5.0, "elevation": 210.5}
            ]"#,
        )
        .unwrap();
        let waypoints: Vec<Waypoint> = records
            .into_iter()
            .filter_map(WaypointRecord::into_waypoint)
            .collect();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].order, 4);
        assert_eq!(waypoints[0].elevation, None);
        assert_eq!(waypoints[1].order, 5);
        assert_eq!(waypoints[1].elevation, Some(210.5));
    }

    #[test]
    fn test_difficulty_wire_format() {
        assert_eq!(serde_json::to_value(Difficulty::Medium).unwrap(), "MEDIUM");
        let d: Difficulty = serde_json::from_str(r#""HARD""#).unwrap();
        assert_eq!(d, Difficulty::Hard);
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_trail_keeps_unknown_fields() {
        let trail: Trail = serde_json::from_str(
            r#"{"id": 7, "name": "Ošterc", "lengthKm": 4.2, "difficulty": "EASY"}"#,
        )
        .unwrap();
        assert_eq!(trail.name, "Ošterc");
        assert_eq!(trail.length_km, Some(4.2));
        let back = serde_json::to_value(&trail).unwrap();
        assert_eq!(back["id"], 7);
        assert_eq!(back["difficulty"], "EASY");
    }
}
