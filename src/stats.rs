use serde::Serialize;

use crate::converter::sorted_by_order;
use crate::distance::{haversine_distance, round_to, round_whole};
use crate::error::TrailStatsError;
use crate::trail_types::{Coordinate, Route, Waypoint};

type Result<T> = std::result::Result<T, TrailStatsError>;

/// Summary figures for a route or a saved trail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    /// Kilometers, two decimals.
    pub distance_km: f64,
    pub ascent_m: u32,
    pub descent_m: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
}

/// Unrounded figures behind a route summary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteTotals {
    pub distance_km: f64,
    pub ascent_m: f64,
    pub descent_m: f64,
    pub duration_s: Option<f64>,
}

impl RouteTotals {
    /// Total ascent in kilometers, the unit trails are stored with.
    pub fn height_km(&self) -> f64 {
        self.ascent_m / 1000.0
    }

    pub fn rounded(&self) -> RouteStats {
        RouteStats {
            distance_km: round_to(self.distance_km, 2),
            ascent_m: round_whole(self.ascent_m),
            descent_m: round_whole(self.descent_m),
            duration_min: self.duration_s.map(|secs| round_whole(secs / 60.0)),
        }
    }
}

/// Running ascent/descent totals in meters.
#[derive(Debug, Default)]
struct Climb {
    ascent: f64,
    descent: f64,
}

impl Climb {
    /// Only pairs where both sides have an elevation count.
    fn add(&mut self, prev: Option<f64>, curr: Option<f64>) {
        if let (Some(prev), Some(curr)) = (prev, curr) {
            let change = curr - prev;
            if change > 0.0 {
                self.ascent += change;
            } else {
                self.descent += change.abs();
            }
        }
    }
}

/// Distance, ascent and descent computed from persisted waypoints alone.
///
/// Fewer than two waypoints yield all zeros.
pub fn calculate_route_stats(waypoints: &[Waypoint]) -> RouteStats {
    if waypoints.len() < 2 {
        return RouteStats::default();
    }

    let sorted = sorted_by_order(waypoints);
    let mut distance = 0.0;
    let mut climb = Climb::default();

    for pair in sorted.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        distance += haversine_distance(prev.latitude, prev.longitude, curr.latitude, curr.longitude);
        climb.add(prev.elevation, curr.elevation);
    }

    RouteStats {
        distance_km: round_to(distance, 2),
        ascent_m: round_whole(climb.ascent),
        descent_m: round_whole(climb.descent),
        duration_min: None,
    }
}

/// Figures shown for a freshly drawn route.
pub fn summarize_route(route: &Route) -> Result<RouteStats> {
    route_totals(route).map(|totals| totals.rounded())
}

/// Route totals before rounding.
///
/// The routing service's own totals take precedence. Anything it did not
/// report is derived from the route geometry.
pub fn route_totals(route: &Route) -> Result<RouteTotals> {
    let props = route.properties();

    let distance_km = match props.total_distance {
        Some(meters) => meters / 1000.0,
        None => path_length_km(route.coordinates()?),
    };

    let instructions = props.instructions.as_deref().unwrap_or_default();
    let (ascent, descent) = match (props.ascend, props.descend) {
        (None, None) if instructions.iter().any(|i| i.ascend.is_some() || i.descend.is_some()) => {
            instructions.iter().fold((0.0, 0.0), |(up, down), i| {
                (up + i.ascend.unwrap_or(0.0), down + i.descend.unwrap_or(0.0))
            })
        }
        (None, None) => match route.coordinates() {
            Ok(coords) => path_climb(coords),
            Err(_) => (0.0, 0.0),
        },
        (up, down) => (up.unwrap_or(0.0), down.unwrap_or(0.0)),
    };

    Ok(RouteTotals {
        distance_km,
        ascent_m: ascent,
        descent_m: descent,
        duration_s: props.total_time,
    })
}

fn positioned(coords: &[Coordinate]) -> impl Iterator<Item = (f64, f64, Option<f64>)> + '_ {
    coords
        .iter()
        .filter_map(|c| c.position().map(|(lng, lat)| (lng, lat, c.elevation())))
}

fn path_length_km(coords: &[Coordinate]) -> f64 {
    let points: Vec<_> = positioned(coords).collect();
    points
        .windows(2)
        .map(|pair| haversine_distance(pair[0].1, pair[0].0, pair[1].1, pair[1].0))
        .sum()
}

fn path_climb(coords: &[Coordinate]) -> (f64, f64) {
    let points: Vec<_> = positioned(coords).collect();
    let mut climb = Climb::default();
    for pair in points.windows(2) {
        climb.add(pair[0].2, pair[1].2);
    }
    (climb.ascent, climb.descent)
}
