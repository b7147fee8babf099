use std::fmt::Write;

use serde::Serialize;

use crate::converter::sorted_by_order;
use crate::trail_types::Waypoint;

/// Spacing of horizontal grid lines, in meters.
pub const GRID_SPACING_M: f64 = 50.0;

/// Elevation profile of a trail in a 100x100 box, y growing downwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationProfile {
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub points: Vec<[f64; 2]>,
    pub grid_lines: Vec<GridLine>,
    pub line_path: String,
    pub area_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub elevation: f64,
    pub y: f64,
}

/// Profile over the waypoints that carry an elevation, in trail order.
/// `None` when no waypoint has one.
pub fn elevation_profile(waypoints: &[Waypoint]) -> Option<ElevationProfile> {
    let with_elevation: Vec<Waypoint> = waypoints
        .iter()
        .filter(|wp| wp.elevation.is_some())
        .cloned()
        .collect();
    let elevations: Vec<f64> = sorted_by_order(&with_elevation)
        .iter()
        .filter_map(|wp| wp.elevation)
        .collect();
    if elevations.is_empty() {
        return None;
    }

    let min = elevations.iter().copied().fold(f64::INFINITY, f64::min);
    let max = elevations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let last = (elevations.len() - 1).max(1) as f64;

    let points: Vec<[f64; 2]> = elevations
        .iter()
        .enumerate()
        .map(|(i, &ele)| {
            let x = i as f64 / last * 100.0;
            let y = if range > 0.0 {
                (max - ele) / range * 100.0
            } else {
                50.0
            };
            [x, y]
        })
        .collect();

    let line_path = format!("M {}", join_points(&points));
    let area_path = format!("M 0,100 L {} L 100,100 Z", join_points(&points));

    Some(ElevationProfile {
        min_elevation: min,
        max_elevation: max,
        grid_lines: grid_lines(min, max),
        points,
        line_path,
        area_path,
    })
}

fn grid_lines(min: f64, max: f64) -> Vec<GridLine> {
    let range = max - min;
    if range <= 0.0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut elevation = (min / GRID_SPACING_M).floor() * GRID_SPACING_M;
    let top = (max / GRID_SPACING_M).ceil() * GRID_SPACING_M;
    while elevation <= top {
        if elevation >= min && elevation <= max {
            lines.push(GridLine {
                elevation,
                y: (max - elevation) / range * 100.0,
            });
        }
        elevation += GRID_SPACING_M;
    }
    lines
}

fn join_points(points: &[[f64; 2]]) -> String {
    let mut out = String::new();
    for (i, [x, y]) in points.iter().enumerate() {
        if i > 0 {
            out.push_str(" L ");
        }
        let _ = write!(out, "{x},{y}");
    }
    out
}
