use geojson::{Feature, Geometry, Value};
use log::{debug, info, warn};
use serde_json::{Map, Value as JsonValue};

use crate::distance::round_to;
use crate::error::TrailStatsError;
use crate::options::ConvertOptions;
use crate::trail_types::*;

type Result<T> = std::result::Result<T, TrailStatsError>;

/// Convert a drawn route into the ordered waypoints persisted with a trail.
///
/// At most `opts.max_waypoints` waypoints are produced. Longer routes are
/// sampled at a fixed stride, and the final coordinate is always kept.
/// Elevation availability is decided from the first coordinate alone.
pub fn convert_route_to_waypoints(route: &Route, opts: &ConvertOptions) -> Result<Vec<Waypoint>> {
    let coords = route.coordinates()?;
    let has_elevation = coords[0].is_3d();
    let step = stride(coords.len(), opts.waypoint_cap());

    debug!(
        "converting route: {} points, elevation: {has_elevation}, stride: {step}",
        coords.len()
    );

    let mut waypoints: Vec<Waypoint> = Vec::with_capacity(coords.len().div_ceil(step) + 1);
    let mut last_taken = None;

    for (idx, coord) in coords.iter().enumerate().step_by(step) {
        let order = waypoints.len() as u32 + 1;
        match to_waypoint(coord, order, has_elevation, opts.elevation_precision()) {
            Some(wp) => {
                waypoints.push(wp);
                last_taken = Some(idx);
            }
            None => warn!("skipping malformed coordinate at index {idx}"),
        }
    }

    let last_idx = coords.len() - 1;
    if last_taken != Some(last_idx) {
        let order = waypoints.len() as u32 + 1;
        if let Some(wp) = to_waypoint(&coords[last_idx], order, has_elevation, opts.elevation_precision()) {
            waypoints.push(wp);
        }
    }

    info!("generated {} waypoints", waypoints.len());
    Ok(waypoints)
}

/// Sampling stride that keeps `total` points within `cap`, final point included.
pub fn stride(total: usize, cap: usize) -> usize {
    if total <= cap {
        1
    } else {
        (total - 1).div_ceil(cap.max(2) - 1)
    }
}

fn to_waypoint(
    coord: &Coordinate,
    order: u32,
    has_elevation: bool,
    decimals: u32,
) -> Option<Waypoint> {
    let (longitude, latitude) = coord.position()?;
    let elevation = if has_elevation {
        coord.elevation().map(|ele| round_to(ele, decimals))
    } else {
        None
    };

    Some(Waypoint {
        longitude,
        latitude,
        order,
        elevation,
    })
}

/// Build a LineString Feature for map display from persisted waypoints.
///
/// Returns `None` when there is no waypoint sequence at all. The caller's
/// slice is left untouched; a sorted copy is used.
pub fn waypoints_to_geojson(waypoints: Option<&[Waypoint]>) -> Option<Feature> {
    let sorted = sorted_by_order(waypoints?);
    let coords: Vec<Vec<f64>> = sorted.iter().map(waypoint_coords).collect();
    let has_elevation = coords.first().is_some_and(|c| c.len() == 3);

    let mut props = Map::new();
    props.insert("hasElevation".to_string(), JsonValue::Bool(has_elevation));

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::LineString(coords))),
        id: None,
        properties: Some(props),
        foreign_members: None,
    })
}

/// Validate backend records, dropping entries without a position or order.
pub fn waypoints_from_records(records: Vec<WaypointRecord>) -> Vec<Waypoint> {
    let total = records.len();
    let waypoints: Vec<Waypoint> = records
        .into_iter()
        .filter_map(WaypointRecord::into_waypoint)
        .collect();
    if waypoints.len() < total {
        warn!("skipped {} malformed waypoints", total - waypoints.len());
    }
    waypoints
}

pub(crate) fn sorted_by_order(waypoints: &[Waypoint]) -> Vec<Waypoint> {
    let mut sorted = waypoints.to_vec();
    sorted.sort_by_key(|wp| wp.order);
    sorted
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn waypoint_coords(wp: &Waypoint) -> Vec<f64> {
    match wp.elevation {
        Some(ele) => vec![wp.longitude, wp.latitude, ele],
        None => vec![wp.longitude, wp.latitude],
    }
}
