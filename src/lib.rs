pub mod biome;
pub mod converter;
pub mod distance;
pub mod error;
pub mod filter;
pub mod options;
pub mod profile;
pub mod request;
pub mod stats;
pub mod trail_types;

use std::sync::Once;

use js_sys::Array;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use crate::biome::BiomeComposition;
use crate::error::TrailStatsError;
use crate::filter::TrailFilter;
use crate::options::ConvertOptions;
use crate::trail_types::{Route, Trail, TrailDraft, Waypoint, WaypointRecord};

static START: Once = Once::new();

fn init() {
    START.call_once(|| {
        // A logger installed by the host page wins.
        let _ = console_log::init_with_level(log::Level::Info);
    });
    console_error_panic_hook::set_once();
}

/// Convert a drawn route to the waypoints persisted with a trail.
#[wasm_bindgen(js_name = convertRouteToWaypoints)]
pub fn convert_route_to_waypoints(route: JsValue, options: JsValue) -> Result<JsValue, JsValue> {
    init();

    let opts = parse_options(options)?;
    let route = parse_route(route)?;
    let waypoints = converter::convert_route_to_waypoints(&route, &opts)?;
    to_js(&waypoints)
}

/// Waypoints to a GeoJSON LineString Feature, or `null` if not given an array.
#[wasm_bindgen(js_name = waypointsToGeoJSON)]
pub fn waypoints_to_geojson(waypoints: JsValue) -> Result<JsValue, JsValue> {
    init();

    let waypoints = read_waypoints(waypoints)?;
    match converter::waypoints_to_geojson(waypoints.as_deref()) {
        Some(feature) => to_js(&feature),
        None => Ok(JsValue::NULL),
    }
}

/// Same as `waypointsToGeoJSON`, returned as a JSON string.
#[wasm_bindgen(js_name = waypointsToGeoJSONString)]
pub fn waypoints_to_geojson_string(waypoints: JsValue) -> Result<Option<String>, JsValue> {
    init();

    let waypoints = read_waypoints(waypoints)?;
    converter::waypoints_to_geojson(waypoints.as_deref())
        .map(|feature| serde_json::to_string(&feature))
        .transpose()
        .map_err(|e| TrailStatsError::from(e).into())
}

/// Distance, ascent and descent from persisted waypoints.
#[wasm_bindgen(js_name = calculateRouteStats)]
pub fn calculate_route_stats(waypoints: JsValue) -> Result<JsValue, JsValue> {
    init();

    let waypoints = read_waypoints(waypoints)?.unwrap_or_default();
    to_js(&stats::calculate_route_stats(&waypoints))
}

/// Distance, ascent, descent and duration of a freshly drawn route.
#[wasm_bindgen(js_name = summarizeRoute)]
pub fn summarize_route(route: JsValue) -> Result<JsValue, JsValue> {
    init();

    let route = parse_route(route)?;
    to_js(&stats::summarize_route(&route)?)
}

/// Great-circle distance in kilometers.
#[wasm_bindgen(js_name = haversineDistance)]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance::haversine_distance(lat1, lon1, lat2, lon2)
}

/// Body for `POST /trails` from the save form and the drawn route.
#[wasm_bindgen(js_name = buildCreateTrailRequest)]
pub fn build_create_trail_request(
    draft: JsValue,
    route: JsValue,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    init();

    let opts = parse_options(options)?;
    let route = parse_route(route)?;
    let draft: TrailDraft = serde_wasm_bindgen::from_value(draft).map_err(TrailStatsError::from)?;
    let request = request::build_create_trail_request(&draft, &route, &opts)?;
    to_js(&request)
}

/// Elevation chart data for a saved trail, or `null` without elevations.
#[wasm_bindgen(js_name = elevationProfile)]
pub fn elevation_profile(waypoints: JsValue) -> Result<JsValue, JsValue> {
    init();

    let waypoints = read_waypoints(waypoints)?.unwrap_or_default();
    match profile::elevation_profile(&waypoints) {
        Some(profile) => to_js(&profile),
        None => Ok(JsValue::NULL),
    }
}

/// Trail list newest first, narrowed by the search and filter controls.
#[wasm_bindgen(js_name = filterTrails)]
pub fn filter_trails(trails: JsValue, filter: JsValue) -> Result<JsValue, JsValue> {
    init();

    let trails: Vec<Trail> = if Array::is_array(&trails) {
        serde_wasm_bindgen::from_value(trails).map_err(TrailStatsError::from)?
    } else {
        Vec::new()
    };
    let filter: TrailFilter = if filter.is_undefined() || filter.is_null() {
        TrailFilter::default()
    } else {
        serde_wasm_bindgen::from_value(filter).map_err(TrailStatsError::from)?
    };
    to_js(&filter::filter_trails(trails, &filter))
}

/// Biomes present on a trail, largest share first.
#[wasm_bindgen(js_name = rankBiomes)]
pub fn rank_biomes(biomes: JsValue) -> Result<JsValue, JsValue> {
    init();

    to_js(&parse_biomes(biomes)?.ranked())
}

/// Biomes covering more than 5% of a trail, largest share first.
#[wasm_bindgen(js_name = significantBiomes)]
pub fn significant_biomes(biomes: JsValue) -> Result<JsValue, JsValue> {
    init();

    to_js(&parse_biomes(biomes)?.significant())
}

fn parse_options(options: JsValue) -> Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ConvertOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| TrailStatsError::from(e).into())
    }
}

fn parse_route(route: JsValue) -> Result<Route, JsValue> {
    if route.is_undefined() || route.is_null() {
        return Err(TrailStatsError::InvalidRoute.into());
    }
    serde_wasm_bindgen::from_value(route).map_err(|e| TrailStatsError::from(e).into())
}

fn parse_biomes(biomes: JsValue) -> Result<BiomeComposition, JsValue> {
    if biomes.is_undefined() || biomes.is_null() {
        Ok(BiomeComposition::default())
    } else {
        serde_wasm_bindgen::from_value(biomes).map_err(|e| TrailStatsError::from(e).into())
    }
}

/// `None` unless the value is a JS array. Malformed entries are dropped.
fn read_waypoints(value: JsValue) -> Result<Option<Vec<Waypoint>>, JsValue> {
    if !Array::is_array(&value) {
        return Ok(None);
    }
    let entries: Vec<JsonValue> =
        serde_wasm_bindgen::from_value(value).map_err(TrailStatsError::from)?;
    let records = entries
        .into_iter()
        .map(|entry| serde_json::from_value::<WaypointRecord>(entry).unwrap_or_default())
        .collect();
    Ok(Some(converter::waypoints_from_records(records)))
}

/// Plain JS objects and `null` for missing values, matching what `JSON.parse` gives.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| TrailStatsError::Serialize(e.to_string()).into())
}
