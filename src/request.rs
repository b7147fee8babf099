use log::info;

use crate::converter::convert_route_to_waypoints;
use crate::error::TrailStatsError;
use crate::options::ConvertOptions;
use crate::stats::route_totals;
use crate::trail_types::{CreateTrailRequest, Route, TrailDraft};

/// Assemble the `POST /trails` body from the save form and the drawn route.
pub fn build_create_trail_request(
    draft: &TrailDraft,
    route: &Route,
    opts: &ConvertOptions,
) -> Result<CreateTrailRequest, TrailStatsError> {
    route.coordinates()?;

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(TrailStatsError::MissingTrailName);
    }

    let description = draft
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let totals = route_totals(route)?;
    let stats = totals.rounded();
    let waypoints = convert_route_to_waypoints(route, opts)?;

    info!(
        "trail '{name}': {} km, {} waypoints",
        stats.distance_km,
        waypoints.len()
    );

    Ok(CreateTrailRequest {
        name: name.to_string(),
        description,
        length_km: stats.distance_km,
        height_km: totals.height_km(),
        difficulty: draft.difficulty,
        waypoints,
    })
}
