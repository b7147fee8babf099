use serde::Deserialize;

/// Upper bound on persisted waypoints per trail.
pub const DEFAULT_MAX_WAYPOINTS: usize = 1000;

/// Finer than this is below f64 resolution for elevations in meters.
pub const MAX_ELEVATION_DECIMALS: u32 = 15;

/// Options for route to waypoint conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Maximum number of waypoints to emit, final point included (default: 1000)
    #[serde(default = "default_max_waypoints")]
    pub max_waypoints: usize,

    /// Decimal places kept on waypoint elevations (default: 2)
    #[serde(default = "default_elevation_decimals")]
    pub elevation_decimals: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
            elevation_decimals: default_elevation_decimals(),
        }
    }
}

impl ConvertOptions {
    /// The cap actually applied. A cap below 2 could not hold both endpoints.
    pub fn waypoint_cap(&self) -> usize {
        self.max_waypoints.max(2)
    }

    /// Decimal places actually applied, at most `MAX_ELEVATION_DECIMALS`.
    pub fn elevation_precision(&self) -> u32 {
        self.elevation_decimals.min(MAX_ELEVATION_DECIMALS)
    }
}

fn default_max_waypoints() -> usize {
    DEFAULT_MAX_WAYPOINTS
}

fn default_elevation_decimals() -> u32 {
    2
}
