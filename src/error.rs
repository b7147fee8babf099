use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum TrailStatsError {
    /// The route has no geometry or no coordinates to work with.
    InvalidRoute,
    MissingTrailName,
    InvalidInput(String),
    Serialize(String),
}

impl std::fmt::Display for TrailStatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoute => write!(f, "Invalid route data"),
            Self::MissingTrailName => write!(f, "Trail name is required"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for TrailStatsError {}

impl From<serde_wasm_bindgen::Error> for TrailStatsError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for TrailStatsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

impl From<TrailStatsError> for JsValue {
    fn from(e: TrailStatsError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
