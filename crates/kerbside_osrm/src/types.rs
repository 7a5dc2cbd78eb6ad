use serde::Deserialize;

/// A full table between the requested points, in request order.
/// Distances are in meters, durations in seconds, `None` marks an unreachable pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OsrmTable {
    pub distances: Vec<Vec<Option<f64>>>,
    pub durations: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTable {
    pub fn num_points(&self) -> usize {
        self.distances.len()
    }
}

/// The path visiting the requested points in order.
#[derive(Debug, Clone)]
pub struct OsrmRoute {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub geometry: geo_types::LineString<f64>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub code: String,
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct TableResponse {
    pub code: String,
    pub message: Option<String>,
    pub distances: Option<Vec<Vec<Option<f64>>>>,
    pub durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
pub(crate) struct RouteResponse {
    pub code: String,
    pub message: Option<String>,
    pub routes: Option<Vec<RouteEntry>>,
}

#[derive(Deserialize)]
pub(crate) struct RouteEntry {
    pub distance: f64,
    pub duration: f64,
    pub geometry: Option<GeoJsonLineString>,
}

#[derive(Deserialize)]
pub(crate) struct GeoJsonLineString {
    pub coordinates: Vec<[f64; 2]>,
}
