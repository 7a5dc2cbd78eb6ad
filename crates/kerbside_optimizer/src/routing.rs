use std::future::Future;

use kerbside_osrm::OsrmClient;

use crate::problem::coordinate::Coordinate;

/// Pairwise road distances in meters, in the order of the requested coordinates.
/// `None` marks a pair the provider could not route.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    pub distances: Vec<Vec<Option<f64>>>,
}

/// Real path through an ordered list of coordinates.
#[derive(Debug, Clone)]
pub struct RouteGeometry {
    /// Meters
    pub distance: f64,
    /// Seconds
    pub duration: f64,
    pub geometry: Vec<Coordinate>,
}

/// Road-network routing provider. Every call is best-effort: callers recover
/// from errors with their own estimates, errors are only logged.
pub trait RoutingProvider: Send + Sync {
    fn fetch_table(
        &self,
        coordinates: &[Coordinate],
    ) -> impl Future<Output = anyhow::Result<DistanceTable>> + Send;

    fn fetch_route(
        &self,
        coordinates: &[Coordinate],
    ) -> impl Future<Output = anyhow::Result<RouteGeometry>> + Send;
}

impl RoutingProvider for OsrmClient {
    async fn fetch_table(&self, coordinates: &[Coordinate]) -> anyhow::Result<DistanceTable> {
        let table = OsrmClient::fetch_table(self, coordinates).await?;

        Ok(DistanceTable {
            distances: table.distances,
        })
    }

    async fn fetch_route(&self, coordinates: &[Coordinate]) -> anyhow::Result<RouteGeometry> {
        let route = OsrmClient::fetch_route(self, coordinates).await?;

        Ok(RouteGeometry {
            distance: route.distance,
            duration: route.duration,
            geometry: route.geometry.0.into_iter().map(Coordinate::from).collect(),
        })
    }
}

/// Provider used when no routing service is configured. Every request fails,
/// so every stage uses its fallback estimate.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

impl RoutingProvider for OfflineProvider {
    async fn fetch_table(&self, _coordinates: &[Coordinate]) -> anyhow::Result<DistanceTable> {
        Err(anyhow::anyhow!("No routing provider configured"))
    }

    async fn fetch_route(&self, _coordinates: &[Coordinate]) -> anyhow::Result<RouteGeometry> {
        Err(anyhow::anyhow!("No routing provider configured"))
    }
}
