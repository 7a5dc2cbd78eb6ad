use fxhash::FxHashMap;
use jiff::SignedDuration;
use tracing::{Level, debug, instrument, warn};

use crate::{
    config::OptimizerConfig,
    enrichment::itinerary::Itinerary,
    problem::{
        coordinate::Coordinate,
        depot::Depot,
        vehicle::{Vehicle, VehicleIdx, VehicleInstance},
        waste_point::WastePoint,
    },
    routing::{RouteGeometry, RoutingProvider},
    solver::route_assignment::RouteAssignment,
};

/// Non-empty route of the solver, tagged with its real vehicle and trip.
struct Trip<'a> {
    vehicle_id: VehicleIdx,
    trip: usize,
    assignment: &'a RouteAssignment,
}

/// Turns solver routes back into itineraries of the real fleet.
pub struct RouteEnricher<'a, P> {
    provider: &'a P,
    config: &'a OptimizerConfig,
    depot: &'a Depot,
    points: &'a [WastePoint],
    vehicles: &'a [Vehicle],
    instances: &'a [VehicleInstance],
}

impl<'a, P> RouteEnricher<'a, P>
where
    P: RoutingProvider,
{
    /// `points` and `instances` are the ones the solved problem was built from.
    pub fn new(
        provider: &'a P,
        config: &'a OptimizerConfig,
        depot: &'a Depot,
        points: &'a [WastePoint],
        vehicles: &'a [Vehicle],
        instances: &'a [VehicleInstance],
    ) -> Self {
        Self {
            provider,
            config,
            depot,
            points,
            vehicles,
            instances,
        }
    }

    /// Itineraries ordered by vehicle input order, then trip. Route queries
    /// run one after the other, a failed query falls back to estimates.
    #[instrument(skip_all, fields(routes = assignments.len()), level = Level::DEBUG)]
    pub async fn enrich(&self, assignments: &[RouteAssignment]) -> Vec<Itinerary> {
        let trips = self.collapse_trips(assignments);

        let mut trips_per_vehicle: FxHashMap<VehicleIdx, usize> = FxHashMap::default();
        for trip in &trips {
            *trips_per_vehicle.entry(trip.vehicle_id).or_default() += 1;
        }

        let mut itineraries = Vec::with_capacity(trips.len());
        for trip in trips {
            let vehicle = &self.vehicles[trip.vehicle_id];
            let label = if trips_per_vehicle[&trip.vehicle_id] > 1 {
                format!("{} (Trip {})", vehicle.label(), trip.trip)
            } else {
                vehicle.label().to_string()
            };

            itineraries.push(self.enrich_trip(vehicle, label, &trip).await);
        }

        debug!("Enriched {} itineraries", itineraries.len());

        itineraries
    }

    /// Keeps the non-empty routes and renumbers the trips of every real
    /// vehicle from 1, in solver order.
    fn collapse_trips<'b>(&self, assignments: &'b [RouteAssignment]) -> Vec<Trip<'b>> {
        let mut next_trip: FxHashMap<VehicleIdx, usize> = FxHashMap::default();

        let mut trips = assignments
            .iter()
            .filter(|assignment| !assignment.is_empty())
            .map(|assignment| {
                let vehicle_id = self.instances[assignment.vehicle_id()].vehicle_id();
                let trip = next_trip.entry(vehicle_id).or_insert(0);
                *trip += 1;

                Trip {
                    vehicle_id,
                    trip: *trip,
                    assignment,
                }
            })
            .collect::<Vec<_>>();

        trips.sort_by_key(|trip| (trip.vehicle_id, trip.trip));
        trips
    }

    async fn enrich_trip(&self, vehicle: &Vehicle, label: String, trip: &Trip<'_>) -> Itinerary {
        let points = trip
            .assignment
            .points()
            .iter()
            .map(|node| self.points[node.get() - 1].clone())
            .collect::<Vec<_>>();

        let polyline = std::iter::once(*self.depot.coordinate())
            .chain(points.iter().map(|point| *point.coordinate()))
            .chain(std::iter::once(*self.depot.coordinate()))
            .collect::<Vec<Coordinate>>();

        let (distance_km, duration, geometry) = match self.provider.fetch_route(&polyline).await {
            Ok(route) if is_usable(&route) => (
                route.distance / 1000.0,
                SignedDuration::from_secs_f64(route.duration),
                Some(route.geometry),
            ),
            Ok(_) => {
                warn!("Route query for {label} returned invalid values, using estimates");
                self.estimate(trip.assignment)
            }
            Err(error) => {
                warn!("Route query for {label} failed, using estimates: {error:#}");
                self.estimate(trip.assignment)
            }
        };

        let consumption = vehicle
            .fuel_consumption()
            .unwrap_or(self.config.default_fuel_consumption);

        Itinerary {
            vehicle_id: vehicle.external_id().to_string(),
            label,
            trip: trip.trip,
            points,
            distance_km,
            duration,
            fuel_liters: distance_km / 100.0 * consumption,
            is_estimated: geometry.is_none(),
            geometry,
        }
    }

    /// Matrix distance of the route, at the configured average pace.
    fn estimate(
        &self,
        assignment: &RouteAssignment,
    ) -> (f64, SignedDuration, Option<Vec<Coordinate>>) {
        let distance_km = assignment.distance() as f64 / 1000.0;
        let minutes = distance_km * self.config.fallback_minutes_per_km;

        (distance_km, SignedDuration::from_secs_f64(minutes * 60.0), None)
    }
}

fn is_usable(route: &RouteGeometry) -> bool {
    route.distance.is_finite()
        && route.distance >= 0.0
        && route.duration.is_finite()
        && route.duration >= 0.0
        // Far beyond any road trip, keeps the duration conversion in range
        && route.duration < 1e12
}
