use jiff::SignedDuration;
use serde::Serialize;

use crate::problem::{coordinate::Coordinate, waste_point::WastePoint};

/// One trip of a real vehicle, ready to be driven.
#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    pub(super) vehicle_id: String,
    pub(super) label: String,
    pub(super) trip: usize,
    pub(super) points: Vec<WastePoint>,
    pub(super) distance_km: f64,
    pub(super) duration: SignedDuration,
    pub(super) fuel_liters: f64,
    pub(super) geometry: Option<Vec<Coordinate>>,
    pub(super) is_estimated: bool,
}

impl Itinerary {
    /// External id of the vehicle driving this trip.
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Vehicle label, with the trip ordinal when the vehicle drives several trips.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 1-based trip ordinal among the itineraries of the same vehicle.
    pub fn trip(&self) -> usize {
        self.trip
    }

    /// Visited points in order, the depot excluded.
    pub fn points(&self) -> &[WastePoint] {
        &self.points
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration(&self) -> SignedDuration {
        self.duration
    }

    pub fn fuel_liters(&self) -> f64 {
        self.fuel_liters
    }

    /// Road geometry from the routing provider, depot to depot.
    pub fn geometry(&self) -> Option<&[Coordinate]> {
        self.geometry.as_deref()
    }

    /// Distance and duration are estimates, the routing provider did not answer.
    pub fn is_estimated(&self) -> bool {
        self.is_estimated
    }

    pub fn total_demand(&self) -> f64 {
        self.points.iter().map(|point| point.demand()).sum()
    }
}
