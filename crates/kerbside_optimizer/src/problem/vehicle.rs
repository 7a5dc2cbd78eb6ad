use serde::Serialize;

use crate::{
    define_index_newtype,
    problem::load::{Load, to_fixed_point},
};

define_index_newtype!(VehicleIdx, Vehicle);

#[derive(Serialize, Debug, Clone)]
pub struct Vehicle {
    external_id: String,
    label: String,
    capacity: f64,
    is_available: bool,
    fuel_consumption: Option<f64>,
}

impl Vehicle {
    pub fn new(external_id: impl Into<String>, label: impl Into<String>, capacity: f64) -> Self {
        Self {
            external_id: external_id.into(),
            label: label.into(),
            capacity,
            is_available: true,
            fuel_consumption: None,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn set_available(&mut self, is_available: bool) {
        self.is_available = is_available;
    }

    /// Liters per 100 km, when known for this vehicle.
    pub fn fuel_consumption(&self) -> Option<f64> {
        self.fuel_consumption
    }

    pub fn set_fuel_consumption(&mut self, fuel_consumption: f64) {
        self.fuel_consumption = Some(fuel_consumption);
    }

    /// Unavailable vehicles and vehicles without capacity never receive a route.
    /// Capacity is judged in fixed point, as the solver sees it.
    pub fn is_usable(&self) -> bool {
        self.is_available && self.fixed_point_capacity() > 0
    }

    pub fn fixed_point_capacity(&self) -> Load {
        to_fixed_point(self.capacity)
    }
}

define_index_newtype!(VehicleInstanceIdx, VehicleInstance);

/// One trip of a real vehicle. Several instances of the same vehicle exist
/// when the fleet had to be expanded to cover the demand.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleInstance {
    vehicle_id: VehicleIdx,
    trip: usize,
    capacity: Load,
}

impl VehicleInstance {
    pub fn new(vehicle_id: VehicleIdx, trip: usize, capacity: Load) -> Self {
        Self {
            vehicle_id,
            trip,
            capacity,
        }
    }

    pub fn vehicle_id(&self) -> VehicleIdx {
        self.vehicle_id
    }

    /// 1-based trip ordinal
    pub fn trip(&self) -> usize {
        self.trip
    }

    pub fn capacity(&self) -> Load {
        self.capacity
    }
}
