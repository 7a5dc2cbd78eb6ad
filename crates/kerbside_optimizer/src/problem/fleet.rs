use tracing::{Level, debug, info, instrument};

use crate::problem::{
    load::{Load, from_fixed_point, to_fixed_point},
    vehicle::{Vehicle, VehicleIdx, VehicleInstance},
};

/// Working vehicle list handed to the solver.
#[derive(Debug, Clone)]
pub enum Fleet {
    /// The real fleet covers the demand, one instance per usable vehicle.
    Real(Vec<VehicleInstance>),
    /// Each usable vehicle was multiplied into several trips.
    Expanded(Vec<VehicleInstance>),
}

impl Fleet {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Fleet::Expanded(_))
    }

    #[inline]
    pub fn instances(&self) -> &[VehicleInstance] {
        match self {
            Fleet::Real(instances) => instances,
            Fleet::Expanded(instances) => instances,
        }
    }

    pub fn into_instances(self) -> Vec<VehicleInstance> {
        match self {
            Fleet::Real(instances) => instances,
            Fleet::Expanded(instances) => instances,
        }
    }

    pub fn total_capacity(&self) -> Load {
        self.instances()
            .iter()
            .map(|instance| instance.capacity())
            .sum()
    }
}

/// Total capacity of the vehicles that can actually be dispatched.
pub fn usable_capacity(vehicles: &[Vehicle]) -> f64 {
    vehicles
        .iter()
        .filter(|vehicle| vehicle.is_usable())
        .map(|vehicle| vehicle.capacity())
        .sum()
}

/// Multi-trip decomposition: when the fleet cannot carry `total_demand` in one go,
/// every usable vehicle gets `ceil(total_demand / capacity)` trips so that the
/// aggregate capacity always covers the demand. This does not try to find the
/// smallest such set of trips.
///
/// `total_demand` is the sum of the fixed-point point demands.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn expand_fleet(vehicles: &[Vehicle], total_demand: Load) -> Fleet {
    let usable = || {
        vehicles
            .iter()
            .enumerate()
            .filter(|(_, vehicle)| vehicle.is_usable())
            .map(|(index, vehicle)| (VehicleIdx::new(index), vehicle))
    };

    for vehicle in vehicles.iter().filter(|vehicle| !vehicle.is_usable()) {
        debug!(
            "Skipping vehicle {}: available={}, capacity={}",
            vehicle.external_id(),
            vehicle.is_available(),
            vehicle.capacity()
        );
    }

    let total_capacity: Load = usable()
        .map(|(_, vehicle)| vehicle.fixed_point_capacity())
        .sum();

    if total_demand <= total_capacity {
        return Fleet::Real(
            usable()
                .map(|(vehicle_id, vehicle)| {
                    VehicleInstance::new(vehicle_id, 1, vehicle.fixed_point_capacity())
                })
                .collect(),
        );
    }

    let instances: Vec<VehicleInstance> = usable()
        .flat_map(|(vehicle_id, vehicle)| {
            let capacity = vehicle.fixed_point_capacity();
            let trips = total_demand.div_ceil(capacity) as usize;

            (1..=trips).map(move |trip| VehicleInstance::new(vehicle_id, trip, capacity))
        })
        .collect();

    info!(
        "Demand {:.2} exceeds fleet capacity {:.2}, expanded {} vehicles into {} trips",
        from_fixed_point(total_demand),
        from_fixed_point(total_capacity),
        vehicles.iter().filter(|vehicle| vehicle.is_usable()).count(),
        instances.len()
    );

    Fleet::Expanded(instances)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicles(capacities: &[f64]) -> Vec<Vehicle> {
        capacities
            .iter()
            .enumerate()
            .map(|(index, &capacity)| {
                Vehicle::new(format!("v{index}"), format!("Vehicle-{index}"), capacity)
            })
            .collect()
    }

    #[test]
    fn test_enough_capacity_keeps_fleet() {
        let fleet = expand_fleet(&vehicles(&[10.0, 5.0]), to_fixed_point(15.0));

        assert!(!fleet.is_expanded());
        assert_eq!(fleet.instances().len(), 2);
        assert!(fleet.instances().iter().all(|instance| instance.trip() == 1));
        assert_eq!(fleet.instances()[1].capacity(), 5000);
    }

    #[test]
    fn test_expansion_count() {
        let fleet = expand_fleet(&vehicles(&[10.0]), to_fixed_point(25.0));

        assert!(fleet.is_expanded());
        assert_eq!(
            fleet
                .instances()
                .iter()
                .map(|instance| instance.trip())
                .collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert!(
            fleet
                .instances()
                .iter()
                .all(|instance| instance.vehicle_id() == VehicleIdx::new(0))
        );
    }

    #[test]
    fn test_expansion_heterogeneous_fleet() {
        let fleet = expand_fleet(&vehicles(&[10.0, 4.0]), to_fixed_point(20.0));

        let trips_of = |index: usize| {
            fleet
                .instances()
                .iter()
                .filter(|instance| instance.vehicle_id() == VehicleIdx::new(index))
                .count()
        };

        assert_eq!(trips_of(0), 2);
        assert_eq!(trips_of(1), 5);
        assert!(fleet.total_capacity() >= to_fixed_point(20.0));
    }

    #[test]
    fn test_unusable_vehicles_are_skipped() {
        let mut vehicles = vehicles(&[10.0, 0.0, 8.0]);
        vehicles[2].set_available(false);

        let fleet = expand_fleet(&vehicles, to_fixed_point(4.0));

        assert_eq!(fleet.instances().len(), 1);
        assert_eq!(fleet.instances()[0].vehicle_id(), VehicleIdx::new(0));
    }

    #[test]
    fn test_no_usable_vehicle() {
        let mut vehicles = vehicles(&[10.0]);
        vehicles[0].set_available(false);

        let fleet = expand_fleet(&vehicles, to_fixed_point(4.0));

        assert!(fleet.instances().is_empty());
        assert_eq!(fleet.total_capacity(), 0);
    }

    #[test]
    fn test_capacity_below_fixed_point_unit_is_unusable() {
        let vehicles = vehicles(&[0.0001, 10.0]);

        let fleet = expand_fleet(&vehicles, to_fixed_point(5.0));

        assert!(!vehicles[0].is_usable());
        assert_eq!(fleet.instances().len(), 1);
        assert_eq!(fleet.instances()[0].vehicle_id(), VehicleIdx::new(1));
        assert_eq!(usable_capacity(&vehicles), 10.0);
    }

    #[test]
    fn test_only_tiny_capacities() {
        let fleet = expand_fleet(&vehicles(&[0.0001]), to_fixed_point(5.0));

        assert!(fleet.instances().is_empty());
    }

    #[test]
    fn test_one_unit_over_capacity_adds_a_trip() {
        let fleet = expand_fleet(&vehicles(&[2.0]), 2001);

        assert!(fleet.is_expanded());
        assert_eq!(fleet.instances().len(), 2);
    }
}
