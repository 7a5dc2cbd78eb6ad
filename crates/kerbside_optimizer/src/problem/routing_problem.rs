use crate::problem::{
    distance_matrix::{DEPOT, Distance, DistanceMatrix, NodeIdx},
    load::Load,
    vehicle::{VehicleInstance, VehicleInstanceIdx},
};

/// Everything the solver sees: the matrix over `[depot, points...]`, the
/// fixed-point demand of every node and the working vehicle instances.
pub struct RoutingProblem {
    matrix: DistanceMatrix,
    demands: Vec<Load>,
    vehicles: Vec<VehicleInstance>,
}

impl RoutingProblem {
    /// `point_demands[i]` is the demand of node `i + 1`.
    pub fn new(
        matrix: DistanceMatrix,
        point_demands: Vec<Load>,
        vehicles: Vec<VehicleInstance>,
    ) -> Self {
        debug_assert_eq!(
            matrix.num_nodes(),
            point_demands.len() + 1,
            "matrix must cover the depot and every point"
        );

        let mut demands = Vec::with_capacity(point_demands.len() + 1);
        demands.push(0);
        demands.extend(point_demands);

        Self {
            matrix,
            demands,
            vehicles,
        }
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    #[inline(always)]
    pub fn distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        self.matrix.distance(from, to)
    }

    pub fn num_nodes(&self) -> usize {
        self.demands.len()
    }

    pub fn num_points(&self) -> usize {
        self.demands.len() - 1
    }

    /// Every node except the depot
    pub fn points_iter(&self) -> impl Iterator<Item = NodeIdx> + use<> {
        (1..self.demands.len()).map(NodeIdx::new)
    }

    #[inline(always)]
    pub fn demand(&self, node: NodeIdx) -> Load {
        if node == DEPOT {
            return 0;
        }
        self.demands[node.get()]
    }

    pub fn vehicles(&self) -> &[VehicleInstance] {
        &self.vehicles
    }

    #[inline]
    pub fn vehicle(&self, vehicle_id: VehicleInstanceIdx) -> &VehicleInstance {
        &self.vehicles[vehicle_id]
    }

    pub fn total_demand(&self) -> Load {
        self.demands.iter().sum()
    }

    pub fn total_capacity(&self) -> Load {
        self.vehicles.iter().map(|vehicle| vehicle.capacity()).sum()
    }

    pub fn max_capacity(&self) -> Load {
        self.vehicles
            .iter()
            .map(|vehicle| vehicle.capacity())
            .max()
            .unwrap_or(0)
    }
}
