use serde::Serialize;

use crate::problem::{
    distance_matrix::{Distance, NodeIdx},
    vehicle::VehicleInstanceIdx,
};

/// Solver output for one vehicle instance: node indices from depot to depot
/// and the matrix distance of the route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteAssignment {
    vehicle_id: VehicleInstanceIdx,
    nodes: Vec<NodeIdx>,
    distance: Distance,
}

impl RouteAssignment {
    pub fn new(vehicle_id: VehicleInstanceIdx, nodes: Vec<NodeIdx>, distance: Distance) -> Self {
        Self {
            vehicle_id,
            nodes,
            distance,
        }
    }

    pub fn vehicle_id(&self) -> VehicleInstanceIdx {
        self.vehicle_id
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Visited points, depot excluded.
    pub fn points(&self) -> &[NodeIdx] {
        if self.nodes.len() <= 2 {
            return &[];
        }
        &self.nodes[1..self.nodes.len() - 1]
    }

    /// A depot -> depot route: the trip is not used.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 2
    }
}
