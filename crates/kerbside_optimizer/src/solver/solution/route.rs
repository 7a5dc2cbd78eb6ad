use crate::{
    define_index_newtype,
    problem::{
        distance_matrix::{DEPOT, Distance, NodeIdx},
        load::Load,
        routing_problem::RoutingProblem,
        vehicle::VehicleInstanceIdx,
    },
    solver::arc_costs::ArcCosts,
};

define_index_newtype!(RouteIdx, Route);

/// Route of one vehicle instance. `nodes` holds the visited points only, the
/// depot at both ends is implicit.
#[derive(Clone, Debug)]
pub struct Route {
    vehicle_id: VehicleInstanceIdx,
    capacity: Load,
    nodes: Vec<NodeIdx>,
    load: Load,
    distance: Distance,
}

impl Route {
    pub fn new(vehicle_id: VehicleInstanceIdx, capacity: Load) -> Self {
        Self {
            vehicle_id,
            capacity,
            nodes: Vec::new(),
            load: 0,
            distance: 0,
        }
    }

    pub fn vehicle_id(&self) -> VehicleInstanceIdx {
        self.vehicle_id
    }

    pub fn capacity(&self) -> Load {
        self.capacity
    }

    pub fn nodes(&self) -> &[NodeIdx] {
        &self.nodes
    }

    #[inline(always)]
    pub fn node(&self, position: usize) -> NodeIdx {
        self.nodes[position]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Cumulative demand of the route.
    pub fn load(&self) -> Load {
        self.load
    }

    /// Cumulative matrix distance, depot to depot.
    pub fn distance(&self) -> Distance {
        self.distance
    }

    #[inline(always)]
    pub fn fits(&self, demand: Load) -> bool {
        self.load + demand <= self.capacity
    }

    /// Node visited before `position`, the depot for the first one.
    #[inline(always)]
    pub fn previous_node(&self, position: usize) -> NodeIdx {
        if position == 0 {
            DEPOT
        } else {
            self.nodes[position - 1]
        }
    }

    /// Node visited after `position`, the depot for the last one.
    #[inline(always)]
    pub fn next_node(&self, position: usize) -> NodeIdx {
        self.node_or_depot(position + 1)
    }

    /// Node at `position`, or the depot when `position` is the end of the route.
    #[inline(always)]
    pub fn node_or_depot(&self, position: usize) -> NodeIdx {
        self.nodes.get(position).copied().unwrap_or(DEPOT)
    }

    /// Directed arcs depot -> ... -> depot. An empty route has none.
    pub fn arcs(&self) -> impl Iterator<Item = (NodeIdx, NodeIdx)> + '_ {
        let inner = (!self.nodes.is_empty()).then(|| {
            std::iter::once(DEPOT)
                .chain(self.nodes.iter().copied())
                .zip(self.nodes.iter().copied().chain(std::iter::once(DEPOT)))
        });

        inner.into_iter().flatten()
    }

    /// Demand of the points before `position`.
    pub fn prefix_load(&self, problem: &RoutingProblem, position: usize) -> Load {
        self.nodes[..position]
            .iter()
            .map(|&node| problem.demand(node))
            .sum()
    }

    /// Cost of the arcs from `position` back to the depot.
    pub fn suffix_cost(&self, costs: &ArcCosts, position: usize) -> f64 {
        if position >= self.nodes.len() {
            return 0.0;
        }

        self.nodes[position..]
            .iter()
            .copied()
            .zip(
                self.nodes[position + 1..]
                    .iter()
                    .copied()
                    .chain(std::iter::once(DEPOT)),
            )
            .map(|(from, to)| costs.cost(from, to))
            .sum()
    }

    pub fn cost(&self, costs: &ArcCosts) -> f64 {
        self.arcs().map(|(from, to)| costs.cost(from, to)).sum()
    }

    pub(super) fn nodes_mut(&mut self) -> &mut Vec<NodeIdx> {
        &mut self.nodes
    }

    pub(super) fn update(&mut self, problem: &RoutingProblem) {
        self.load = self
            .nodes
            .iter()
            .fold(0, |load: Load, &node| load.saturating_add(problem.demand(node)));
        self.distance = self.arcs().fold(0, |distance: Distance, (from, to)| {
            distance.saturating_add(problem.distance(from, to))
        });
    }
}
