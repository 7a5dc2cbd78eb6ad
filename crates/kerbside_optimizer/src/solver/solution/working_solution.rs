use std::sync::Arc;

use fxhash::FxHashSet;

use crate::{
    problem::{
        distance_matrix::{DEPOT, Distance, NodeIdx},
        routing_problem::RoutingProblem,
        vehicle::VehicleInstanceIdx,
    },
    solver::{
        route_assignment::RouteAssignment,
        solution::route::{Route, RouteIdx},
    },
};

/// One route per vehicle instance, in instance order.
#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<RoutingProblem>,
    routes: Vec<Route>,
}

impl WorkingSolution {
    pub fn new(problem: Arc<RoutingProblem>) -> Self {
        let routes = problem
            .vehicles()
            .iter()
            .enumerate()
            .map(|(index, vehicle)| Route::new(VehicleInstanceIdx::new(index), vehicle.capacity()))
            .collect();

        Self { problem, routes }
    }

    pub fn problem(&self) -> &RoutingProblem {
        &self.problem
    }

    pub fn problem_arc(&self) -> Arc<RoutingProblem> {
        Arc::clone(&self.problem)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline(always)]
    pub fn route(&self, route_id: RouteIdx) -> &Route {
        &self.routes[route_id]
    }

    pub fn route_ids(&self) -> impl Iterator<Item = RouteIdx> + use<> {
        (0..self.routes.len()).map(RouteIdx::new)
    }

    /// Non-empty routes, plus the first empty route of every distinct capacity:
    /// empty routes of equal capacity are interchangeable.
    pub fn active_route_ids(&self) -> Vec<RouteIdx> {
        let mut seen_capacities = FxHashSet::default();

        self.route_ids()
            .filter(|&route_id| {
                let route = self.route(route_id);
                !route.is_empty() || seen_capacities.insert(route.capacity())
            })
            .collect()
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn total_distance(&self) -> Distance {
        self.routes
            .iter()
            .fold(0, |total: Distance, route| total.saturating_add(route.distance()))
    }

    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|route| route.len()).sum()
    }

    pub fn arcs_count(&self) -> usize {
        self.non_empty_routes_iter()
            .map(|route| route.len() + 1)
            .sum()
    }

    pub fn insert_node(&mut self, route_id: RouteIdx, position: usize, node: NodeIdx) {
        let route = &mut self.routes[route_id];
        route.nodes_mut().insert(position, node);
        route.update(&self.problem);
    }

    pub fn remove_node(&mut self, route_id: RouteIdx, position: usize) -> NodeIdx {
        let route = &mut self.routes[route_id];
        let node = route.nodes_mut().remove(position);
        route.update(&self.problem);
        node
    }

    pub fn swap_nodes(&mut self, (r1, p1): (RouteIdx, usize), (r2, p2): (RouteIdx, usize)) {
        if r1 == r2 {
            self.routes[r1].nodes_mut().swap(p1, p2);
        } else {
            let first = self.routes[r1].node(p1);
            let second = self.routes[r2].node(p2);
            self.routes[r1].nodes_mut()[p1] = second;
            self.routes[r2].nodes_mut()[p2] = first;
            self.routes[r2].update(&self.problem);
        }
        self.routes[r1].update(&self.problem);
    }

    /// Reverses the points between `from` and `to`, both included.
    pub fn reverse_segment(&mut self, route_id: RouteIdx, from: usize, to: usize) {
        let route = &mut self.routes[route_id];
        route.nodes_mut()[from..=to].reverse();
        route.update(&self.problem);
    }

    pub fn replace_route_nodes(&mut self, route_id: RouteIdx, nodes: Vec<NodeIdx>) {
        let route = &mut self.routes[route_id];
        *route.nodes_mut() = nodes;
        route.update(&self.problem);
    }

    /// Depot-anchored node sequence of every route, unused routes included.
    pub fn into_assignments(self) -> Vec<RouteAssignment> {
        self.routes
            .into_iter()
            .map(|route| {
                let mut nodes = Vec::with_capacity(route.len() + 2);
                nodes.push(DEPOT);
                nodes.extend_from_slice(route.nodes());
                nodes.push(DEPOT);

                RouteAssignment::new(route.vehicle_id(), nodes, route.distance())
            })
            .collect()
    }
}
