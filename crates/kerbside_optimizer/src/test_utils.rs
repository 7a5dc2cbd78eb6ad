use std::sync::Arc;

use crate::{
    problem::{
        coordinate::Coordinate,
        depot::Depot,
        distance_matrix::{Distance, DistanceMatrix, NodeIdx},
        load::to_fixed_point,
        routing_problem::RoutingProblem,
        vehicle::{VehicleIdx, VehicleInstance},
        waste_point::WastePoint,
    },
    routing::{DistanceTable, RouteGeometry, RoutingProvider},
    solver::solution::{route::RouteIdx, working_solution::WorkingSolution},
};

pub fn point(id: &str, lat: f64, lon: f64, demand: f64) -> WastePoint {
    WastePoint::new(id, Coordinate::from_lat_lon(lat, lon)).with_demand(demand)
}

pub fn depot(lat: f64, lon: f64) -> Depot {
    Depot::new("Depot", Coordinate::from_lat_lon(lat, lon))
}

/// Provider answering every query with the same canned response, or an error
/// when none is set.
#[derive(Default)]
pub struct StaticProvider {
    table: Option<DistanceTable>,
    route: Option<RouteGeometry>,
}

impl StaticProvider {
    pub fn with_table(table: DistanceTable) -> Self {
        Self {
            table: Some(table),
            route: None,
        }
    }

    pub fn with_route(route: RouteGeometry) -> Self {
        Self {
            table: None,
            route: Some(route),
        }
    }
}

impl RoutingProvider for StaticProvider {
    async fn fetch_table(&self, _coordinates: &[Coordinate]) -> anyhow::Result<DistanceTable> {
        self.table
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no table configured"))
    }

    async fn fetch_route(&self, _coordinates: &[Coordinate]) -> anyhow::Result<RouteGeometry> {
        self.route
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no route configured"))
    }
}

fn instances(capacities: &[f64]) -> Vec<VehicleInstance> {
    capacities
        .iter()
        .enumerate()
        .map(|(index, &capacity)| {
            VehicleInstance::new(VehicleIdx::new(index), 1, to_fixed_point(capacity))
        })
        .collect()
}

/// Points on a line through the depot at position 0, 100 meters per unit.
/// `points[i]` is `(position, demand)` of node `i + 1`, every capacity is one
/// vehicle on its first trip.
pub fn create_line_problem(points: &[(usize, f64)], capacities: &[f64]) -> RoutingProblem {
    let positions = std::iter::once(0)
        .chain(points.iter().map(|&(position, _)| position))
        .collect::<Vec<_>>();

    let rows = positions
        .iter()
        .map(|&from| {
            positions
                .iter()
                .map(|&to| (from.abs_diff(to) * 100) as Distance)
                .collect()
        })
        .collect();

    let matrix = DistanceMatrix::from_rows(rows).unwrap();
    let demands = points
        .iter()
        .map(|&(_, demand)| to_fixed_point(demand))
        .collect();

    RoutingProblem::new(matrix, demands, instances(capacities))
}

/// `rows` covers the depot and every point.
pub fn create_matrix_problem(
    rows: Vec<Vec<Distance>>,
    demands: &[f64],
    capacities: &[f64],
) -> RoutingProblem {
    let matrix = DistanceMatrix::from_rows(rows).unwrap();
    let demands = demands.iter().map(|&demand| to_fixed_point(demand)).collect();

    RoutingProblem::new(matrix, demands, instances(capacities))
}

/// One route per entry of `routes`, listing node indices. Remaining vehicle
/// instances stay empty.
pub fn create_test_solution(
    problem: &Arc<RoutingProblem>,
    routes: Vec<Vec<usize>>,
) -> WorkingSolution {
    let mut solution = WorkingSolution::new(Arc::clone(problem));

    for (index, nodes) in routes.into_iter().enumerate() {
        solution.replace_route_nodes(
            RouteIdx::new(index),
            nodes.into_iter().map(NodeIdx::new).collect(),
        );
    }

    solution
}

pub fn route_nodes(solution: &WorkingSolution, route: usize) -> Vec<usize> {
    solution
        .route(RouteIdx::new(route))
        .nodes()
        .iter()
        .map(|node| node.get())
        .collect()
}
