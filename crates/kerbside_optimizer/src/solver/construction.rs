use std::sync::Arc;

use tracing::{Level, debug, instrument};

use crate::{
    problem::{
        distance_matrix::{Distance, NodeIdx},
        routing_problem::RoutingProblem,
    },
    solver::{
        error::SolveError,
        solution::{
            route::{Route, RouteIdx},
            working_solution::WorkingSolution,
        },
    },
};

enum ConstructionError {
    /// No route has room left for this node, or every insertion breaks the
    /// route distance limit.
    Stranded(NodeIdx),
    Aborted(SolveError),
}

/// Distance added by visiting `node` at `position` of `route`.
#[inline]
fn insertion_delta(problem: &RoutingProblem, route: &Route, position: usize, node: NodeIdx) -> i64 {
    let previous = route.previous_node(position);
    let next = route.node_or_depot(position);

    let added = problem
        .distance(previous, node)
        .saturating_add(problem.distance(node, next));
    let removed = problem.distance(previous, next);

    if added >= removed {
        i64::try_from(added - removed).unwrap_or(i64::MAX)
    } else {
        i64::try_from(removed - added).map_or(i64::MIN, |saved| -saved)
    }
}

#[inline]
fn within_distance_limit(route: &Route, delta: i64, limit: Option<Distance>) -> bool {
    limit.is_none_or(|limit| route.distance().saturating_add_signed(delta) <= limit)
}

fn cheapest_position(problem: &RoutingProblem, route: &Route, node: NodeIdx) -> (usize, i64) {
    (0..=route.len())
        .map(|position| (position, insertion_delta(problem, route, position, node)))
        .min_by_key(|&(_, delta)| delta)
        .unwrap_or((0, 0))
}

/// Repeatedly inserts the unrouted node with the globally cheapest feasible
/// insertion over every route and position.
fn cheapest_insertion<F>(
    problem: &Arc<RoutingProblem>,
    maximum_route_distance: Option<Distance>,
    should_abort: &F,
) -> Result<WorkingSolution, ConstructionError>
where
    F: Fn() -> Option<SolveError>,
{
    let mut solution = WorkingSolution::new(Arc::clone(problem));
    let mut unrouted: Vec<NodeIdx> = problem.points_iter().collect();

    while !unrouted.is_empty() {
        if let Some(error) = should_abort() {
            return Err(ConstructionError::Aborted(error));
        }

        let routes = solution.active_route_ids();
        let mut best: Option<(i64, usize, RouteIdx, usize)> = None;

        for (unrouted_index, &node) in unrouted.iter().enumerate() {
            let demand = problem.demand(node);

            for &route_id in &routes {
                let route = solution.route(route_id);
                if !route.fits(demand) {
                    continue;
                }

                let (position, delta) = cheapest_position(problem, route, node);
                if !within_distance_limit(route, delta, maximum_route_distance) {
                    continue;
                }

                if best.is_none_or(|(best_delta, ..)| delta < best_delta) {
                    best = Some((delta, unrouted_index, route_id, position));
                }
            }
        }

        match best {
            Some((_, unrouted_index, route_id, position)) => {
                let node = unrouted.swap_remove(unrouted_index);
                solution.insert_node(route_id, position, node);
            }
            None => return Err(ConstructionError::Stranded(unrouted[0])),
        }
    }

    Ok(solution)
}

/// Packing fallback: largest demand first, each node into the first route
/// with room, at its cheapest position there.
fn first_fit_decreasing<F>(
    problem: &Arc<RoutingProblem>,
    maximum_route_distance: Option<Distance>,
    should_abort: &F,
) -> Result<WorkingSolution, ConstructionError>
where
    F: Fn() -> Option<SolveError>,
{
    let mut solution = WorkingSolution::new(Arc::clone(problem));
    let mut nodes: Vec<NodeIdx> = problem.points_iter().collect();
    nodes.sort_by_key(|&node| std::cmp::Reverse(problem.demand(node)));

    let mut routes: Vec<RouteIdx> = solution.route_ids().collect();
    routes.sort_by_key(|&route_id| std::cmp::Reverse(solution.route(route_id).capacity()));

    for node in nodes {
        if let Some(error) = should_abort() {
            return Err(ConstructionError::Aborted(error));
        }

        let demand = problem.demand(node);
        let (route_id, position) = routes
            .iter()
            .copied()
            .filter(|&route_id| solution.route(route_id).fits(demand))
            .find_map(|route_id| {
                let route = solution.route(route_id);
                let (position, delta) = cheapest_position(problem, route, node);

                within_distance_limit(route, delta, maximum_route_distance)
                    .then_some((route_id, position))
            })
            .ok_or(ConstructionError::Stranded(node))?;

        solution.insert_node(route_id, position, node);
    }

    Ok(solution)
}

/// Initial feasible assignment of every point. No route is built longer than
/// `maximum_route_distance`.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn construct_solution<F>(
    problem: &Arc<RoutingProblem>,
    maximum_route_distance: Option<Distance>,
    should_abort: F,
) -> Result<WorkingSolution, SolveError>
where
    F: Fn() -> Option<SolveError>,
{
    debug!("Start construction heuristic");

    let stranded = match cheapest_insertion(problem, maximum_route_distance, &should_abort) {
        Ok(solution) => return Ok(solution),
        Err(ConstructionError::Aborted(error)) => return Err(error),
        Err(ConstructionError::Stranded(node)) => node,
    };

    debug!(
        "Cheapest insertion could not place node {}, retrying with first-fit decreasing",
        stranded
    );

    match first_fit_decreasing(problem, maximum_route_distance, &should_abort) {
        Ok(solution) => Ok(solution),
        Err(ConstructionError::Aborted(error)) => Err(error),
        Err(ConstructionError::Stranded(node)) => Err(SolveError::NoFeasibleAssignment { node }),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils;

    use super::*;

    #[test]
    fn test_cheapest_insertion_covers_all_points() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 4.0), (2, 4.0), (3, 4.0)],
            &[10.0, 10.0],
        ));

        let solution = construct_solution(&problem, None, || None).unwrap();

        assert_eq!(solution.assigned_count(), 3);
        assert!(
            solution
                .routes()
                .iter()
                .all(|route| route.load() <= route.capacity())
        );
    }

    #[test]
    fn test_cheapest_insertion_order() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(3, 1.0), (1, 1.0), (2, 1.0)],
            &[10.0],
        ));

        let solution = construct_solution(&problem, None, || None).unwrap();

        // Points on a line are visited outward then back
        let route = solution.route(RouteIdx::new(0));
        let positions = route
            .nodes()
            .iter()
            .map(|node| node.get())
            .collect::<Vec<_>>();
        assert!(positions == vec![2, 3, 1] || positions == vec![1, 3, 2]);
        assert_eq!(route.distance(), 600);
    }

    #[test]
    fn test_falls_back_to_packing() {
        // Cheapest insertion pairs the two nearby 4s and strands a 6
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 4.0), (2, 4.0), (10, 6.0), (11, 6.0)],
            &[10.0, 10.0],
        ));

        let solution = construct_solution(&problem, None, || None).unwrap();

        assert_eq!(solution.assigned_count(), 4);
        assert!(
            solution
                .routes()
                .iter()
                .all(|route| route.load() <= route.capacity())
        );
    }

    #[test]
    fn test_no_feasible_assignment() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 6.0), (2, 6.0), (3, 6.0)],
            &[10.0, 10.0],
        ));

        let error = construct_solution(&problem, None, || None).err().unwrap();

        assert!(matches!(error, SolveError::NoFeasibleAssignment { .. }));
    }

    #[test]
    fn test_aborted_construction() {
        let problem = Arc::new(test_utils::create_line_problem(&[(1, 1.0)], &[10.0]));

        let error = construct_solution(&problem, None, || Some(SolveError::Timeout))
            .err()
            .unwrap();

        assert_eq!(error, SolveError::Timeout);
    }

    #[test]
    fn test_respects_maximum_route_distance() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 1.0), (2, 1.0)],
            &[10.0, 10.0],
        ));

        let solution = construct_solution(&problem, Some(400), || None).unwrap();

        assert_eq!(solution.assigned_count(), 2);
        assert!(
            solution
                .routes()
                .iter()
                .all(|route| route.distance() <= 400)
        );
    }

    #[test]
    fn test_point_beyond_maximum_route_distance() {
        // The round trip to the point alone is 2000 m
        let problem = Arc::new(test_utils::create_line_problem(&[(10, 1.0)], &[10.0]));

        let error = construct_solution(&problem, Some(1000), || None)
            .err()
            .unwrap();

        assert_eq!(
            error,
            SolveError::NoFeasibleAssignment {
                node: NodeIdx::new(1)
            }
        );
    }

    #[test]
    fn test_saturating_insertion_delta() {
        let problem = Arc::new(test_utils::create_matrix_problem(
            vec![vec![0, u64::MAX], vec![u64::MAX, 0]],
            &[1.0],
            &[10.0],
        ));

        let solution = construct_solution(&problem, None, || None).unwrap();

        assert_eq!(solution.assigned_count(), 1);
        assert_eq!(solution.total_distance(), u64::MAX);
    }
}
