use smallvec::{SmallVec, smallvec};

use crate::solver::{
    arc_costs::ArcCosts,
    ls::r#move::LocalSearchOperator,
    solution::{route::RouteIdx, working_solution::WorkingSolution},
};

/// **Relocate**
///
/// Moves the point at `from` of `from_route` so that it is visited right
/// before the point currently at `to` of `to_route` (or last when `to` is the
/// length of the route).
///
/// ```text
/// BEFORE:
///    Route: ... (A) -> [from] -> (C) ... (X) -> (Y) ...
///
/// AFTER:
///    Route: ... (A) -> (C) ... (X) -> [from] -> (Y) ...
///
/// Edges removed: (A->from), (from->C), (X->Y)
/// Edges created: (A->C),    (X->from), (from->Y)
/// ```
#[derive(Debug)]
pub struct RelocateOperator {
    params: RelocateOperatorParams,
}

#[derive(Debug)]
pub struct RelocateOperatorParams {
    pub from_route: RouteIdx,
    pub from: usize,
    pub to_route: RouteIdx,
    pub to: usize,
}

impl RelocateOperator {
    pub fn new(params: RelocateOperatorParams) -> Self {
        debug_assert!(
            params.from_route != params.to_route
                || (params.from != params.to && params.from + 1 != params.to),
            "intra-route relocate must change the position"
        );

        Self { params }
    }

    pub fn is_intra_route(&self) -> bool {
        self.params.from_route == self.params.to_route
    }
}

impl LocalSearchOperator for RelocateOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        let from_route = solution.route(r1);
        let to_len = solution.route(r2).len();

        for from in 0..from_route.len() {
            for to in 0..=to_len {
                if r1 == r2 && (from == to || from + 1 == to) {
                    continue;
                }

                consumer(RelocateOperator::new(RelocateOperatorParams {
                    from_route: r1,
                    from,
                    to_route: r2,
                    to,
                }));
            }
        }
    }

    fn route_delta(&self, solution: &WorkingSolution, costs: &ArcCosts, route_id: RouteIdx) -> f64 {
        let from_route = solution.route(self.params.from_route);
        let a = from_route.previous_node(self.params.from);
        let node = from_route.node(self.params.from);
        let c = from_route.next_node(self.params.from);

        let to_route = solution.route(self.params.to_route);
        let x = to_route.previous_node(self.params.to);
        let y = to_route.node_or_depot(self.params.to);

        let removal = costs.cost(a, c) - costs.cost(a, node) - costs.cost(node, c);
        let insertion = costs.cost(x, node) + costs.cost(node, y) - costs.cost(x, y);

        if self.is_intra_route() {
            removal + insertion
        } else if route_id == self.params.from_route {
            removal
        } else {
            insertion
        }
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        if self.is_intra_route() {
            return true;
        }

        let node = solution.route(self.params.from_route).node(self.params.from);
        solution
            .route(self.params.to_route)
            .fits(solution.problem().demand(node))
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let node = solution.remove_node(self.params.from_route, self.params.from);

        // Positions after `from` shifted left by the removal
        let to = if self.is_intra_route() && self.params.to > self.params.from {
            self.params.to - 1
        } else {
            self.params.to
        };

        solution.insert_node(self.params.to_route, to, node);
    }

    fn updated_routes(&self) -> SmallVec<[RouteIdx; 2]> {
        if self.is_intra_route() {
            smallvec![self.params.from_route]
        } else {
            smallvec![self.params.from_route, self.params.to_route]
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        solver::{
            arc_costs::ArcCosts,
            ls::{
                r#move::LocalSearchOperator,
                relocate::{RelocateOperator, RelocateOperatorParams},
            },
            solution::route::RouteIdx,
        },
        test_utils,
    };

    #[test]
    fn test_relocate() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 1.0), (5, 1.0), (2, 1.0), (3, 1.0), (4, 1.0)],
            &[10.0],
        ));
        let mut solution = test_utils::create_test_solution(&problem, vec![vec![1, 2, 3, 4, 5]]);

        let operator = RelocateOperator::new(RelocateOperatorParams {
            from_route: RouteIdx::new(0),
            from: 1,
            to_route: RouteIdx::new(0),
            to: 5,
        });

        let distance = solution.total_distance() as f64;
        let delta = operator.delta(&solution, &ArcCosts::distance(&problem));
        operator.apply(&mut solution);

        assert_eq!(test_utils::route_nodes(&solution, 0), vec![1, 3, 4, 5, 2]);
        assert_eq!(solution.total_distance() as f64, distance + delta);
        assert!(delta < 0.0);
    }

    #[test]
    fn test_relocate_backwards() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0), (5, 1.0)],
            &[10.0],
        ));
        let mut solution = test_utils::create_test_solution(&problem, vec![vec![1, 2, 3, 4, 5]]);

        let operator = RelocateOperator::new(RelocateOperatorParams {
            from_route: RouteIdx::new(0),
            from: 3,
            to_route: RouteIdx::new(0),
            to: 2,
        });

        let distance = solution.total_distance() as f64;
        let delta = operator.delta(&solution, &ArcCosts::distance(&problem));
        operator.apply(&mut solution);

        assert_eq!(test_utils::route_nodes(&solution, 0), vec![1, 2, 4, 3, 5]);
        assert_eq!(solution.total_distance() as f64, distance + delta);
    }

    #[test]
    fn test_inter_relocate() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 2.0), (2, 2.0), (8, 2.0), (9, 2.0)],
            &[10.0, 10.0],
        ));
        let mut solution =
            test_utils::create_test_solution(&problem, vec![vec![1, 3, 2], vec![4]]);

        let operator = RelocateOperator::new(RelocateOperatorParams {
            from_route: RouteIdx::new(0),
            from: 1,
            to_route: RouteIdx::new(1),
            to: 0,
        });

        let distance = solution.total_distance() as f64;
        let delta = operator.delta(&solution, &ArcCosts::distance(&problem));
        assert!(operator.is_valid(&solution));
        operator.apply(&mut solution);

        assert_eq!(test_utils::route_nodes(&solution, 0), vec![1, 2]);
        assert_eq!(test_utils::route_nodes(&solution, 1), vec![3, 4]);
        assert_eq!(solution.total_distance() as f64, distance + delta);
        assert_eq!(solution.route(RouteIdx::new(1)).load(), 4000);
    }

    #[test]
    fn test_inter_relocate_over_capacity() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 6.0), (2, 6.0)],
            &[10.0, 10.0],
        ));
        let solution = test_utils::create_test_solution(&problem, vec![vec![1], vec![2]]);

        let operator = RelocateOperator::new(RelocateOperatorParams {
            from_route: RouteIdx::new(0),
            from: 0,
            to_route: RouteIdx::new(1),
            to: 1,
        });

        assert!(!operator.is_valid(&solution));
    }

    #[test]
    fn test_generated_moves_skip_identity() {
        let problem = Arc::new(test_utils::create_line_problem(
            &[(1, 1.0), (2, 1.0), (3, 1.0)],
            &[10.0],
        ));
        let solution = test_utils::create_test_solution(&problem, vec![vec![1, 2, 3]]);

        let mut count = 0;
        RelocateOperator::generate_moves(&solution, (RouteIdx::new(0), RouteIdx::new(0)), |op| {
            assert!(op.params.from != op.params.to && op.params.from + 1 != op.params.to);
            count += 1;
        });

        // 3 points, 4 slots each, minus the 2 slots that leave the point in place
        assert_eq!(count, 6);
    }
}
