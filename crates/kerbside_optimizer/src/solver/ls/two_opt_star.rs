use smallvec::{SmallVec, smallvec};

use crate::solver::{
    arc_costs::ArcCosts,
    ls::r#move::LocalSearchOperator,
    solution::{route::RouteIdx, working_solution::WorkingSolution},
};

/// **2-Opt\***
///
/// Cuts both routes and exchanges their tails: the first route keeps its
/// points before `first` and continues with the tail of the second route
/// from `second`, and the other way around.
///
/// ```text
/// BEFORE:
///    R1: (A1) -> [B1] -> ...      R2: (A2) -> [B2] -> ...
///
/// AFTER:
///    R1: (A1) -> [B2] -> ...      R2: (A2) -> [B1] -> ...
/// ```
#[derive(Debug)]
pub struct TwoOptStarOperator {
    params: TwoOptStarOperatorParams,
}

#[derive(Debug)]
pub struct TwoOptStarOperatorParams {
    pub first_route: RouteIdx,
    pub first: usize,
    pub second_route: RouteIdx,
    pub second: usize,
}

impl TwoOptStarOperator {
    pub fn new(params: TwoOptStarOperatorParams) -> Self {
        debug_assert!(params.first_route != params.second_route);

        Self { params }
    }
}

impl LocalSearchOperator for TwoOptStarOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 >= r2 {
            return;
        }

        let first_len = solution.route(r1).len();
        let second_len = solution.route(r2).len();

        for first in 0..=first_len {
            for second in 0..=second_len {
                // Exchanging whole routes or nothing at all
                if (first == 0 && second == 0) || (first == first_len && second == second_len) {
                    continue;
                }

                consumer(TwoOptStarOperator::new(TwoOptStarOperatorParams {
                    first_route: r1,
                    first,
                    second_route: r2,
                    second,
                }));
            }
        }
    }

    /// Exact cost change of one route, linear in its length.
    fn route_delta(&self, solution: &WorkingSolution, costs: &ArcCosts, route_id: RouteIdx) -> f64 {
        let (kept, kept_cut, other, other_cut) = if route_id == self.params.first_route {
            (
                solution.route(self.params.first_route),
                self.params.first,
                solution.route(self.params.second_route),
                self.params.second,
            )
        } else {
            (
                solution.route(self.params.second_route),
                self.params.second,
                solution.route(self.params.first_route),
                self.params.first,
            )
        };

        let a = kept.previous_node(kept_cut);
        let b = kept.node_or_depot(kept_cut);
        let other_head = other.node_or_depot(other_cut);

        let current = kept.cost(costs);
        let head = current - kept.suffix_cost(costs, kept_cut) - costs.cost(a, b);
        let new = head + costs.cost(a, other_head) + other.suffix_cost(costs, other_cut);

        new - current
    }

    /// Only the four arcs around the cuts change.
    fn delta(&self, solution: &WorkingSolution, costs: &ArcCosts) -> f64 {
        let first_route = solution.route(self.params.first_route);
        let second_route = solution.route(self.params.second_route);

        let a1 = first_route.previous_node(self.params.first);
        let b1 = first_route.node_or_depot(self.params.first);
        let a2 = second_route.previous_node(self.params.second);
        let b2 = second_route.node_or_depot(self.params.second);

        costs.cost(a1, b2) + costs.cost(a2, b1) - costs.cost(a1, b1) - costs.cost(a2, b2)
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        let problem = solution.problem();
        let first_route = solution.route(self.params.first_route);
        let second_route = solution.route(self.params.second_route);

        let first_head = first_route.prefix_load(problem, self.params.first);
        let second_head = second_route.prefix_load(problem, self.params.second);
        let first_tail = first_route.load() - first_head;
        let second_tail = second_route.load() - second_head;

        first_head + second_tail <= first_route.capacity()
            && second_head + first_tail <= second_route.capacity()
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        let first_route = solution.route(self.params.first_route);
        let second_route = solution.route(self.params.second_route);

        let (first_head, first_tail) = first_route.nodes().split_at(self.params.first);
        let (second_head, second_tail) = second_route.nodes().split_at(self.params.second);

        let first_nodes = [first_head, second_tail].concat();
        let second_nodes = [second_head, first_tail].concat();

        solution.replace_route_nodes(self.params.first_route, first_nodes);
        solution.replace_route_nodes(self.params.second_route, second_nodes);
    }

    fn updated_routes(&self) -> SmallVec<[RouteIdx; 2]> {
        smallvec![self.params.first_route, self.params.second_route]
    }
}
