use smallvec::{SmallVec, smallvec};

use crate::solver::{
    arc_costs::ArcCosts,
    ls::r#move::LocalSearchOperator,
    solution::{route::RouteIdx, working_solution::WorkingSolution},
};

/// **Swap**
///
/// Exchanges the point at `first` of `first_route` with the point at `second`
/// of `second_route`.
///
/// ```text
/// BEFORE:
///    ... (A) -> [P] -> (B) ... (C) -> [Q] -> (D) ...
///
/// AFTER:
///    ... (A) -> [Q] -> (B) ... (C) -> [P] -> (D) ...
/// ```
#[derive(Debug)]
pub struct SwapOperator {
    params: SwapOperatorParams,
}

#[derive(Debug)]
pub struct SwapOperatorParams {
    pub first_route: RouteIdx,
    pub first: usize,
    pub second_route: RouteIdx,
    pub second: usize,
}

impl SwapOperator {
    pub fn new(params: SwapOperatorParams) -> Self {
        debug_assert!(
            params.first_route != params.second_route || params.first < params.second,
            "intra-route swap expects ordered positions"
        );

        Self { params }
    }

    pub fn is_intra_route(&self) -> bool {
        self.params.first_route == self.params.second_route
    }

    fn intra_route_delta(&self, solution: &WorkingSolution, costs: &ArcCosts) -> f64 {
        let route = solution.route(self.params.first_route);
        let (i, j) = (self.params.first, self.params.second);

        let a = route.previous_node(i);
        let p = route.node(i);
        let q = route.node(j);
        let d = route.next_node(j);

        if i + 1 == j {
            // A -> P -> Q -> D becomes A -> Q -> P -> D
            let current = costs.cost(a, p) + costs.cost(p, q) + costs.cost(q, d);
            let new = costs.cost(a, q) + costs.cost(q, p) + costs.cost(p, d);
            return new - current;
        }

        let b = route.next_node(i);
        let c = route.previous_node(j);

        let current = costs.cost(a, p) + costs.cost(p, b) + costs.cost(c, q) + costs.cost(q, d);
        let new = costs.cost(a, q) + costs.cost(q, b) + costs.cost(c, p) + costs.cost(p, d);

        new - current
    }
}

impl LocalSearchOperator for SwapOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        // Inter-route swaps are symmetric, evaluate each pair once
        if r1 > r2 {
            return;
        }

        let first_len = solution.route(r1).len();
        let second_len = solution.route(r2).len();

        for first in 0..first_len {
            let start = if r1 == r2 { first + 1 } else { 0 };

            for second in start..second_len {
                consumer(SwapOperator::new(SwapOperatorParams {
                    first_route: r1,
                    first,
                    second_route: r2,
                    second,
                }));
            }
        }
    }

    fn route_delta(&self, solution: &WorkingSolution, costs: &ArcCosts, route_id: RouteIdx) -> f64 {
        if self.is_intra_route() {
            return self.intra_route_delta(solution, costs);
        }

        let (position, replacement) = if route_id == self.params.first_route {
            (
                self.params.first,
                solution.route(self.params.second_route).node(self.params.second),
            )
        } else {
            (
                self.params.second,
                solution.route(self.params.first_route).node(self.params.first),
            )
        };

        let route = solution.route(route_id);
        let previous = route.previous_node(position);
        let current = route.node(position);
        let next = route.next_node(position);

        costs.cost(previous, replacement) + costs.cost(replacement, next)
            - costs.cost(previous, current)
            - costs.cost(current, next)
    }

    fn is_valid(&self, solution: &WorkingSolution) -> bool {
        if self.is_intra_route() {
            return true;
        }

        let problem = solution.problem();
        let first_route = solution.route(self.params.first_route);
        let second_route = solution.route(self.params.second_route);

        let first_demand = problem.demand(first_route.node(self.params.first));
        let second_demand = problem.demand(second_route.node(self.params.second));

        first_route.load() - first_demand + second_demand <= first_route.capacity()
            && second_route.load() - second_demand + first_demand <= second_route.capacity()
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        solution.swap_nodes(
            (self.params.first_route, self.params.first),
            (self.params.second_route, self.params.second),
        );
    }

    fn updated_routes(&self) -> SmallVec<[RouteIdx; 2]> {
        if self.is_intra_route() {
            smallvec![self.params.first_route]
        } else {
            smallvec![self.params.first_route, self.params.second_route]
        }
    }
}
