use smallvec::{SmallVec, smallvec};

use crate::solver::{
    arc_costs::ArcCosts,
    ls::r#move::LocalSearchOperator,
    solution::{route::RouteIdx, working_solution::WorkingSolution},
};

/// **2-Opt**
///
/// Reverses the segment between `from` and `to` (both included).
///
/// ```text
/// BEFORE:
///    (A) -> [from] -> (B) -> (C) -> [to] -> (D)
///
/// AFTER:
///    (A) -> [to] -> (C) -> (B) -> [from] -> (D)
/// ```
///
/// Arcs inside the segment are traversed backwards afterwards, so their cost
/// is re-evaluated for asymmetric matrices.
#[derive(Debug)]
pub struct TwoOptOperator {
    params: TwoOptOperatorParams,
}

#[derive(Debug)]
pub struct TwoOptOperatorParams {
    pub route_id: RouteIdx,
    pub from: usize,
    pub to: usize,
}

impl TwoOptOperator {
    pub fn new(params: TwoOptOperatorParams) -> Self {
        debug_assert!(params.from < params.to, "2-opt segment must hold two points");

        Self { params }
    }
}

impl LocalSearchOperator for TwoOptOperator {
    fn generate_moves<C>(solution: &WorkingSolution, (r1, r2): (RouteIdx, RouteIdx), mut consumer: C)
    where
        C: FnMut(Self),
    {
        if r1 != r2 {
            return;
        }

        let len = solution.route(r1).len();

        for from in 0..len {
            for to in from + 1..len {
                consumer(TwoOptOperator::new(TwoOptOperatorParams {
                    route_id: r1,
                    from,
                    to,
                }));
            }
        }
    }

    fn route_delta(&self, solution: &WorkingSolution, costs: &ArcCosts, _route_id: RouteIdx) -> f64 {
        let route = solution.route(self.params.route_id);
        let (from, to) = (self.params.from, self.params.to);

        let a = route.previous_node(from);
        let d = route.next_node(to);
        let first = route.node(from);
        let last = route.node(to);

        let segment = &route.nodes()[from..=to];
        let (forward, backward) = segment
            .windows(2)
            .fold((0.0, 0.0), |(forward, backward), arc| {
                (
                    forward + costs.cost(arc[0], arc[1]),
                    backward + costs.cost(arc[1], arc[0]),
                )
            });

        let current = costs.cost(a, first) + forward + costs.cost(last, d);
        let new = costs.cost(a, last) + backward + costs.cost(first, d);

        new - current
    }

    fn is_valid(&self, _solution: &WorkingSolution) -> bool {
        true
    }

    fn apply(&self, solution: &mut WorkingSolution) {
        solution.reverse_segment(self.params.route_id, self.params.from, self.params.to);
    }

    fn updated_routes(&self) -> SmallVec<[RouteIdx; 2]> {
        smallvec![self.params.route_id]
    }
}
