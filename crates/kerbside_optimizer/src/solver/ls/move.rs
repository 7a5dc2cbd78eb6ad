use smallvec::SmallVec;

use crate::{
    problem::distance_matrix::Distance,
    solver::{
        arc_costs::ArcCosts,
        ls::{
            relocate::RelocateOperator, swap::SwapOperator, two_opt::TwoOptOperator,
            two_opt_star::TwoOptStarOperator,
        },
        solution::{route::RouteIdx, working_solution::WorkingSolution},
    },
};

pub trait LocalSearchOperator: Sized {
    /// Emits every move of this kind between the two routes. `r1 == r2` asks
    /// for intra-route moves.
    fn generate_moves<C>(solution: &WorkingSolution, pair: (RouteIdx, RouteIdx), consumer: C)
    where
        C: FnMut(Self);

    /// Cost change of `route` if the move were applied.
    fn route_delta(&self, solution: &WorkingSolution, costs: &ArcCosts, route_id: RouteIdx)
    -> f64;

    /// Cost change of the whole solution, negative when the move improves it.
    fn delta(&self, solution: &WorkingSolution, costs: &ArcCosts) -> f64 {
        self.updated_routes()
            .into_iter()
            .map(|route_id| self.route_delta(solution, costs, route_id))
            .sum()
    }

    /// Capacity check of the updated routes.
    fn is_valid(&self, solution: &WorkingSolution) -> bool;

    fn respects_distance_limit(&self, solution: &WorkingSolution, limit: Distance) -> bool {
        let costs = ArcCosts::distance(solution.problem());

        self.updated_routes().into_iter().all(|route_id| {
            let distance = solution.route(route_id).distance() as f64
                + self.route_delta(solution, &costs, route_id);
            distance <= limit as f64
        })
    }

    fn apply(&self, solution: &mut WorkingSolution);

    fn updated_routes(&self) -> SmallVec<[RouteIdx; 2]>;
}

#[derive(Debug)]
pub enum LocalSearchMove {
    /// Moves one point to another position, in the same route or another one.
    Relocate(RelocateOperator),
    /// Exchanges two points, in the same route or across two routes.
    Swap(SwapOperator),
    /// Reverses a segment of a route.
    TwoOpt(TwoOptOperator),
    /// Exchanges the tails of two routes.
    TwoOptStar(TwoOptStarOperator),
}

impl LocalSearchMove {
    pub fn operator_name(&self) -> &'static str {
        match self {
            LocalSearchMove::Relocate(op) if op.is_intra_route() => "Relocate",
            LocalSearchMove::Relocate(_) => "Inter-Relocate",
            LocalSearchMove::Swap(op) if op.is_intra_route() => "Swap",
            LocalSearchMove::Swap(_) => "Inter-Swap",
            LocalSearchMove::TwoOpt(_) => "Two-Opt",
            LocalSearchMove::TwoOptStar(_) => "Two-Opt*",
        }
    }

    pub fn delta(&self, solution: &WorkingSolution, costs: &ArcCosts) -> f64 {
        match self {
            LocalSearchMove::Relocate(op) => op.delta(solution, costs),
            LocalSearchMove::Swap(op) => op.delta(solution, costs),
            LocalSearchMove::TwoOpt(op) => op.delta(solution, costs),
            LocalSearchMove::TwoOptStar(op) => op.delta(solution, costs),
        }
    }

    pub fn is_valid(&self, solution: &WorkingSolution) -> bool {
        match self {
            LocalSearchMove::Relocate(op) => op.is_valid(solution),
            LocalSearchMove::Swap(op) => op.is_valid(solution),
            LocalSearchMove::TwoOpt(op) => op.is_valid(solution),
            LocalSearchMove::TwoOptStar(op) => op.is_valid(solution),
        }
    }

    pub fn apply(&self, solution: &mut WorkingSolution) {
        match self {
            LocalSearchMove::Relocate(op) => op.apply(solution),
            LocalSearchMove::Swap(op) => op.apply(solution),
            LocalSearchMove::TwoOpt(op) => op.apply(solution),
            LocalSearchMove::TwoOptStar(op) => op.apply(solution),
        }
    }

    pub fn updated_routes(&self) -> SmallVec<[RouteIdx; 2]> {
        match self {
            LocalSearchMove::Relocate(op) => op.updated_routes(),
            LocalSearchMove::Swap(op) => op.updated_routes(),
            LocalSearchMove::TwoOpt(op) => op.updated_routes(),
            LocalSearchMove::TwoOptStar(op) => op.updated_routes(),
        }
    }
}
