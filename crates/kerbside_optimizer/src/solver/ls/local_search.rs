use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{Level, debug, instrument};

use crate::{
    problem::distance_matrix::Distance,
    solver::{
        arc_costs::{ArcCosts, Penalties},
        ls::{
            r#move::{LocalSearchMove, LocalSearchOperator},
            relocate::RelocateOperator,
            swap::SwapOperator,
            two_opt::TwoOptOperator,
            two_opt_star::TwoOptStarOperator,
        },
        solution::{route::RouteIdx, working_solution::WorkingSolution},
        solver_params::SolverParams,
    },
};

type RoutePair = (RouteIdx, RouteIdx);

/// Smallest cost decrease accepted as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-6;

pub struct LocalSearch {
    maximum_route_distance: Option<Distance>,
    pairs: Vec<RoutePair>,
}

impl LocalSearch {
    pub fn new(params: &SolverParams) -> Self {
        Self {
            maximum_route_distance: params.maximum_route_distance,
            pairs: Vec::new(),
        }
    }

    /// Applies the best improving move over every route pair until none is
    /// left or `should_stop` returns true. Moves are evaluated on the matrix
    /// distance, augmented with `penalties` when given.
    ///
    /// Returns the number of applied moves.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run<F>(
        &mut self,
        solution: &mut WorkingSolution,
        penalties: Option<(&Penalties, f64)>,
        should_stop: F,
    ) -> usize
    where
        F: Fn() -> bool,
    {
        // The problem outlives the mutable borrows of the solution below
        let problem = solution.problem_arc();
        let costs = ArcCosts::new(&problem, penalties);

        let mut applied = 0;

        while !should_stop() {
            self.build_pairs(solution);

            let Some((delta, best_move)) = self.find_best_move(solution, &costs) else {
                break;
            };

            debug!(
                operator = best_move.operator_name(),
                routes = ?best_move.updated_routes(),
                delta,
                "Applying move"
            );

            best_move.apply(solution);
            applied += 1;
        }

        debug!(applied, "Local search finished");

        applied
    }

    fn build_pairs(&mut self, solution: &WorkingSolution) {
        self.pairs.clear();

        let routes = solution.active_route_ids();
        for &r1 in &routes {
            for &r2 in &routes {
                if r1 == r2 && solution.route(r1).is_empty() {
                    continue;
                }

                self.pairs.push((r1, r2));
            }
        }
    }

    fn find_best_move(
        &self,
        solution: &WorkingSolution,
        costs: &ArcCosts,
    ) -> Option<(f64, LocalSearchMove)> {
        let results = self
            .pairs
            .par_iter()
            .map(|&pair| self.find_best_move_for_pair(solution, costs, pair))
            .collect::<Vec<_>>();

        // Sequential reduction keeps the first of equal moves, whatever the scheduling
        results
            .into_iter()
            .flatten()
            .fold(None, |best, candidate| match best {
                Some(best) if best.0 <= candidate.0 => Some(best),
                _ => Some(candidate),
            })
    }

    fn find_best_move_for_pair(
        &self,
        solution: &WorkingSolution,
        costs: &ArcCosts,
        pair: RoutePair,
    ) -> Option<(f64, LocalSearchMove)> {
        let mut best = None;

        self.evaluate::<RelocateOperator>(solution, costs, pair, LocalSearchMove::Relocate, &mut best);
        self.evaluate::<SwapOperator>(solution, costs, pair, LocalSearchMove::Swap, &mut best);
        self.evaluate::<TwoOptOperator>(solution, costs, pair, LocalSearchMove::TwoOpt, &mut best);
        self.evaluate::<TwoOptStarOperator>(
            solution,
            costs,
            pair,
            LocalSearchMove::TwoOptStar,
            &mut best,
        );

        best
    }

    fn evaluate<O>(
        &self,
        solution: &WorkingSolution,
        costs: &ArcCosts,
        pair: RoutePair,
        wrap: fn(O) -> LocalSearchMove,
        best: &mut Option<(f64, LocalSearchMove)>,
    ) where
        O: LocalSearchOperator,
    {
        O::generate_moves(solution, pair, |op| {
            let best_delta = best
                .as_ref()
                .map_or(-IMPROVEMENT_EPSILON, |(delta, _)| *delta);

            let delta = op.delta(solution, costs);
            if delta < best_delta && self.is_feasible(&op, solution) {
                *best = Some((delta, wrap(op)));
            }
        });
    }

    fn is_feasible<O: LocalSearchOperator>(&self, op: &O, solution: &WorkingSolution) -> bool {
        op.is_valid(solution)
            && self
                .maximum_route_distance
                .is_none_or(|limit| op.respects_distance_limit(solution, limit))
    }
}
