use jiff::Timestamp;
use tracing::{Level, debug, info, instrument};

use crate::{
    problem::distance_matrix::NodeIdx,
    solver::{
        arc_costs::Penalties,
        error::SolveError,
        ls::local_search::LocalSearch,
        solution::working_solution::WorkingSolution,
        solver_params::{SolverParams, Termination},
    },
    utils::stop_flag::StopFlag,
};

/// Utilities closer than this are considered equal when picking arcs to penalize.
const UTILITY_EPSILON: f64 = 1e-9;

#[derive(Debug)]
pub struct SearchState {
    start: Timestamp,
    iteration: usize,
    iterations_without_improvement: usize,
}

impl SearchState {
    pub fn new(start: Timestamp) -> Self {
        Self {
            start,
            iteration: 0,
            iterations_without_improvement: 0,
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

fn check_termination(state: &SearchState, termination: &Termination) -> bool {
    match *termination {
        Termination::Duration(max_duration) => {
            Timestamp::now().duration_since(state.start) > max_duration
        }
        Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
        Termination::IterationsWithoutImprovement(max_iterations) => {
            state.iterations_without_improvement >= max_iterations
        }
    }
}

/// Local optimum escape by penalizing the arcs with the highest
/// `distance / (1 + penalty)` utility, then searching on
/// `distance + lambda * penalty`.
pub struct GuidedLocalSearch<'a> {
    params: &'a SolverParams,
    stop_flag: &'a StopFlag,
}

impl<'a> GuidedLocalSearch<'a> {
    pub fn new(params: &'a SolverParams, stop_flag: &'a StopFlag) -> Self {
        Self { params, stop_flag }
    }

    fn should_terminate(&self, state: &SearchState) -> bool {
        self.params.terminations.iter().any(|termination| {
            if check_termination(state, termination) {
                debug!(
                    "Termination condition met: {:?} at iteration {}",
                    termination, state.iteration
                );
                true
            } else {
                false
            }
        })
    }

    /// Wall-clock budget or stop flag, checked between local search moves.
    fn is_interrupted(&self, state: &SearchState) -> bool {
        self.stop_flag.is_stopped()
            || self
                .params
                .time_limit()
                .is_some_and(|limit| Timestamp::now().duration_since(state.start) > limit)
    }

    /// Returns the best solution found by real distance. An empty termination
    /// list runs until the stop flag is set.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run(
        &self,
        initial: WorkingSolution,
        start: Timestamp,
    ) -> Result<WorkingSolution, SolveError> {
        let mut state = SearchState::new(start);
        let mut local_search = LocalSearch::new(self.params);

        let mut current = initial;
        local_search.run(&mut current, None, || self.is_interrupted(&state));
        self.check_cancelled()?;

        let mut best = current.clone();
        info!(distance = best.total_distance(), "First local optimum found");

        let arcs = best.arcs_count();
        if arcs == 0 {
            return Ok(best);
        }

        let lambda = self.params.penalty_factor * best.total_distance() as f64 / arcs as f64;
        if lambda <= 0.0 {
            // Every arc of the optimum is free, penalties would not change anything
            return Ok(best);
        }

        let mut penalties = Penalties::new(current.problem().num_nodes());

        while !self.should_terminate(&state) {
            if self.is_interrupted(&state) {
                break;
            }

            state.iteration += 1;

            penalize_max_utility_arcs(&current, &mut penalties);
            local_search.run(&mut current, Some((&penalties, lambda)), || {
                self.is_interrupted(&state)
            });

            if current.total_distance() < best.total_distance() {
                debug!(
                    iteration = state.iteration,
                    distance = current.total_distance(),
                    "New best solution"
                );

                best = current.clone();
                state.iterations_without_improvement = 0;
            } else {
                state.iterations_without_improvement += 1;
            }
        }

        self.check_cancelled()?;

        info!(
            iterations = state.iteration(),
            penalties = penalties.total(),
            distance = best.total_distance(),
            "Guided local search finished"
        );

        Ok(best)
    }

    fn check_cancelled(&self) -> Result<(), SolveError> {
        if self.stop_flag.is_stopped() {
            Err(SolveError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn penalize_max_utility_arcs(solution: &WorkingSolution, penalties: &mut Penalties) {
    let problem = solution.problem();

    let utility = |from: NodeIdx, to: NodeIdx| {
        problem.distance(from, to) as f64 / (1.0 + penalties.get(from, to) as f64)
    };

    let max_utility = solution
        .non_empty_routes_iter()
        .flat_map(|route| route.arcs())
        .map(|(from, to)| utility(from, to))
        .fold(0.0, f64::max);

    let arcs = solution
        .non_empty_routes_iter()
        .flat_map(|route| route.arcs())
        .filter(|&(from, to)| max_utility - utility(from, to) <= UTILITY_EPSILON)
        .collect::<Vec<_>>();

    for (from, to) in arcs {
        penalties.increment(from, to);
    }
}
