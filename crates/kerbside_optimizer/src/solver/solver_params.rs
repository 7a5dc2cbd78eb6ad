use jiff::SignedDuration;

use crate::problem::distance_matrix::Distance;

#[derive(Clone, Debug)]
pub struct SolverParams {
    /// The search stops as soon as one of them is met.
    pub terminations: Vec<Termination>,

    /// Guided local search weight of arc penalties, relative to the average
    /// arc cost of the first local optimum.
    pub penalty_factor: f64,

    /// Upper bound of the cumulative distance of a single route. Unset means
    /// the distance dimension is tracked but never binding.
    pub maximum_route_distance: Option<Distance>,
}

#[derive(Clone, Debug)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::Duration(SignedDuration::from_secs(30)),
                Termination::IterationsWithoutImprovement(10_000),
            ],
            penalty_factor: 0.1,
            maximum_route_distance: None,
        }
    }
}

impl SolverParams {
    /// Wall-clock budget of the search, if any.
    pub fn time_limit(&self) -> Option<SignedDuration> {
        self.terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Duration(duration) => Some(*duration),
                _ => None,
            })
            .min()
    }
}
