use thiserror::Error;

/// Internal reason of an infeasible routing, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum InfeasibilityCause {
    /// The point alone is larger than every vehicle.
    PointExceedsCapacity { point_id: String, demand: f64 },
    /// Capacity packing failed with this point left over.
    NoFeasibleAssignment { point_id: String },
    /// The time budget ran out before any feasible assignment was found.
    Timeout,
}

impl std::fmt::Display for InfeasibilityCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibilityCause::PointExceedsCapacity { point_id, demand } => {
                write!(f, "point {point_id} with demand {demand} exceeds every vehicle capacity")
            }
            InfeasibilityCause::NoFeasibleAssignment { point_id } => {
                write!(f, "point {point_id} could not be assigned without exceeding capacity")
            }
            InfeasibilityCause::Timeout => write!(f, "time budget exhausted"),
        }
    }
}

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error(
        "No feasible routing for a total demand of {total_demand} with a capacity of {total_capacity}: {cause}"
    )]
    InfeasibleRouting {
        total_demand: f64,
        total_capacity: f64,
        cause: InfeasibilityCause,
    },

    #[error("Optimization was cancelled")]
    Cancelled,

    #[error("Solver task failed: {0}")]
    SolverTask(#[from] tokio::task::JoinError),
}
