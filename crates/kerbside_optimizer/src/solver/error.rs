use thiserror::Error;

use crate::problem::{distance_matrix::NodeIdx, load::Load};

/// Why a solve produced no assignment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("node {node} has demand {demand} but the largest vehicle carries {max_capacity}")]
    PointExceedsCapacity {
        node: NodeIdx,
        demand: Load,
        max_capacity: Load,
    },

    #[error("node {node} could not be assigned to any route without exceeding capacity")]
    NoFeasibleAssignment { node: NodeIdx },

    #[error("time budget exhausted before a feasible assignment was found")]
    Timeout,

    #[error("search was cancelled")]
    Cancelled,
}
