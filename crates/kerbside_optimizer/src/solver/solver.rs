use std::sync::Arc;

use jiff::Timestamp;
use tracing::{Level, debug, info, instrument};

use crate::{
    problem::routing_problem::RoutingProblem,
    solver::{
        construction::construct_solution, error::SolveError,
        guided_local_search::GuidedLocalSearch, route_assignment::RouteAssignment,
        solution::working_solution::WorkingSolution, solver_params::SolverParams,
    },
    timed_stage,
    utils::stop_flag::StopFlag,
};

pub struct Solver {
    problem: Arc<RoutingProblem>,
    params: SolverParams,
    stop_flag: StopFlag,
}

impl Solver {
    pub fn new(problem: RoutingProblem, params: SolverParams) -> Self {
        Self {
            problem: Arc::new(problem),
            params,
            stop_flag: StopFlag::new(),
        }
    }

    /// Shares an existing flag, so that the caller can stop the search.
    pub fn with_stop_flag(mut self, stop_flag: StopFlag) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    pub fn stop_flag(&self) -> &StopFlag {
        &self.stop_flag
    }

    pub fn problem(&self) -> &RoutingProblem {
        &self.problem
    }

    /// One assignment per vehicle instance, in instance order. Unused
    /// instances get a `[depot, depot]` route.
    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn solve(&self) -> Result<Vec<RouteAssignment>, SolveError> {
        let start = Timestamp::now();

        self.check_capacities()?;

        if self.problem.num_points() == 0 {
            debug!("No points to route");
            return Ok(WorkingSolution::new(Arc::clone(&self.problem)).into_assignments());
        }

        let initial = timed_stage!(
            "construction",
            construct_solution(
                &self.problem,
                self.params.maximum_route_distance,
                || self.abort_reason(start)
            )
        )?;

        info!(
            distance = initial.total_distance(),
            routes = initial.non_empty_routes_iter().count(),
            "Initial solution constructed"
        );

        let best = timed_stage!(
            "guided_local_search",
            GuidedLocalSearch::new(&self.params, &self.stop_flag).run(initial, start)
        )?;

        info!(
            distance = best.total_distance(),
            routes = best.non_empty_routes_iter().count(),
            "Solved in {:?}",
            Timestamp::now().duration_since(start)
        );

        Ok(best.into_assignments())
    }

    /// Points are never split across routes, so a point larger than every
    /// vehicle instance can't be served.
    fn check_capacities(&self) -> Result<(), SolveError> {
        let max_capacity = self.problem.max_capacity();

        for node in self.problem.points_iter() {
            let demand = self.problem.demand(node);
            if demand > max_capacity {
                return Err(SolveError::PointExceedsCapacity {
                    node,
                    demand,
                    max_capacity,
                });
            }
        }

        match self.problem.points_iter().next() {
            Some(node) if self.problem.vehicles().is_empty() => {
                Err(SolveError::NoFeasibleAssignment { node })
            }
            _ => Ok(()),
        }
    }

    fn abort_reason(&self, start: Timestamp) -> Option<SolveError> {
        if self.stop_flag.is_stopped() {
            return Some(SolveError::Cancelled);
        }

        self.params
            .time_limit()
            .filter(|&limit| Timestamp::now().duration_since(start) > limit)
            .map(|_| SolveError::Timeout)
    }
}
