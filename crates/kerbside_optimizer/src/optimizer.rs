use tracing::{Level, info, instrument};

use crate::{
    config::OptimizerConfig,
    enrichment::{Itinerary, RouteEnricher},
    error::{InfeasibilityCause, OptimizerError},
    matrix::build_distance_matrix,
    problem::{
        depot::Depot,
        distance_matrix::NodeIdx,
        fleet::{expand_fleet, usable_capacity},
        load::{Load, from_fixed_point, to_fixed_point},
        routing_problem::RoutingProblem,
        vehicle::Vehicle,
        waste_point::{WastePoint, total_demand},
    },
    routing::RoutingProvider,
    solver::{
        error::SolveError, route_assignment::RouteAssignment, solver::Solver,
        solver_params::SolverParams,
    },
    timed_stage,
    utils::stop_flag::StopFlag,
};

/// Depot, points and fleet in, itineraries out: distance matrix, fleet
/// expansion, solve and enrichment, one after the other.
pub struct Optimizer<P> {
    provider: P,
    config: OptimizerConfig,
}

impl<P> Optimizer<P>
where
    P: RoutingProvider,
{
    pub fn new(provider: P, config: OptimizerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub async fn optimize(
        &self,
        depot: &Depot,
        points: &[WastePoint],
        vehicles: &[Vehicle],
    ) -> Result<Vec<Itinerary>, OptimizerError> {
        self.optimize_with_stop_flag(depot, points, vehicles, &StopFlag::new())
            .await
    }

    /// Same as [`Optimizer::optimize`], `stop_flag` aborts the solve. Dropping
    /// the returned future raises it as well.
    #[instrument(skip_all, fields(points = points.len(), vehicles = vehicles.len()), level = Level::INFO)]
    pub async fn optimize_with_stop_flag(
        &self,
        depot: &Depot,
        points: &[WastePoint],
        vehicles: &[Vehicle],
        stop_flag: &StopFlag,
    ) -> Result<Vec<Itinerary>, OptimizerError> {
        if points.is_empty() {
            info!("No points to collect");
            return Ok(Vec::new());
        }

        let matrix = timed_stage!(
            "distance_matrix",
            build_distance_matrix(&self.provider, depot, points).await
        );

        let demands: Vec<Load> = points
            .iter()
            .map(|point| to_fixed_point(point.demand()))
            .collect();
        let instances = expand_fleet(vehicles, demands.iter().sum()).into_instances();

        let problem = RoutingProblem::new(matrix, demands, instances.clone());

        let assignments = self
            .solve(problem, stop_flag)
            .await?
            .map_err(|error| Self::infeasible(error, points, vehicles))?;

        let enricher = RouteEnricher::new(
            &self.provider,
            &self.config,
            depot,
            points,
            vehicles,
            &instances,
        );
        let itineraries = timed_stage!("enrichment", enricher.enrich(&assignments).await);

        info!(
            itineraries = itineraries.len(),
            distance_km = itineraries.iter().map(|itinerary| itinerary.distance_km()).sum::<f64>(),
            "Optimization finished"
        );

        Ok(itineraries)
    }

    /// Runs the solver on the blocking pool. The solver shares `stop_flag`,
    /// which is raised if this future is dropped before the solve returns.
    async fn solve(
        &self,
        problem: RoutingProblem,
        stop_flag: &StopFlag,
    ) -> Result<Result<Vec<RouteAssignment>, SolveError>, OptimizerError> {
        let params: SolverParams = self.config.solver.clone();
        let solver = Solver::new(problem, params).with_stop_flag(stop_flag.clone());

        let guard = stop_flag.stop_on_drop();
        let result = tokio::task::spawn_blocking(move || solver.solve()).await;
        guard.disarm();

        Ok(result?)
    }

    fn infeasible(error: SolveError, points: &[WastePoint], vehicles: &[Vehicle]) -> OptimizerError {
        let point_id = |node: NodeIdx| points[node.get() - 1].id().to_string();

        let cause = match error {
            SolveError::Cancelled => return OptimizerError::Cancelled,
            SolveError::PointExceedsCapacity { node, demand, .. } => {
                InfeasibilityCause::PointExceedsCapacity {
                    point_id: point_id(node),
                    demand: from_fixed_point(demand),
                }
            }
            SolveError::NoFeasibleAssignment { node } => InfeasibilityCause::NoFeasibleAssignment {
                point_id: point_id(node),
            },
            SolveError::Timeout => InfeasibilityCause::Timeout,
        };

        OptimizerError::InfeasibleRouting {
            total_demand: total_demand(points),
            total_capacity: usable_capacity(vehicles),
            cause,
        }
    }
}
