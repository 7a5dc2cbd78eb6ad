use crate::solver::solver_params::SolverParams;

/// Fuel rate used for vehicles without their own consumption, in L/100km.
pub const DEFAULT_FUEL_CONSUMPTION: f64 = 8.0;

/// Travel time assumed per kilometer when the routing provider can't answer.
pub const FALLBACK_MINUTES_PER_KM: f64 = 2.0;

#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    pub solver: SolverParams,
    pub default_fuel_consumption: f64,
    pub fallback_minutes_per_km: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            solver: SolverParams::default(),
            default_fuel_consumption: DEFAULT_FUEL_CONSUMPTION,
            fallback_minutes_per_km: FALLBACK_MINUTES_PER_KM,
        }
    }
}
