pub mod arc_costs;
pub mod construction;
pub mod error;
pub mod guided_local_search;
pub mod ls;
pub mod route_assignment;
pub mod solution;
pub mod solver;
pub mod solver_params;
