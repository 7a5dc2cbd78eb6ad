pub mod coordinate;
pub mod depot;
pub mod distance_matrix;
pub mod fleet;
pub mod load;
pub mod routing_problem;
pub mod vehicle;
pub mod waste_point;
