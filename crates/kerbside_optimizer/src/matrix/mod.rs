pub mod matrix_builder;

pub use matrix_builder::{build_distance_matrix, node_coordinates};
