pub mod config;
pub mod enrichment;
pub mod error;
pub mod json;
pub mod matrix;
pub mod optimizer;
pub mod problem;
pub mod routing;
pub mod solver;
mod utils;

pub use utils::stop_flag::StopFlag;

#[cfg(test)]
pub(crate) mod test_utils;
