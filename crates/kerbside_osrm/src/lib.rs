pub mod client;
pub mod types;

pub use client::{OsrmClient, OsrmClientParams, OsrmError};
pub use types::{OsrmRoute, OsrmTable};
