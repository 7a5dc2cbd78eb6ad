use serde::Serialize;

use crate::problem::coordinate::Coordinate;

/// Start and end location of every route. Always node 0.
#[derive(Debug, Clone, Serialize)]
pub struct Depot {
    name: String,
    coordinate: Coordinate,
}

impl Depot {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }
}
