use serde::Serialize;

use crate::problem::coordinate::Coordinate;

/// Volume assumed for a report without an estimate.
pub const DEFAULT_DEMAND: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WastePoint {
    id: String,
    coordinate: Coordinate,
    demand: f64,
    category: Option<String>,
}

impl WastePoint {
    pub fn new(id: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
            demand: DEFAULT_DEMAND,
            category: None,
        }
    }

    pub fn with_demand(mut self, demand: f64) -> Self {
        self.demand = demand;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

pub fn total_demand(points: &[WastePoint]) -> f64 {
    points.iter().map(|point| point.demand).sum()
}
