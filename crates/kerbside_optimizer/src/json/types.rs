use serde::Deserialize;

use crate::problem::{
    coordinate::Coordinate, depot::Depot, vehicle::Vehicle, waste_point::WastePoint,
};

/// Optimization request. Coordinates are `[lon, lat]`, as in GeoJSON.
#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename = "OptimizationInput")]
pub struct JsonOptimizationInput {
    pub depot: JsonDepot,
    pub points: Vec<JsonWastePoint>,
    pub vehicles: Vec<JsonVehicle>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename = "Depot")]
pub struct JsonDepot {
    pub name: String,
    pub coordinates: [f64; 2],
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename = "WastePoint")]
pub struct JsonWastePoint {
    pub id: String,
    pub coordinates: [f64; 2],
    pub demand: Option<f64>,
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename = "Vehicle")]
pub struct JsonVehicle {
    pub id: String,
    pub label: String,
    pub capacity: f64,
    pub available: Option<bool>,
    pub fuel_consumption: Option<f64>,
}

fn coordinate([lon, lat]: [f64; 2]) -> Coordinate {
    Coordinate::from_lat_lon(lat, lon)
}

impl From<JsonWastePoint> for WastePoint {
    fn from(value: JsonWastePoint) -> Self {
        let mut point = WastePoint::new(value.id, coordinate(value.coordinates));

        if let Some(demand) = value.demand {
            point = point.with_demand(demand);
        }

        if let Some(category) = value.category {
            point = point.with_category(category);
        }

        point
    }
}

impl From<JsonVehicle> for Vehicle {
    fn from(value: JsonVehicle) -> Self {
        let mut vehicle = Vehicle::new(value.id, value.label, value.capacity);

        if let Some(available) = value.available {
            vehicle.set_available(available);
        }

        if let Some(fuel_consumption) = value.fuel_consumption {
            vehicle.set_fuel_consumption(fuel_consumption);
        }

        vehicle
    }
}

impl JsonOptimizationInput {
    pub fn into_parts(self) -> (Depot, Vec<WastePoint>, Vec<Vehicle>) {
        let depot = Depot::new(self.depot.name, coordinate(self.depot.coordinates));
        let points = self.points.into_iter().map(WastePoint::from).collect();
        let vehicles = self.vehicles.into_iter().map(Vehicle::from).collect();

        (depot, points, vehicles)
    }
}
