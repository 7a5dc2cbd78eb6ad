use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use kerbside_optimizer::enrichment::Itinerary;

pub fn itineraries_table(itineraries: &[Itinerary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Vehicle",
        "Points",
        "Demand",
        "Distance (km)",
        "Duration",
        "Fuel (L)",
        "Source",
    ]);

    for itinerary in itineraries {
        let points = itinerary
            .points()
            .iter()
            .map(|point| point.id())
            .collect::<Vec<_>>()
            .join(" → ");

        table.add_row(vec![
            Cell::new(itinerary.label()),
            Cell::new(points),
            Cell::new(format!("{:.2}", itinerary.total_demand())).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", itinerary.distance_km())).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:#}", itinerary.duration())),
            Cell::new(format!("{:.2}", itinerary.fuel_liters())).set_alignment(CellAlignment::Right),
            Cell::new(if itinerary.is_estimated() { "estimate" } else { "osrm" }),
        ]);
    }

    let total_distance = itineraries
        .iter()
        .map(|itinerary| itinerary.distance_km())
        .sum::<f64>();
    let total_fuel = itineraries
        .iter()
        .map(|itinerary| itinerary.fuel_liters())
        .sum::<f64>();

    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(itineraries.len().to_string() + " trips"),
        Cell::new(""),
        Cell::new(format!("{total_distance:.2}")).set_alignment(CellAlignment::Right),
        Cell::new(""),
        Cell::new(format!("{total_fuel:.2}")).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    table
}
