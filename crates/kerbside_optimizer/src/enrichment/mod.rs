pub mod itinerary;
pub mod route_enricher;

pub use itinerary::Itinerary;
pub use route_enricher::RouteEnricher;
