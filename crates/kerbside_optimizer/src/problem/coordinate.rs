use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance in kilometers.
    pub fn haversine_km(&self, to: &Coordinate) -> f64 {
        haversine_km(self, to)
    }
}

/// Great-circle distance between two coordinates in kilometers, on a sphere of
/// radius [`EARTH_RADIUS_KM`].
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let from_lat = from.lat.to_radians();
    let to_lat = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

impl From<&Coordinate> for geo_types::Point<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.lon, coordinate.lat)
    }
}

impl From<geo_types::Coord<f64>> for Coordinate {
    fn from(coord: geo_types::Coord<f64>) -> Self {
        Coordinate::from_lat_lon(coord.y, coord.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinate::from_lat_lon(50.85, 4.35);
        assert_eq!(point.haversine_km(&point), 0.0);
    }

    #[test]
    fn test_haversine_along_equator() {
        let from = Coordinate::from_lat_lon(0.0, 0.0);
        let to = Coordinate::from_lat_lon(0.0, 1.0);

        // One degree of longitude on the equator
        let expected = EARTH_RADIUS_KM * 1f64.to_radians();
        assert!((haversine_km(&from, &to) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_brussels_paris() {
        let brussels = Coordinate::from_lat_lon(50.8503, 4.3517);
        let paris = Coordinate::from_lat_lon(48.8566, 2.3522);

        let distance = haversine_km(&brussels, &paris);
        assert!((distance - 264.0).abs() < 2.0, "{distance}");
        assert_eq!(distance, haversine_km(&paris, &brussels));
    }

    #[test]
    fn test_point_conversion() {
        let point: geo_types::Point = (&Coordinate::from_lat_lon(50.0, 4.0)).into();
        assert_eq!(point.x(), 4.0);
        assert_eq!(point.y(), 50.0);
    }
}
