use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::types::{ErrorResponse, OsrmRoute, OsrmTable, RouteResponse, TableResponse};

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("OSRM responded with code {code}: {message}")]
    Code { code: String, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Expected a {expected}x{expected} table, got {rows} rows")]
    DimensionMismatch { expected: usize, rows: usize },

    #[error("At least {required} points are required, got {given}")]
    TooFewPoints { required: usize, given: usize },

    #[error("Incomplete response")]
    IncompleteResponse,
}

pub struct OsrmClientParams {
    pub osrm_url: String,
    pub profile: String,
    pub timeout: Duration,
}

impl OsrmClientParams {
    pub fn new(osrm_url: impl Into<String>) -> Self {
        Self {
            osrm_url: osrm_url.into(),
            profile: String::from("driving"),
            timeout: Duration::from_secs(10),
        }
    }
}

pub const OSRM_TABLE_SERVICE: &str = "table";
pub const OSRM_ROUTE_SERVICE: &str = "route";

pub struct OsrmClient {
    params: OsrmClientParams,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(params: OsrmClientParams) -> Result<Self, OsrmError> {
        let client = reqwest::Client::builder()
            .timeout(params.timeout)
            .build()?;

        Ok(Self { params, client })
    }

    pub fn params(&self) -> &OsrmClientParams {
        &self.params
    }

    fn service_url<P>(&self, service: &str, points: &[P]) -> String
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(&format!("/{}/v1/{}/", service, self.params.profile));

        for (i, point) in points.iter().enumerate() {
            let point: geo_types::Point = point.into();
            url.push_str(&format!("{},{}", point.x(), point.y()));

            if i < points.len() - 1 {
                url.push(';');
            }
        }

        url
    }

    pub async fn fetch_table<P>(&self, points: &[P]) -> Result<OsrmTable, OsrmError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.is_empty() {
            return Err(OsrmError::TooFewPoints {
                required: 1,
                given: 0,
            });
        }

        let url = self.service_url(OSRM_TABLE_SERVICE, points);
        debug!("OSRM: requesting table for {} points", points.len());

        let response = self
            .client
            .get(url)
            .query(&[("annotations", "distance,duration")])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        parse_table(&body, points.len())
    }

    pub async fn fetch_route<P>(&self, points: &[P]) -> Result<OsrmRoute, OsrmError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() < 2 {
            return Err(OsrmError::TooFewPoints {
                required: 2,
                given: points.len(),
            });
        }

        let url = self.service_url(OSRM_ROUTE_SERVICE, points);
        debug!("OSRM: requesting route through {} points", points.len());

        let response = self
            .client
            .get(url)
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("steps", "false"),
            ])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        parse_route(&body)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, OsrmError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        // OSRM reports most failures as a JSON body with a code, even on 4xx
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(error) => Err(OsrmError::Code {
                code: error.code,
                message: error.message.unwrap_or_default(),
            }),
            Err(_) => Err(OsrmError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }
}

pub(crate) fn parse_table(body: &str, num_points: usize) -> Result<OsrmTable, OsrmError> {
    let response: TableResponse = serde_json::from_str(body)?;

    if response.code != "Ok" {
        return Err(OsrmError::Code {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let distances = response.distances.ok_or(OsrmError::IncompleteResponse)?;

    if distances.len() != num_points || distances.iter().any(|row| row.len() != num_points) {
        return Err(OsrmError::DimensionMismatch {
            expected: num_points,
            rows: distances.len(),
        });
    }

    Ok(OsrmTable {
        distances,
        durations: response.durations,
    })
}

pub(crate) fn parse_route(body: &str) -> Result<OsrmRoute, OsrmError> {
    let response: RouteResponse = serde_json::from_str(body)?;

    if response.code != "Ok" {
        return Err(OsrmError::Code {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }

    let route = response
        .routes
        .and_then(|routes| routes.into_iter().next())
        .ok_or(OsrmError::IncompleteResponse)?;

    let geometry = route.geometry.ok_or(OsrmError::IncompleteResponse)?;

    Ok(OsrmRoute {
        distance: route.distance,
        duration: route.duration,
        geometry: geo_types::LineString::from(geometry.coordinates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPoint(f64, f64);

    impl From<&TestPoint> for geo_types::Point {
        fn from(point: &TestPoint) -> Self {
            geo_types::Point::new(point.0, point.1)
        }
    }

    fn client(url: &str) -> OsrmClient {
        OsrmClient::new(OsrmClientParams::new(url)).unwrap()
    }

    #[test]
    fn test_service_url() {
        let client = client("http://localhost:5000/");
        let url = client.service_url(
            OSRM_TABLE_SERVICE,
            &[TestPoint(4.35, 50.85), TestPoint(4.4, 50.9)],
        );

        assert_eq!(
            url,
            "http://localhost:5000/table/v1/driving/4.35,50.85;4.4,50.9"
        );
    }

    #[test]
    fn test_parse_table() {
        let body = r#"{
            "code": "Ok",
            "distances": [[0, 1200.5], [1180.2, 0]],
            "durations": [[0, 90.1], [88.0, 0]]
        }"#;

        let table = parse_table(body, 2).unwrap();

        assert_eq!(table.num_points(), 2);
        assert_eq!(table.distances[0][1], Some(1200.5));
        assert_eq!(table.distances[1][0], Some(1180.2));
        assert!(table.durations.is_some());
    }

    #[test]
    fn test_parse_table_unreachable_cells() {
        let body = r#"{"code": "Ok", "distances": [[0, null], [15.0, 0]]}"#;

        let table = parse_table(body, 2).unwrap();

        assert_eq!(table.distances[0][1], None);
        assert_eq!(table.durations, None);
    }

    #[test]
    fn test_parse_table_error_code() {
        let body = r#"{"code": "InvalidQuery", "message": "Query string malformed"}"#;

        let error = parse_table(body, 2).unwrap_err();

        assert!(matches!(error, OsrmError::Code { code, .. } if code == "InvalidQuery"));
    }

    #[test]
    fn test_parse_table_dimension_mismatch() {
        let body = r#"{"code": "Ok", "distances": [[0, 1.0], [1.0, 0]]}"#;

        let error = parse_table(body, 3).unwrap_err();

        assert!(matches!(
            error,
            OsrmError::DimensionMismatch {
                expected: 3,
                rows: 2
            }
        ));
    }

    #[test]
    fn test_parse_table_malformed() {
        let error = parse_table("<html>bad gateway</html>", 2).unwrap_err();

        assert!(matches!(error, OsrmError::Deserialize(_)));
    }

    #[test]
    fn test_parse_route() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 2450.3,
                "duration": 312.7,
                "geometry": {"type": "LineString", "coordinates": [[4.35, 50.85], [4.36, 50.86], [4.35, 50.85]]}
            }]
        }"#;

        let route = parse_route(body).unwrap();

        assert_eq!(route.distance, 2450.3);
        assert_eq!(route.duration, 312.7);
        assert_eq!(route.geometry.0.len(), 3);
        assert_eq!(route.geometry.0[1].x, 4.36);
        assert_eq!(route.geometry.0[1].y, 50.86);
    }

    #[test]
    fn test_parse_route_without_routes() {
        let body = r#"{"code": "Ok", "routes": []}"#;

        assert!(matches!(
            parse_route(body).unwrap_err(),
            OsrmError::IncompleteResponse
        ));
    }

    #[tokio::test]
    async fn test_route_requires_two_points() {
        let client = client("http://127.0.0.1:1");

        let error = client.fetch_route(&[TestPoint(0.0, 0.0)]).await.unwrap_err();

        assert!(matches!(
            error,
            OsrmError::TooFewPoints {
                required: 2,
                given: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = client("http://127.0.0.1:1");

        let error = client
            .fetch_table(&[TestPoint(0.0, 0.0), TestPoint(0.0, 0.01)])
            .await
            .unwrap_err();

        assert!(matches!(error, OsrmError::Request(_)));
    }
}
