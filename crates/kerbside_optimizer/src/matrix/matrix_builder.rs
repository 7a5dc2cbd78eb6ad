use tracing::{Level, debug, instrument, warn};

use crate::{
    problem::{
        coordinate::Coordinate,
        depot::Depot,
        distance_matrix::{Distance, DistanceMatrix, haversine_meters},
        waste_point::WastePoint,
    },
    routing::{DistanceTable, RoutingProvider},
};

/// Longest road distance accepted from a provider, in meters. Ten times the
/// Earth's circumference, anything above is a corrupt cell.
const MAX_TABLE_DISTANCE: f64 = 400_750_000.0;

/// Node list of every matrix and solve: the depot, then the points in input order.
pub fn node_coordinates(depot: &Depot, points: &[WastePoint]) -> Vec<Coordinate> {
    std::iter::once(*depot.coordinate())
        .chain(points.iter().map(|point| *point.coordinate()))
        .collect()
}

/// Builds the `(n + 1) x (n + 1)` matrix in meters from one batched table query.
/// Any provider failure falls back to haversine estimates for every cell.
#[instrument(skip_all, fields(points = points.len()), level = Level::DEBUG)]
pub async fn build_distance_matrix<P>(
    provider: &P,
    depot: &Depot,
    points: &[WastePoint],
) -> DistanceMatrix
where
    P: RoutingProvider,
{
    let coordinates = node_coordinates(depot, points);

    let table = match provider.fetch_table(&coordinates).await {
        Ok(table) => table,
        Err(error) => {
            warn!("Table query failed, falling back to haversine distances: {error:#}");
            return DistanceMatrix::from_haversine(&coordinates);
        }
    };

    match matrix_from_table(&coordinates, table) {
        Ok(matrix) => {
            debug!("Distance matrix built from routing provider");
            matrix
        }
        Err(error) => {
            warn!("Unusable table response, falling back to haversine distances: {error:#}");
            DistanceMatrix::from_haversine(&coordinates)
        }
    }
}

/// Converts a provider table into a matrix. Unroutable or invalid cells are
/// filled with the haversine estimate of that pair only.
fn matrix_from_table(
    coordinates: &[Coordinate],
    table: DistanceTable,
) -> anyhow::Result<DistanceMatrix> {
    let num_nodes = coordinates.len();

    if table.distances.len() != num_nodes
        || table.distances.iter().any(|row| row.len() != num_nodes)
    {
        anyhow::bail!(
            "expected a {num_nodes}x{num_nodes} table, got {} rows",
            table.distances.len()
        );
    }

    let mut patched = 0;
    let mut distances: Vec<Distance> = Vec::with_capacity(num_nodes * num_nodes);

    for (i, row) in table.distances.into_iter().enumerate() {
        for (j, cell) in row.into_iter().enumerate() {
            let distance = match cell {
                Some(value) if (0.0..=MAX_TABLE_DISTANCE).contains(&value) => {
                    value.round() as Distance
                }
                _ => {
                    patched += 1;
                    haversine_meters(&coordinates[i], &coordinates[j])
                }
            };
            distances.push(distance);
        }
    }

    if patched > 0 {
        warn!("{patched} table cells were unroutable or invalid, estimated with haversine distances");
    }

    DistanceMatrix::new(num_nodes, distances)
        .ok_or_else(|| anyhow::anyhow!("table does not match the node count"))
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{distance_matrix::NodeIdx, waste_point::WastePoint},
        routing::{DistanceTable, OfflineProvider},
        test_utils::{self, StaticProvider},
    };

    use super::*;

    fn points() -> Vec<WastePoint> {
        vec![
            test_utils::point("p1", 0.0, 0.01, 4.0),
            test_utils::point("p2", 0.01, 0.02, 4.0),
            test_utils::point("p3", 0.02, -0.03, 4.0),
        ]
    }

    #[tokio::test]
    async fn test_fallback_matches_haversine() {
        let depot = test_utils::depot(0.0, 0.0);
        let points = points();

        let matrix = build_distance_matrix(&OfflineProvider, &depot, &points).await;

        let coordinates = node_coordinates(&depot, &points);
        assert_eq!(matrix.num_nodes(), 4);
        for (i, from) in coordinates.iter().enumerate() {
            for (j, to) in coordinates.iter().enumerate() {
                let expected = (from.haversine_km(to) * 1000.0).round() as u64;
                assert_eq!(
                    matrix.distance(NodeIdx::new(i), NodeIdx::new(j)),
                    expected,
                    "cell ({i}, {j})"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_self_distance_is_zero() {
        let depot = test_utils::depot(0.0, 0.0);
        let points = points();
        let mut table = vec![vec![Some(50.0); 4]; 4];
        table[2][2] = Some(17.0);

        let provider = StaticProvider::with_table(DistanceTable { distances: table });
        let matrix = build_distance_matrix(&provider, &depot, &points).await;

        for i in 0..4 {
            assert_eq!(matrix.distance(NodeIdx::new(i), NodeIdx::new(i)), 0);
        }
        assert_eq!(matrix.distance(NodeIdx::new(1), NodeIdx::new(2)), 50);
    }

    #[tokio::test]
    async fn test_uses_provider_table() {
        let depot = test_utils::depot(0.0, 0.0);
        let points = vec![test_utils::point("p1", 0.0, 0.01, 1.0)];
        let provider = StaticProvider::with_table(DistanceTable {
            distances: vec![vec![Some(0.0), Some(1500.4)], vec![Some(1720.6), Some(0.0)]],
        });

        let matrix = build_distance_matrix(&provider, &depot, &points).await;

        assert_eq!(matrix.distance(NodeIdx::new(0), NodeIdx::new(1)), 1500);
        assert_eq!(matrix.distance(NodeIdx::new(1), NodeIdx::new(0)), 1721);
        assert!(!matrix.is_symmetric());
    }

    #[tokio::test]
    async fn test_unroutable_cells_are_estimated() {
        let depot = test_utils::depot(0.0, 0.0);
        let points = vec![test_utils::point("p1", 0.0, 0.01, 1.0)];
        let provider = StaticProvider::with_table(DistanceTable {
            distances: vec![vec![Some(0.0), None], vec![Some(f64::NAN), Some(0.0)]],
        });

        let matrix = build_distance_matrix(&provider, &depot, &points).await;

        assert_eq!(matrix.distance(NodeIdx::new(0), NodeIdx::new(1)), 1112);
        assert_eq!(matrix.distance(NodeIdx::new(1), NodeIdx::new(0)), 1112);
    }

    #[tokio::test]
    async fn test_oversized_cells_are_estimated() {
        let depot = test_utils::depot(0.0, 0.0);
        let points = vec![test_utils::point("p1", 0.0, 0.01, 1.0)];
        let provider = StaticProvider::with_table(DistanceTable {
            distances: vec![vec![Some(1e19); 2]; 2],
        });

        let matrix = build_distance_matrix(&provider, &depot, &points).await;

        assert_eq!(matrix.distance(NodeIdx::new(0), NodeIdx::new(1)), 1112);
        assert_eq!(matrix.distance(NodeIdx::new(1), NodeIdx::new(0)), 1112);
        assert_eq!(matrix.distance(NodeIdx::new(1), NodeIdx::new(1)), 0);
    }

    #[tokio::test]
    async fn test_wrong_dimensions_fall_back() {
        let depot = test_utils::depot(0.0, 0.0);
        let points = vec![
            test_utils::point("p1", 0.0, 0.01, 1.0),
            test_utils::point("p2", 0.0, 0.02, 1.0),
        ];
        let provider = StaticProvider::with_table(DistanceTable {
            distances: vec![vec![Some(0.0), Some(3.0)], vec![Some(3.0), Some(0.0)]],
        });

        let matrix = build_distance_matrix(&provider, &depot, &points).await;

        assert_eq!(matrix.num_nodes(), 3);
        assert_eq!(matrix.distance(NodeIdx::new(0), NodeIdx::new(2)), 2224);
    }
}
