use crate::{
    define_index_newtype,
    problem::coordinate::{Coordinate, haversine_km},
};

/// Meters
pub type Distance = u64;

define_index_newtype!(NodeIdx);

/// Node 0 of every matrix and every route.
pub const DEPOT: NodeIdx = NodeIdx::new(0);

/// Square matrix over `[depot, point_1, ..., point_n]`, stored flat.
/// The cell of a pair is at `from * num_nodes + to`. Road networks are
/// directional, so the matrix is not assumed to be symmetric.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    distances: Vec<Distance>,
    num_nodes: usize,
    is_symmetric: bool,
}

fn is_flat_matrix_symmetric(matrix: &[Distance], num_nodes: usize) -> bool {
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            if matrix[i * num_nodes + j] != matrix[j * num_nodes + i] {
                return false;
            }
        }
    }
    true
}

/// Estimated road distance in meters when no routing data is available.
pub fn haversine_meters(from: &Coordinate, to: &Coordinate) -> Distance {
    (haversine_km(from, to) * 1000.0).round() as Distance
}

impl DistanceMatrix {
    /// Returns `None` when `distances` does not hold `num_nodes²` cells.
    /// The diagonal is always reset to zero.
    pub fn new(num_nodes: usize, mut distances: Vec<Distance>) -> Option<Self> {
        if distances.len() != num_nodes * num_nodes {
            return None;
        }

        for i in 0..num_nodes {
            distances[i * num_nodes + i] = 0;
        }

        let is_symmetric = is_flat_matrix_symmetric(&distances, num_nodes);

        Some(Self {
            distances,
            num_nodes,
            is_symmetric,
        })
    }

    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Option<Self> {
        let num_nodes = rows.len();
        if rows.iter().any(|row| row.len() != num_nodes) {
            return None;
        }

        Self::new(num_nodes, rows.into_iter().flatten().collect())
    }

    pub fn from_haversine(coordinates: &[Coordinate]) -> Self {
        let num_nodes = coordinates.len();
        let mut distances = vec![0; num_nodes * num_nodes];

        for (i, from) in coordinates.iter().enumerate() {
            for (j, to) in coordinates.iter().enumerate() {
                if i != j {
                    distances[i * num_nodes + j] = haversine_meters(from, to);
                }
            }
        }

        Self {
            distances,
            num_nodes,
            is_symmetric: true,
        }
    }

    #[inline(always)]
    fn index(&self, from: NodeIdx, to: NodeIdx) -> usize {
        from.get() * self.num_nodes + to.get()
    }

    #[inline(always)]
    pub fn distance(&self, from: NodeIdx, to: NodeIdx) -> Distance {
        if from == to {
            return 0;
        }

        self.distances[self.index(from, to)]
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_symmetric
    }

    pub fn max_distance(&self) -> Distance {
        self.distances.iter().copied().max().unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Distance]> {
        self.distances.chunks(self.num_nodes.max(1))
    }
}
