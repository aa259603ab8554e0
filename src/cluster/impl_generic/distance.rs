//! Distance utilities: point distance, average linkage and the cached
//! point-to-point distance matrix.

use crate::cluster::error::Result;
use crate::cluster::traits::types::{Coord, Point};
use numr::ops::{DistanceMetric, DistanceOps};
use numr::runtime::{Runtime, RuntimeClient};
use numr::tensor::Tensor;

/// L2 distance between two coordinates.
pub fn euclidean_distance(p1: Coord, p2: Coord) -> f64 {
    ((p1.x - p2.x).powi(2) + (p1.y - p2.y).powi(2)).sqrt()
}

/// Average-linkage distance between two clusters given as point indices.
///
/// Mean of all pairwise Euclidean distances between members of `c1` and
/// members of `c2`. Returns `+inf` if either cluster is empty.
pub fn cluster_distance<D>(c1: &[usize], c2: &[usize], points: &[Point<D>]) -> f64 {
    if c1.is_empty() || c2.is_empty() {
        return f64::INFINITY;
    }
    let mut total = 0.0;
    for &i in c1 {
        for &j in c2 {
            total += euclidean_distance(points[i].coord(), points[j].coord());
        }
    }
    total / (c1.len() * c2.len()) as f64
}

/// Arithmetic mean of the member coordinates; origin for an empty set.
pub fn centroid<D>(indices: &[usize], points: &[Point<D>]) -> Coord {
    if indices.is_empty() {
        return Coord::default();
    }
    let (sx, sy) = indices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &i| (sx + points[i].x, sy + points[i].y));
    let n = indices.len() as f64;
    Coord::new(sx / n, sy / n)
}

/// Engine-internal cluster: ordered member indices plus their mean position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cluster {
    pub indices: Vec<usize>,
    pub center: Coord,
}

impl Cluster {
    pub fn from_indices<D>(indices: Vec<usize>, points: &[Point<D>]) -> Self {
        let center = centroid(&indices, points);
        Self { indices, center }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// Dense symmetric `[n, n]` matrix of point-to-point Euclidean distances,
/// held on the host for the sequential merge loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Build from a row-major `[n, n]` buffer.
    ///
    /// The lower triangle is mirrored from the upper one and the diagonal
    /// forced to zero so that lookups are exactly symmetric.
    pub fn from_square(n: usize, mut data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        for i in 0..n {
            data[i * n + i] = 0.0;
            for j in (i + 1)..n {
                // NaN from sqrt of a rounding-negative square collapses to 0
                let d = data[i * n + j].max(0.0);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    /// Build directly on the host.
    pub fn from_points<D>(points: &[Point<D>]) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean_distance(points[i].coord(), points[j].coord());
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { n, data }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    /// Average-linkage distance using cached point distances.
    pub fn average_linkage(&self, c1: &[usize], c2: &[usize]) -> f64 {
        if c1.is_empty() || c2.is_empty() {
            return f64::INFINITY;
        }
        let total: f64 = c1
            .iter()
            .map(|&i| c2.iter().map(|&j| self.get(i, j)).sum::<f64>())
            .sum();
        total / (c1.len() * c2.len()) as f64
    }
}

/// Compute the point distance matrix on the runtime via `cdist`.
pub fn distance_matrix_impl<R, C, D>(client: &C, points: &[Point<D>]) -> Result<DistanceMatrix>
where
    R: Runtime,
    C: DistanceOps<R> + RuntimeClient<R>,
{
    let n = points.len();
    if n == 0 {
        return Ok(DistanceMatrix::from_square(0, Vec::new()));
    }

    let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let data = Tensor::<R>::from_slice(&coords, &[n, 2], client.device());
    let sq = client.cdist(&data, &data, DistanceMetric::Euclidean)?;
    let flat: Vec<f64> = sq.to_vec();

    Ok(DistanceMatrix::from_square(n, flat))
}
