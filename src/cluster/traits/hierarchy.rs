//! Traced hierarchical clustering trait.

use crate::cluster::error::Result;
use crate::cluster::traits::types::{Algorithm, ClusterResult, DendrogramNode, MergeStep, Point};
use numr::runtime::Runtime;

/// Options for the traced hierarchical clustering engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyTraceOptions {
    /// Number of flat clusters extracted from the agglomerative trace.
    pub target_clusters: usize,
    /// Divisive splitting stops once this many clusters exist
    /// (never more than the number of points).
    pub max_divisive_clusters: usize,
    /// Round cap for the 2-means split.
    pub split_max_iter: usize,
}

impl Default for HierarchyTraceOptions {
    fn default() -> Self {
        Self {
            target_clusters: 3,
            max_divisive_clusters: 4,
            split_max_iter: 10,
        }
    }
}

/// Step-traced hierarchical clustering over 2D points.
///
/// Each call recomputes from scratch; no state is shared between calls.
pub trait HierarchicalTraceAlgorithms<R: Runtime> {
    /// Bottom-up average-linkage clustering with a full merge trace.
    fn agglomerative<D>(
        &self,
        points: &[Point<D>],
        options: &HierarchyTraceOptions,
    ) -> Result<ClusterResult>;

    /// Top-down clustering by repeated 2-means splits of the largest cluster.
    fn divisive<D>(
        &self,
        points: &[Point<D>],
        options: &HierarchyTraceOptions,
    ) -> Result<ClusterResult>;

    /// Run the chosen engine with default options.
    fn cluster<D>(&self, points: &[Point<D>], algorithm: Algorithm) -> Result<ClusterResult> {
        self.cluster_with_options(points, algorithm, &HierarchyTraceOptions::default())
    }

    /// Run the chosen engine with explicit options.
    fn cluster_with_options<D>(
        &self,
        points: &[Point<D>],
        algorithm: Algorithm,
        options: &HierarchyTraceOptions,
    ) -> Result<ClusterResult> {
        match algorithm {
            Algorithm::Agglomerative => self.agglomerative(points, options),
            Algorithm::Divisive => self.divisive(points, options),
        }
    }

    /// Partition points by replaying a merge trace up to a target cluster count.
    fn clusters_at_target(
        &self,
        steps: &[MergeStep],
        num_points: usize,
        target_clusters: usize,
    ) -> Result<Vec<Vec<usize>>>;

    /// Partition points by cutting a dendrogram at `cut_height`.
    fn clusters_at_height(
        &self,
        dendrogram: Option<&DendrogramNode>,
        cut_height: f64,
        num_points: usize,
    ) -> Result<Vec<Vec<usize>>>;
}
