//! Traced hierarchical clustering.
//!
//! Agglomerative (average linkage) and divisive (repeated 2-means) clustering
//! of labelled 2-D points. Every run records a step-by-step trace, a
//! dendrogram, and a flat partition of the points.

mod cpu;
pub mod error;
pub mod impl_generic;
pub mod traits;
mod validation;

pub use error::{ClusterError, Result};
pub use impl_generic::{DendrogramBuild, DistanceMatrix, final_clusters_at_step};
pub use traits::hierarchy::{HierarchicalTraceAlgorithms, HierarchyTraceOptions};
pub use traits::types::{
    Algorithm, ClusterResult, Coord, DendrogramNode, MergeStep, Point, StepAction,
};
pub use validation::is_partition;
