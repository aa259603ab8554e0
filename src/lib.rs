//! clustr - Step-traced hierarchical clustering
//!
//! clustr groups labelled 2-D points with agglomerative (bottom-up, average
//! linkage) or divisive (top-down, repeated 2-means) clustering and records
//! every merge or split so the process can be replayed, animated, or audited.
//! Built on numr's tensor runtime for the pairwise distance computation.
//!
//! # Outputs
//!
//! Each run produces a [`ClusterResult`]:
//!
//! - `steps` - the ordered trace, starting with an initial marker and ending
//!   with a completion marker
//! - `dendrogram` - the binary merge tree (repaired to a balanced tree when the
//!   trace does not yield one that covers every point exactly once)
//! - `final_clusters` - a flat partition of the point indices
//!
//! Flat partitions can be re-derived afterwards, either by target cluster
//! count (replaying the trace) or by cutting the dendrogram at a height.
//!
//! # Backend Support
//!
//! The engines are generic over numr's `Runtime` trait; a CPU implementation
//! is provided for `CpuClient`.
//!
//! # Example
//!
//! ```ignore
//! use clustr::{Algorithm, HierarchicalTraceAlgorithms, Point};
//! use numr::runtime::cpu::{CpuClient, CpuDevice};
//!
//! let device = CpuDevice::new();
//! let client = CpuClient::new(device.clone());
//!
//! let points = vec![
//!     Point::bare("A", 0.0, 0.0),
//!     Point::bare("B", 3.0, 4.0),
//! ];
//! let result = client.cluster(&points, Algorithm::Agglomerative)?;
//! assert_eq!(result.steps.len(), 3);
//! assert_eq!(result.final_clusters, vec![vec![0, 1]]);
//! ```

pub mod cluster;

// Re-export main types for convenience
pub use cluster::{
    Algorithm, ClusterError, ClusterResult, Coord, DendrogramBuild, DendrogramNode,
    DistanceMatrix, HierarchicalTraceAlgorithms, HierarchyTraceOptions, MergeStep, Point,
    StepAction, final_clusters_at_step, is_partition,
};

// Re-export numr types that users will commonly need
pub use numr::runtime::{Runtime, RuntimeClient};
