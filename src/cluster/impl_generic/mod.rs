//! Generic traced hierarchical clustering implementations.

pub mod agglomerative;
pub mod dendrogram;
pub mod distance;
pub mod divisive;
pub mod extract;
mod two_means;

pub use agglomerative::{agglomerative_impl, agglomerative_trace};
pub use dendrogram::{
    DendrogramBuild, balanced_tree, build_dendrogram, build_divisive_dendrogram,
    covers_all_points,
};
pub use distance::{
    DistanceMatrix, centroid, cluster_distance, distance_matrix_impl, euclidean_distance,
};
pub use divisive::{divisive_impl, divisive_trace};
pub use extract::{final_clusters_at_height, final_clusters_at_step, final_clusters_by_target};
