//! Error types for the clustering engines.

use thiserror::Error;

/// Result type for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors that can occur while clustering.
///
/// Degenerate inputs (zero or one point), unsplittable clusters and
/// dendrogram repair are not errors; they are handled in-band.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// An argument failed validation.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument { arg: &'static str, reason: String },

    /// A point has a NaN or infinite coordinate.
    #[error("Point {index} ('{id}') has a non-finite coordinate")]
    NonFinitePoint { index: usize, id: String },

    /// Failure reported by the tensor runtime.
    #[error(transparent)]
    Backend(#[from] numr::error::Error),
}
