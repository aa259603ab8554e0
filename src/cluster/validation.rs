//! Validation helpers for the clustering engines.

use crate::cluster::error::{ClusterError, Result};
use crate::cluster::traits::hierarchy::HierarchyTraceOptions;
use crate::cluster::traits::types::Point;

/// Validate that every point has finite coordinates.
pub fn validate_points<D>(points: &[Point<D>]) -> Result<()> {
    match points
        .iter()
        .position(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        Some(index) => Err(ClusterError::NonFinitePoint {
            index,
            id: points[index].id.clone(),
        }),
        None => Ok(()),
    }
}

/// Validate a target cluster count.
pub fn validate_target_clusters(target: usize, op: &'static str) -> Result<()> {
    if target == 0 {
        return Err(ClusterError::InvalidArgument {
            arg: "target_clusters",
            reason: format!("{op} requires target_clusters > 0"),
        });
    }
    Ok(())
}

/// Validate engine options.
pub fn validate_options(options: &HierarchyTraceOptions, op: &'static str) -> Result<()> {
    validate_target_clusters(options.target_clusters, op)?;
    if options.max_divisive_clusters == 0 {
        return Err(ClusterError::InvalidArgument {
            arg: "max_divisive_clusters",
            reason: format!("{op} requires max_divisive_clusters > 0"),
        });
    }
    if options.split_max_iter == 0 {
        return Err(ClusterError::InvalidArgument {
            arg: "split_max_iter",
            reason: format!("{op} requires split_max_iter > 0"),
        });
    }
    Ok(())
}

/// Validate a dendrogram cut height (any non-NaN value).
pub fn validate_cut_height(cut_height: f64, op: &'static str) -> Result<()> {
    if cut_height.is_nan() {
        return Err(ClusterError::InvalidArgument {
            arg: "cut_height",
            reason: format!("{op} requires a numeric cut height, got NaN"),
        });
    }
    Ok(())
}

/// True if `groups` is a disjoint cover of `0..n`.
pub fn is_partition(groups: &[Vec<usize>], n: usize) -> bool {
    let mut seen = vec![false; n];
    for &i in groups.iter().flatten() {
        if i >= n || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    seen.into_iter().all(|s| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_points() {
        let ok = vec![Point::bare("a", 0.0, 1.0), Point::bare("b", -2.0, 3.5)];
        assert!(validate_points(&ok).is_ok());

        let bad = vec![Point::bare("a", 0.0, 1.0), Point::bare("b", f64::NAN, 3.5)];
        match validate_points(&bad) {
            Err(ClusterError::NonFinitePoint { index, id }) => {
                assert_eq!(index, 1);
                assert_eq!(id, "b");
            }
            other => panic!("expected NonFinitePoint, got {other:?}"),
        }

        let inf = vec![Point::bare("a", 0.0, f64::INFINITY)];
        assert!(validate_points(&inf).is_err());
        assert!(validate_points::<()>(&[]).is_ok());
    }

    #[test]
    fn test_validate_options() {
        let opts = HierarchyTraceOptions::default();
        assert!(validate_options(&opts, "test").is_ok());
        let zero_target = HierarchyTraceOptions {
            target_clusters: 0,
            ..Default::default()
        };
        assert!(validate_options(&zero_target, "test").is_err());
        let zero_iter = HierarchyTraceOptions {
            split_max_iter: 0,
            ..Default::default()
        };
        assert!(validate_options(&zero_iter, "test").is_err());
    }

    #[test]
    fn test_validate_cut_height() {
        assert!(validate_cut_height(0.0, "test").is_ok());
        assert!(validate_cut_height(-1.0, "test").is_ok());
        assert!(validate_cut_height(f64::INFINITY, "test").is_ok());
        assert!(validate_cut_height(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_is_partition() {
        assert!(is_partition(&[vec![0, 2], vec![1]], 3));
        assert!(is_partition(&[], 0));
        assert!(!is_partition(&[vec![0, 1]], 3));
        assert!(!is_partition(&[vec![0, 1], vec![1, 2]], 3));
        assert!(!is_partition(&[vec![0, 3]], 2));
    }
}
