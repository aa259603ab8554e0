//! Generic divisive (top-down) clustering with a split trace.

use crate::cluster::error::Result;
use crate::cluster::impl_generic::dendrogram::build_divisive_dendrogram;
use crate::cluster::impl_generic::distance::{Cluster, euclidean_distance};
use crate::cluster::impl_generic::two_means::split_two_means;
use crate::cluster::traits::hierarchy::HierarchyTraceOptions;
use crate::cluster::traits::types::{ClusterResult, MergeStep, Point, StepAction};
use crate::cluster::validation::{validate_options, validate_points};
use numr::runtime::{Runtime, RuntimeClient};
use tracing::{debug, trace};

/// Divisive clustering: repeatedly bisect the largest cluster.
///
/// The splitting works on per-cluster centroids only, so the runtime client
/// is not consulted for distances.
pub fn divisive_impl<R, C, D>(
    _client: &C,
    points: &[Point<D>],
    options: &HierarchyTraceOptions,
) -> Result<ClusterResult>
where
    R: Runtime,
    C: RuntimeClient<R>,
{
    validate_points(points)?;
    validate_options(options, "divisive")?;

    Ok(divisive_trace(points, options))
}

/// Run the split loop.
pub fn divisive_trace<D>(points: &[Point<D>], options: &HierarchyTraceOptions) -> ClusterResult {
    let n = points.len();
    debug!(points = n, "divisive clustering started");

    let all: Vec<usize> = (0..n).collect();
    let mut steps = vec![MergeStep {
        step_number: 0,
        description: format!("All {n} points start in one large cluster"),
        cluster1: Vec::new(),
        cluster2: Vec::new(),
        merged_cluster: all.clone(),
        distance: 0.0,
        action: StepAction::Connect,
    }];

    let mut clusters = vec![Cluster::from_indices(all, points)];
    let limit = n.min(options.max_divisive_clusters);

    while clusters.len() < limit {
        // first largest cluster in list order
        let mut split_idx = 0;
        for (i, c) in clusters.iter().enumerate() {
            if c.len() > clusters[split_idx].len() {
                split_idx = i;
            }
        }
        if clusters[split_idx].len() <= 1 {
            break;
        }

        let (first, second) =
            split_two_means(&clusters[split_idx].indices, points, options.split_max_iter);
        if first.indices.is_empty() || second.indices.is_empty() {
            debug!(
                size = clusters[split_idx].len(),
                clusters = clusters.len(),
                "cluster cannot be split, stopping early"
            );
            break;
        }

        let parent = &clusters[split_idx];
        let distance = euclidean_distance(first.center, second.center);
        trace!(step = steps.len(), distance, "split");
        steps.push(MergeStep {
            step_number: steps.len(),
            description: format!(
                "Dividing cluster of {} into {} and {}",
                parent.len(),
                first.len(),
                second.len()
            ),
            cluster1: first.indices.clone(),
            cluster2: second.indices.clone(),
            merged_cluster: parent.indices.clone(),
            distance,
            action: StepAction::Merge,
        });

        // parent replaced by its two children at the same position
        clusters.splice(split_idx..=split_idx, [first, second]);
    }

    steps.push(MergeStep {
        step_number: steps.len(),
        description: "Clustering complete - all clusters divided".to_string(),
        cluster1: Vec::new(),
        cluster2: Vec::new(),
        merged_cluster: Vec::new(),
        distance: 0.0,
        action: StepAction::Complete,
    });

    let build = build_divisive_dendrogram(&steps, points, options.split_max_iter);
    let final_clusters: Vec<Vec<usize>> = clusters
        .into_iter()
        .filter(|c| !c.indices.is_empty())
        .map(|c| c.indices)
        .collect();

    debug!(
        steps = steps.len(),
        clusters = final_clusters.len(),
        repaired = build.repaired,
        "divisive clustering finished"
    );

    ClusterResult {
        steps,
        dendrogram: build.root,
        final_clusters,
        dendrogram_repaired: build.repaired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::validation::is_partition;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Point::bare(format!("P{i}"), x, y))
            .collect()
    }

    #[test]
    fn test_splits_into_four_clusters() {
        let points = pts(&[
            (0.0, 0.0),
            (0.5, 0.0),
            (10.0, 0.0),
            (10.5, 0.0),
            (0.0, 10.0),
            (0.5, 10.0),
            (10.0, 10.0),
            (10.5, 10.0),
        ]);
        let result = divisive_trace(&points, &HierarchyTraceOptions::default());
        assert_eq!(result.final_clusters.len(), 4);
        assert!(is_partition(&result.final_clusters, 8));
        // initial + 3 splits + complete
        assert_eq!(result.steps.len(), 5);
        for step in &result.steps[1..4] {
            assert_eq!(step.action, StepAction::Merge);
            assert_eq!(step.cluster1.len() + step.cluster2.len(), step.merged_cluster.len());
            assert!(step.distance > 0.0);
        }
        assert_eq!(result.steps[1].description, "Dividing cluster of 8 into 4 and 4");
        assert_eq!(result.steps[0].merged_cluster, (0..8).collect::<Vec<_>>());
        assert!(!result.dendrogram_repaired);
        assert_eq!(result.dendrogram.unwrap().leaf_count(), 8);
    }

    #[test]
    fn test_limit_capped_by_point_count() {
        let points = pts(&[(0.0, 0.0), (4.0, 0.0), (9.0, 0.0)]);
        let result = divisive_trace(&points, &HierarchyTraceOptions::default());
        assert_eq!(result.final_clusters.len(), 3);
        assert_eq!(result.steps.len(), 4);
    }

    #[test]
    fn test_split_replaces_parent_in_place() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (100.0, 0.0)]);
        let options = HierarchyTraceOptions {
            max_divisive_clusters: 3,
            ..Default::default()
        };
        let result = divisive_trace(&points, &options);
        // first split isolates the far point; the remaining block is split next
        assert_eq!(result.steps[1].cluster2, vec![3]);
        assert_eq!(result.steps[2].merged_cluster, vec![0, 1, 2]);
        assert_eq!(result.final_clusters.len(), 3);
        assert_eq!(result.final_clusters[2], vec![3]);
    }
}
