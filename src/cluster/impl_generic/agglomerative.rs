//! Generic agglomerative (bottom-up) clustering with a merge trace.
//!
//! Average linkage over a point distance matrix computed once on the
//! runtime; the greedy merge loop itself is sequential and runs on the host.

use crate::cluster::error::Result;
use crate::cluster::impl_generic::dendrogram::build_dendrogram;
use crate::cluster::impl_generic::distance::{Cluster, DistanceMatrix, distance_matrix_impl};
use crate::cluster::impl_generic::extract::final_clusters_by_target;
use crate::cluster::traits::hierarchy::HierarchyTraceOptions;
use crate::cluster::traits::types::{ClusterResult, MergeStep, Point, StepAction};
use crate::cluster::validation::{validate_options, validate_points};
use numr::ops::DistanceOps;
use numr::runtime::{Runtime, RuntimeClient};
use tracing::{debug, trace};

/// Agglomerative clustering: distance matrix on the runtime, then trace.
pub fn agglomerative_impl<R, C, D>(
    client: &C,
    points: &[Point<D>],
    options: &HierarchyTraceOptions,
) -> Result<ClusterResult>
where
    R: Runtime,
    C: DistanceOps<R> + RuntimeClient<R>,
{
    validate_points(points)?;
    validate_options(options, "agglomerative")?;

    let distances = distance_matrix_impl::<R, _, _>(client, points)?;
    Ok(agglomerative_trace(points, &distances, options))
}

/// Run the merge loop over precomputed distances.
pub fn agglomerative_trace<D>(
    points: &[Point<D>],
    distances: &DistanceMatrix,
    options: &HierarchyTraceOptions,
) -> ClusterResult {
    let n = points.len();
    debug!(points = n, "agglomerative clustering started");

    let mut steps = Vec::with_capacity(n + 1);
    steps.push(MergeStep {
        step_number: 0,
        description: format!("All {n} points start as individual clusters"),
        cluster1: Vec::new(),
        cluster2: Vec::new(),
        merged_cluster: Vec::new(),
        distance: 0.0,
        action: StepAction::Connect,
    });

    // Every cluster ever created, by creation index. `active` holds the live
    // ones in ascending creation order, which fixes the tie-break.
    let mut clusters: Vec<Cluster> = points
        .iter()
        .enumerate()
        .map(|(i, p)| Cluster {
            indices: vec![i],
            center: p.coord(),
        })
        .collect();
    let mut active: Vec<usize> = (0..n).collect();

    while active.len() > 1 {
        let mut best: Option<(usize, usize, f64)> = None;
        for a in 0..active.len() {
            for b in (a + 1)..active.len() {
                let d = distances.average_linkage(
                    &clusters[active[a]].indices,
                    &clusters[active[b]].indices,
                );
                if best.is_none_or(|(_, _, min)| d < min) {
                    best = Some((a, b, d));
                }
            }
        }
        let Some((a, b, distance)) = best else {
            break;
        };

        let first = &clusters[active[a]];
        let second = &clusters[active[b]];
        let mut merged = Vec::with_capacity(first.len() + second.len());
        merged.extend_from_slice(&first.indices);
        merged.extend_from_slice(&second.indices);

        let (action, description) = if first.len() == 1 && second.len() == 1 {
            (
                StepAction::Connect,
                format!(
                    "Connecting {} and {} (distance: {distance:.2})",
                    points[first.indices[0]].id, points[second.indices[0]].id
                ),
            )
        } else {
            (
                StepAction::Merge,
                format!(
                    "Merging cluster of {} with cluster of {} (distance: {distance:.2})",
                    first.len(),
                    second.len()
                ),
            )
        };
        trace!(step = steps.len(), distance, ?action, "merge");

        steps.push(MergeStep {
            step_number: steps.len(),
            description,
            cluster1: first.indices.clone(),
            cluster2: second.indices.clone(),
            merged_cluster: merged.clone(),
            distance,
            action,
        });

        // b > a, so remove b first to keep a's position valid
        active.remove(b);
        active.remove(a);
        clusters.push(Cluster::from_indices(merged, points));
        active.push(clusters.len() - 1);
    }

    let final_members = active
        .first()
        .map(|&id| clusters[id].indices.clone())
        .unwrap_or_default();
    steps.push(MergeStep {
        step_number: steps.len(),
        description: "Clustering complete - all points merged into one cluster".to_string(),
        cluster1: Vec::new(),
        cluster2: Vec::new(),
        merged_cluster: final_members,
        distance: 0.0,
        action: StepAction::Complete,
    });

    let build = build_dendrogram(&steps, points);
    let final_clusters = final_clusters_by_target(&steps, n, options.target_clusters);

    debug!(
        steps = steps.len(),
        clusters = final_clusters.len(),
        repaired = build.repaired,
        "agglomerative clustering finished"
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
            .map(|(i, &(x, y))| Point::bare(format!("P{}", i + 1), x, y))
            .collect()
    }

    fn run(points: &[Point]) -> ClusterResult {
        let distances = DistanceMatrix::from_points(points);
        agglomerative_trace(points, &distances, &HierarchyTraceOptions::default())
    }

    #[test]
    fn test_step_numbers_are_sequential() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (5.0, 5.0), (6.0, 5.0), (9.0, 0.0)]);
        let result = run(&points);
        assert_eq!(result.steps.len(), points.len() + 1);
        for (i, step) in result.steps.iter().enumerate() {
            assert_eq!(step.step_number, i);
        }
        assert_eq!(result.steps[0].action, StepAction::Connect);
        assert_eq!(result.steps[0].description, "All 5 points start as individual clusters");
        assert_eq!(result.steps.last().unwrap().action, StepAction::Complete);
    }

    #[test]
    fn test_merged_cluster_is_concatenation() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (5.0, 5.0), (6.0, 5.0)]);
        let result = run(&points);
        for step in result.steps.iter().filter(|s| s.is_event()) {
            let mut expected = step.cluster1.clone();
            expected.extend_from_slice(&step.cluster2);
            assert_eq!(step.merged_cluster, expected);
        }
        let mut all = result.steps.last().unwrap().merged_cluster.clone();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_action_classification() {
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (10.0, 0.0)]);
        let result = run(&points);
        assert_eq!(result.steps[1].action, StepAction::Connect);
        assert_eq!(result.steps[1].description, "Connecting P1 and P2 (distance: 1.00)");
        assert_eq!(result.steps[2].action, StepAction::Merge);
        // average of 10 and 9
        assert!((result.steps[2].distance - 9.5).abs() < 1e-12);
        assert_eq!(
            result.steps[2].description,
            "Merging cluster of 1 with cluster of 2 (distance: 9.50)"
        );
    }

    #[test]
    fn test_tie_break_prefers_earliest_pair() {
        // d(0,1) == d(1,2) == 1 exactly
        let points = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let result = run(&points);
        assert_eq!(result.steps[1].cluster1, vec![0]);
        assert_eq!(result.steps[1].cluster2, vec![1]);
    }

    #[test]
    fn test_final_clusters_three_groups() {
        let points = pts(&[
            (0.0, 0.0),
            (0.2, 0.1),
            (10.0, 10.0),
            (10.1, 10.2),
            (20.0, 0.0),
            (20.2, 0.1),
        ]);
        let result = run(&points);
        assert!(is_partition(&result.final_clusters, 6));
        assert_eq!(result.final_clusters.len(), 3);
        let mut groups: Vec<Vec<usize>> = result
            .final_clusters
            .iter()
            .map(|g| {
                let mut g = g.clone();
                g.sort_unstable();
                g
            })
            .collect();
        groups.sort();
        assert_eq!(groups, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
        assert!(!result.dendrogram_repaired);
    }
}
