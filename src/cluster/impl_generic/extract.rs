//! Flat cluster extraction from a merge trace or a dendrogram.

use std::collections::BTreeMap;

use crate::cluster::traits::types::{DendrogramNode, MergeStep};

/// Partition points by replaying merge steps up to a target cluster count.
///
/// Replays steps `0..=max(0, steps.len() - target_clusters - 1)`, which for a
/// full agglomerative trace applies `num_points - target_clusters` merges.
/// When there are fewer points than the target, the whole trace is replayed
/// and the result collapses to a single cluster.
pub fn final_clusters_by_target(
    steps: &[MergeStep],
    num_points: usize,
    target_clusters: usize,
) -> Vec<Vec<usize>> {
    let end = if num_points < target_clusters {
        steps.len()
    } else {
        steps.len().saturating_sub(target_clusters + 1) + 1
    };
    replay(&steps[..end.min(steps.len())], num_points)
}

/// Partition points as they stand after `step` steps of the trace have been
/// shown (animation playback). Empty until the first real merge is visible.
pub fn final_clusters_at_step(
    steps: &[MergeStep],
    num_points: usize,
    step: usize,
) -> Vec<Vec<usize>> {
    if step <= 1 || steps.is_empty() {
        return Vec::new();
    }
    let end = step.min(steps.len() - 1).max(1);
    replay(&steps[1..end], num_points)
}

/// Partition points by cutting the dendrogram at `cut_height`.
///
/// Nodes higher than the cut are descended; every other subtree becomes one
/// cluster. Out-of-range and repeated indices are dropped (first seen wins)
/// and points the tree does not reach are emitted as singletons, so the
/// result is always a disjoint cover of `0..num_points`.
pub fn final_clusters_at_height(
    root: Option<&DendrogramNode>,
    cut_height: f64,
    num_points: usize,
) -> Vec<Vec<usize>> {
    let mut raw: Vec<&[usize]> = Vec::new();
    if let Some(root) = root {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.height > cut_height && !node.is_leaf() {
                // right pushed first so the left subtree is emitted first
                stack.extend(node.right.as_deref());
                stack.extend(node.left.as_deref());
            } else {
                raw.push(&node.indices);
            }
        }
    }

    let mut seen = vec![false; num_points];
    let mut clusters: Vec<Vec<usize>> = Vec::with_capacity(raw.len());
    for indices in raw {
        let mut group = Vec::with_capacity(indices.len());
        for &i in indices {
            if i < num_points && !seen[i] {
                seen[i] = true;
                group.push(i);
            }
        }
        if !group.is_empty() {
            clusters.push(group);
        }
    }
    clusters.extend(
        seen.iter()
            .enumerate()
            .filter(|&(_, &s)| !s)
            .map(|(i, _)| vec![i]),
    );
    clusters
}

/// Union of point sets driven by the first member of each merged cluster.
///
/// The cluster owning `cluster2[0]` is folded into the one owning
/// `cluster1[0]`; steps whose endpoints are unknown or already joined are
/// skipped. Output is ordered by surviving cluster id, members in insertion
/// order.
fn replay(steps: &[MergeStep], num_points: usize) -> Vec<Vec<usize>> {
    let mut owner: Vec<usize> = (0..num_points).collect();
    let mut members: BTreeMap<usize, Vec<usize>> =
        (0..num_points).map(|i| (i, vec![i])).collect();

    for step in steps.iter().filter(|s| s.is_event()) {
        let (Some(&a), Some(&b)) = (
            step.cluster1.first().and_then(|&i| owner.get(i)),
            step.cluster2.first().and_then(|&i| owner.get(i)),
        ) else {
            continue;
        };
        if a == b {
            continue;
        }
        let Some(moved) = members.remove(&b) else {
            continue;
        };
        for &p in &moved {
            owner[p] = a;
        }
        members.entry(a).or_default().extend(moved);
    }

    members.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::traits::types::StepAction;
    use crate::cluster::validation::is_partition;

    fn step(n: usize, c1: &[usize], c2: &[usize], distance: f64) -> MergeStep {
        let mut merged = c1.to_vec();
        merged.extend_from_slice(c2);
        MergeStep {
            step_number: n,
            description: String::new(),
            cluster1: c1.to_vec(),
            cluster2: c2.to_vec(),
            merged_cluster: merged,
            distance,
            action: StepAction::Merge,
        }
    }

    fn sentinel(n: usize, action: StepAction) -> MergeStep {
        MergeStep {
            step_number: n,
            description: String::new(),
            cluster1: Vec::new(),
            cluster2: Vec::new(),
            merged_cluster: Vec::new(),
            distance: 0.0,
            action,
        }
    }

    /// Trace for 5 points: {0,1}, {2,3}, {0,1,4}, all.
    fn five_point_trace() -> Vec<MergeStep> {
        vec![
            sentinel(0, StepAction::Connect),
            step(1, &[0], &[1], 1.0),
            step(2, &[2], &[3], 1.5),
            step(3, &[0, 1], &[4], 3.0),
            step(4, &[2, 3], &[0, 1, 4], 8.0),
            sentinel(5, StepAction::Complete),
        ]
    }

    #[test]
    fn test_by_target_yields_target_groups() {
        let steps = five_point_trace();
        assert_eq!(
            final_clusters_by_target(&steps, 5, 3),
            vec![vec![0, 1], vec![2, 3], vec![4]]
        );
        assert_eq!(
            final_clusters_by_target(&steps, 5, 2),
            vec![vec![0, 1, 4], vec![2, 3]]
        );
        assert_eq!(final_clusters_by_target(&steps, 5, 1), vec![vec![2, 3, 0, 1, 4]]);
        assert_eq!(final_clusters_by_target(&steps, 5, 5).len(), 5);
    }

    #[test]
    fn test_by_target_is_deterministic() {
        let steps = five_point_trace();
        let a = final_clusters_by_target(&steps, 5, 3);
        let b = final_clusters_by_target(&steps, 5, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_by_target_collapses_when_target_exceeds_points() {
        let steps = vec![
            sentinel(0, StepAction::Connect),
            step(1, &[0], &[1], 5.0),
            sentinel(2, StepAction::Complete),
        ];
        assert_eq!(final_clusters_by_target(&steps, 2, 3), vec![vec![0, 1]]);
        assert!(final_clusters_by_target(&[], 0, 3).is_empty());
    }

    #[test]
    fn test_by_target_skips_unknown_points() {
        let steps = vec![
            sentinel(0, StepAction::Connect),
            step(1, &[0], &[9], 1.0),
            step(2, &[0], &[1], 1.0),
            sentinel(3, StepAction::Complete),
        ];
        let groups = final_clusters_by_target(&steps, 3, 1);
        assert!(is_partition(&groups, 3));
    }

    #[test]
    fn test_at_step() {
        let steps = five_point_trace();
        assert!(final_clusters_at_step(&steps, 5, 0).is_empty());
        assert!(final_clusters_at_step(&steps, 5, 1).is_empty());
        // step 2 shows only the first merge
        assert_eq!(
            final_clusters_at_step(&steps, 5, 2),
            vec![vec![0, 1], vec![2], vec![3], vec![4]]
        );
        assert_eq!(final_clusters_at_step(&steps, 5, 99).len(), 1);
    }

    fn five_point_tree() -> DendrogramNode {
        let a = DendrogramNode::internal(
            DendrogramNode::internal(
                DendrogramNode::leaf(0, "A"),
                DendrogramNode::leaf(1, "B"),
                1.0,
            ),
            DendrogramNode::leaf(4, "E"),
            3.0,
        );
        let b = DendrogramNode::internal(
            DendrogramNode::leaf(2, "C"),
            DendrogramNode::leaf(3, "D"),
            1.5,
        );
        DendrogramNode::internal(b, a, 8.0)
    }

    #[test]
    fn test_at_height() {
        let root = five_point_tree();
        assert_eq!(final_clusters_at_height(Some(&root), 0.0, 5).len(), 5);
        assert_eq!(
            final_clusters_at_height(Some(&root), 2.0, 5),
            vec![vec![2, 3], vec![0, 1], vec![4]]
        );
        assert_eq!(
            final_clusters_at_height(Some(&root), 3.0, 5),
            vec![vec![2, 3], vec![0, 1, 4]]
        );
        let all = final_clusters_at_height(Some(&root), root.max_height(), 5);
        assert_eq!(all, vec![vec![2, 3, 0, 1, 4]]);
    }

    #[test]
    fn test_at_height_completes_coverage() {
        let root = DendrogramNode::internal(
            DendrogramNode::leaf(0, "A"),
            DendrogramNode::leaf(0, "A"),
            1.0,
        );
        let groups = final_clusters_at_height(Some(&root), 0.5, 3);
        assert_eq!(groups, vec![vec![0], vec![1], vec![2]]);
        assert_eq!(final_clusters_at_height(None, 1.0, 2), vec![vec![0], vec![1]]);
        assert!(final_clusters_at_height(None, 1.0, 0).is_empty());
    }
}
