//! Dendrogram reconstruction from a step trace, with a balanced-tree fallback.
//!
//! Both builders track an explicit point-index -> owning-node map, so a
//! well-formed trace always produces a tree covering every point. The
//! coverage check still runs afterwards: a trace that was edited, truncated
//! or produced elsewhere may not account for every point, in which case the
//! tree is discarded and replaced with a balanced binary tree whose heights
//! are subtree depths rather than distances.

use crate::cluster::impl_generic::distance::euclidean_distance;
use crate::cluster::impl_generic::two_means::split_two_means;
use crate::cluster::traits::types::{DendrogramNode, MergeStep, Point};
use tracing::{trace, warn};

/// A reconstructed dendrogram.
#[derive(Debug, Clone, PartialEq)]
pub struct DendrogramBuild {
    /// Root node; `None` only when there are no points.
    pub root: Option<DendrogramNode>,
    /// True if the reconstruction failed the coverage check and was replaced
    /// by the balanced fallback.
    pub repaired: bool,
}

/// Build an agglomerative dendrogram by replaying merge steps bottom-up.
pub fn build_dendrogram<D>(steps: &[MergeStep], points: &[Point<D>]) -> DendrogramBuild {
    let n = points.len();
    if n == 0 {
        return DendrogramBuild {
            root: None,
            repaired: false,
        };
    }

    let mut slots: Vec<Option<DendrogramNode>> = points
        .iter()
        .enumerate()
        .map(|(i, p)| Some(DendrogramNode::leaf(i, p.id.as_str())))
        .collect();
    let mut owner: Vec<usize> = (0..n).collect();

    for (step_idx, step) in steps.iter().enumerate().filter(|(_, s)| s.is_event()) {
        let (i1, i2) = (step.cluster1[0], step.cluster2[0]);
        if i1 >= n || i2 >= n {
            trace!(step = step_idx, "merge references an unknown point, skipped");
            continue;
        }
        let (a, b) = (owner[i1], owner[i2]);
        if a == b {
            trace!(step = step_idx, "merge within a single node, skipped");
            continue;
        }
        let (Some(left), Some(right)) = (slots[a].take(), slots[b].take()) else {
            continue;
        };

        let merged = DendrogramNode::internal(left, right, step.distance);
        let id = slots.len();
        for &i in &merged.indices {
            owner[i] = id;
        }
        slots.push(Some(merged));
    }

    // The newest surviving node is the root of a complete replay.
    let root = slots.into_iter().rev().flatten().next();
    finish(root, points)
}

/// Build a divisive dendrogram by replaying split steps top-down.
///
/// Clusters left unsplit when the divisive loop stopped are expanded further
/// with the same 2-means split so that leaves reach single points. A residual
/// cluster that cannot be split (coincident points) stays a multi-point leaf,
/// which fails the coverage check and triggers the fallback.
pub fn build_divisive_dendrogram<D>(
    steps: &[MergeStep],
    points: &[Point<D>],
    split_max_iter: usize,
) -> DendrogramBuild {
    let n = points.len();
    if n == 0 {
        return DendrogramBuild {
            root: None,
            repaired: false,
        };
    }

    let mut tree = SplitTree::new(n);

    for (step_idx, step) in steps.iter().enumerate().filter(|(_, s)| s.is_event()) {
        let Some(&first) = step.merged_cluster.first() else {
            continue;
        };
        if first >= n {
            continue;
        }
        let node = tree.owner[first];
        if tree.nodes[node].children.is_some() {
            trace!(step = step_idx, "split target already expanded, skipped");
            continue;
        }
        tree.split(node, step.cluster1.clone(), step.cluster2.clone(), step.distance);
    }

    let mut pending: Vec<usize> = (0..tree.nodes.len())
        .filter(|&id| tree.nodes[id].children.is_none() && tree.nodes[id].indices.len() > 1)
        .collect();
    while let Some(id) = pending.pop() {
        let (left, right) = split_two_means(&tree.nodes[id].indices, points, split_max_iter);
        if left.indices.is_empty() || right.indices.is_empty() {
            continue;
        }
        let height = euclidean_distance(left.center, right.center);
        let (l, r) = tree.split(id, left.indices, right.indices, height);
        for child in [l, r] {
            if tree.nodes[child].indices.len() > 1 {
                pending.push(child);
            }
        }
    }

    let root = tree.materialize(0, points);
    finish(Some(root), points)
}

/// Balanced binary tree over all points, in input order.
///
/// Each internal node's height is its depth above the leaves.
pub fn balanced_tree<D>(points: &[Point<D>]) -> Option<DendrogramNode> {
    if points.is_empty() {
        return None;
    }
    let leaves: Vec<DendrogramNode> = points
        .iter()
        .enumerate()
        .map(|(i, p)| DendrogramNode::leaf(i, p.id.as_str()))
        .collect();
    Some(bisect(leaves))
}

fn bisect(mut leaves: Vec<DendrogramNode>) -> DendrogramNode {
    if leaves.len() == 1 {
        return leaves.remove(0);
    }
    let right = leaves.split_off(leaves.len() / 2);
    let left = bisect(leaves);
    let right = bisect(right);
    let height = left.height.max(right.height) + 1.0;
    DendrogramNode::internal(left, right, height)
}

/// True if every point appears as exactly one leaf carrying its id.
pub fn covers_all_points<D>(root: &DendrogramNode, points: &[Point<D>]) -> bool {
    let mut seen = vec![false; points.len()];
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_leaf() {
            let &[idx] = node.indices.as_slice() else {
                return false;
            };
            if idx >= points.len() || seen[idx] {
                return false;
            }
            if node.label.as_deref() != Some(points[idx].id.as_str()) {
                return false;
            }
            seen[idx] = true;
        } else {
            // a half-open internal node loses points
            let (Some(left), Some(right)) = (&node.left, &node.right) else {
                return false;
            };
            stack.push(right);
            stack.push(left);
        }
    }
    seen.into_iter().all(|s| s)
}

fn finish<D>(root: Option<DendrogramNode>, points: &[Point<D>]) -> DendrogramBuild {
    match root {
        Some(root) if covers_all_points(&root, points) => DendrogramBuild {
            root: Some(root),
            repaired: false,
        },
        _ => {
            warn!(
                points = points.len(),
                "dendrogram does not cover every point, using balanced fallback"
            );
            DendrogramBuild {
                root: balanced_tree(points),
                repaired: true,
            }
        }
    }
}

struct SplitNode {
    indices: Vec<usize>,
    height: f64,
    children: Option<(usize, usize)>,
}

/// Arena for top-down construction; `owner` maps each point to its leaf.
struct SplitTree {
    nodes: Vec<SplitNode>,
    owner: Vec<usize>,
}

impl SplitTree {
    fn new(n: usize) -> Self {
        Self {
            nodes: vec![SplitNode {
                indices: (0..n).collect(),
                height: 0.0,
                children: None,
            }],
            owner: vec![0; n],
        }
    }

    fn split(
        &mut self,
        parent: usize,
        left: Vec<usize>,
        right: Vec<usize>,
        height: f64,
    ) -> (usize, usize) {
        let l = self.push_leaf(left);
        let r = self.push_leaf(right);
        let node = &mut self.nodes[parent];
        node.children = Some((l, r));
        node.height = height;
        (l, r)
    }

    fn push_leaf(&mut self, indices: Vec<usize>) -> usize {
        let id = self.nodes.len();
        for &i in &indices {
            if let Some(slot) = self.owner.get_mut(i) {
                *slot = id;
            }
        }
        self.nodes.push(SplitNode {
            indices,
            height: 0.0,
            children: None,
        });
        id
    }

    fn materialize<D>(&self, id: usize, points: &[Point<D>]) -> DendrogramNode {
        let node = &self.nodes[id];
        match (node.children, &node.indices[..]) {
            (Some((l, r)), _) => DendrogramNode::internal(
                self.materialize(l, points),
                self.materialize(r, points),
                node.height,
            ),
            (None, &[idx]) if idx < points.len() => {
                DendrogramNode::leaf(idx, points[idx].id.as_str())
            }
            // unexpanded or malformed leaf: no label, caught by the coverage check
            (None, indices) => DendrogramNode {
                left: None,
                right: None,
                height: node.height,
                label: None,
                indices: indices.to_vec(),
            },
        }
    }
}
