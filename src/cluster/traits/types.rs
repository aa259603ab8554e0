//! Data types shared by the traced hierarchical clustering engines.
//!
//! All types serialize to the camelCase JSON shape consumed by visualization
//! front-ends (`steps`, `dendrogram`, `finalClusters`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cluster::error::ClusterError;

/// A 2D coordinate (point position, cluster center or centroid).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An input point with an opaque payload.
///
/// Identity inside the engine is positional (index into the input slice).
/// `id` is only used for step descriptions and dendrogram leaf labels, and
/// `data` is never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point<D = ()> {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub data: D,
}

impl<D> Point<D> {
    pub fn new(id: impl Into<String>, x: f64, y: f64, data: D) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            data,
        }
    }

    /// Position of this point.
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

impl Point<()> {
    /// Point without payload.
    pub fn bare(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(id, x, y, ())
    }
}

/// Kind of event recorded in the step trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    /// Two singleton clusters joined (also used by the initial marker).
    Connect,
    /// A merge or split involving at least one multi-point cluster.
    Merge,
    /// Terminal sentinel; always the last step.
    Complete,
}

/// One record of the step trace replayed for animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStep {
    pub step_number: usize,
    pub description: String,
    pub cluster1: Vec<usize>,
    pub cluster2: Vec<usize>,
    pub merged_cluster: Vec<usize>,
    pub distance: f64,
    pub action: StepAction,
}

impl MergeStep {
    /// True for steps that carry an actual merge or split, i.e. not the
    /// initial marker nor the terminal sentinel.
    pub fn is_event(&self) -> bool {
        self.action != StepAction::Complete
            && !self.cluster1.is_empty()
            && !self.cluster2.is_empty()
    }
}

/// Binary dendrogram node.
///
/// Leaves carry `label`, a single index and `height = 0`. Internal nodes carry
/// both children, the merge/split distance as `height`, and the union of their
/// descendants' indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DendrogramNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<DendrogramNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<DendrogramNode>>,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub indices: Vec<usize>,
}

impl DendrogramNode {
    pub fn leaf(index: usize, label: impl Into<String>) -> Self {
        Self {
            left: None,
            right: None,
            height: 0.0,
            label: Some(label.into()),
            indices: vec![index],
        }
    }

    /// Internal node whose indices are the concatenation of its children's.
    pub fn internal(left: DendrogramNode, right: DendrogramNode, height: f64) -> Self {
        let mut indices = Vec::with_capacity(left.indices.len() + right.indices.len());
        indices.extend_from_slice(&left.indices);
        indices.extend_from_slice(&right.indices);
        Self {
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
            height,
            label: None,
            indices,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Labels of all leaves, left to right.
    pub fn leaf_labels(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.visit_leaves(&mut |node| {
            if let Some(label) = node.label.as_deref() {
                out.push(label);
            }
        });
        out
    }

    /// Point indices held by leaves, left to right.
    pub fn leaf_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_leaves(&mut |node| out.extend_from_slice(&node.indices));
        out
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.visit_leaves(&mut |_| count += 1);
        count
    }

    /// Largest height in the subtree.
    pub fn max_height(&self) -> f64 {
        let mut best = self.height;
        for child in [&self.left, &self.right].into_iter().flatten() {
            best = best.max(child.max_height());
        }
        best
    }

    fn visit_leaves<'a>(&'a self, f: &mut impl FnMut(&'a DendrogramNode)) {
        if self.is_leaf() {
            f(self);
            return;
        }
        for child in [&self.left, &self.right].into_iter().flatten() {
            child.visit_leaves(f);
        }
    }
}

/// Output of one clustering request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterResult {
    pub steps: Vec<MergeStep>,
    pub dendrogram: Option<DendrogramNode>,
    pub final_clusters: Vec<Vec<usize>>,
    /// Set when the dendrogram had to be replaced by the balanced fallback.
    #[serde(skip)]
    pub dendrogram_repaired: bool,
}

/// Which engine to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Bottom-up nearest-cluster merging.
    #[default]
    Agglomerative,
    /// Top-down 2-means splitting.
    Divisive,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agglomerative => f.write_str("agglomerative"),
            Self::Divisive => f.write_str("divisive"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agglomerative" => Ok(Self::Agglomerative),
            "divisive" => Ok(Self::Divisive),
            other => Err(ClusterError::InvalidArgument {
                arg: "algorithm",
                reason: format!("expected \"agglomerative\" or \"divisive\", got {other:?}"),
            }),
        }
    }
}
