//! CPU implementation of traced hierarchical clustering.

use crate::cluster::error::Result;
use crate::cluster::impl_generic::{
    agglomerative_impl, divisive_impl, final_clusters_at_height, final_clusters_by_target,
};
use crate::cluster::traits::hierarchy::{HierarchicalTraceAlgorithms, HierarchyTraceOptions};
use crate::cluster::traits::types::{ClusterResult, DendrogramNode, MergeStep, Point};
use crate::cluster::validation::{validate_cut_height, validate_target_clusters};
use numr::runtime::cpu::{CpuClient, CpuRuntime};

impl HierarchicalTraceAlgorithms<CpuRuntime> for CpuClient {
    fn agglomerative<D>(
        &self,
        points: &[Point<D>],
        options: &HierarchyTraceOptions,
    ) -> Result<ClusterResult> {
        agglomerative_impl::<CpuRuntime, _, _>(self, points, options)
    }

    fn divisive<D>(
        &self,
        points: &[Point<D>],
        options: &HierarchyTraceOptions,
    ) -> Result<ClusterResult> {
        divisive_impl::<CpuRuntime, _, _>(self, points, options)
    }

    fn clusters_at_target(
        &self,
        steps: &[MergeStep],
        num_points: usize,
        target_clusters: usize,
    ) -> Result<Vec<Vec<usize>>> {
        validate_target_clusters(target_clusters, "clusters_at_target")?;
        Ok(final_clusters_by_target(steps, num_points, target_clusters))
    }

    fn clusters_at_height(
        &self,
        dendrogram: Option<&DendrogramNode>,
        cut_height: f64,
        num_points: usize,
    ) -> Result<Vec<Vec<usize>>> {
        validate_cut_height(cut_height, "clusters_at_height")?;
        Ok(final_clusters_at_height(dendrogram, cut_height, num_points))
    }
}
