//! Deterministic 2-means split used by the divisive engine.

use crate::cluster::impl_generic::distance::{Cluster, centroid, euclidean_distance};
use crate::cluster::traits::types::{Coord, Point};

/// Split `indices` into two groups with a bounded, deterministically seeded
/// Lloyd iteration.
///
/// Seeds are the first member and the member at `len / 2`. Each round assigns
/// every member to the nearer centroid, ties going to the first one, then
/// moves each centroid to the mean of its group (an empty group keeps its
/// centroid). Iteration stops when no assignment changes or after
/// `max_iter` rounds. Groups keep the members' original relative order and
/// carry the final centroids as centers.
///
/// Either returned group may be empty (e.g. all members coincide); callers
/// treat that as an unsplittable cluster.
pub(crate) fn split_two_means<D>(
    indices: &[usize],
    points: &[Point<D>],
    max_iter: usize,
) -> (Cluster, Cluster) {
    if indices.len() <= 1 {
        let only = Cluster::from_indices(indices.to_vec(), points);
        let empty = Cluster {
            indices: Vec::new(),
            center: Coord::default(),
        };
        return (only, empty);
    }

    let mut centroid1 = points[indices[0]].coord();
    let mut centroid2 = points[indices[indices.len() / 2]].coord();

    // false = first group, true = second group
    let mut in_second = vec![false; indices.len()];

    for _ in 0..max_iter {
        let mut changed = false;
        for (slot, &idx) in indices.iter().enumerate() {
            let p = points[idx].coord();
            let second = euclidean_distance(p, centroid2) < euclidean_distance(p, centroid1);
            if in_second[slot] != second {
                in_second[slot] = second;
                changed = true;
            }
        }

        let (group1, group2) = partition(indices, &in_second);
        if !group1.is_empty() {
            centroid1 = centroid(&group1, points);
        }
        if !group2.is_empty() {
            centroid2 = centroid(&group2, points);
        }

        if !changed {
            break;
        }
    }

    let (group1, group2) = partition(indices, &in_second);
    (
        Cluster {
            indices: group1,
            center: centroid1,
        },
        Cluster {
            indices: group2,
            center: centroid2,
        },
    )
}

fn partition(indices: &[usize], in_second: &[bool]) -> (Vec<usize>, Vec<usize>) {
    let mut first = Vec::with_capacity(indices.len());
    let mut second = Vec::new();
    for (&idx, &s) in indices.iter().zip(in_second) {
        if s {
            second.push(idx);
        } else {
            first.push(idx);
        }
    }
    (first, second)
}
