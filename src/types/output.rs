//! Pruning results: per-edge thresholds, component reports, simplification.

use serde::{Deserialize, Serialize};

use super::input::SkeletonInput;
use crate::canonical::threshold_fingerprint;
use crate::policy::PruningPolicy;

/// Summary of one connected component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentReport {
    /// Skeleton vertices in the component.
    pub vertex_count: usize,
    /// Skeleton edges in the component.
    pub edge_count: usize,
    /// Edges in the component's core.
    pub core_edge_count: usize,
    /// Junction tree nodes.
    pub tree_nodes: usize,
    /// Junction tree edges.
    pub tree_edges: usize,
    /// Cumulative pruning scales, seeded with 0.
    ///
    /// On components with a core, the last entries may come from rounds
    /// that remove the aggregate core node; such scales belong to no
    /// branch and can exceed every branch threshold.
    pub alpha_list: Vec<f64>,
}

/// Result of pruning a whole skeleton.
///
/// `thresholds[i]` belongs to input edge `i`: core edges carry the policy's
/// core threshold, every other edge the scale at which it vanishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonPruning {
    /// Schema version of this result.
    pub schema_version: String,
    /// Policy identifier used.
    pub policy_id: String,
    /// Policy parameter hash.
    pub params_hash: String,
    /// One threshold per input edge.
    pub thresholds: Vec<f64>,
    /// One report per component with at least one edge, in discovery order.
    pub components: Vec<ComponentReport>,
    /// xxh64 fingerprint of schema, policy hash and threshold bits.
    pub fingerprint: String,
}

/// Skeleton reduced to the edges that survive a cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedSkeleton {
    /// Surviving vertices and edges, renumbered.
    pub skeleton: SkeletonInput,
    /// Input vertex index of every surviving vertex.
    pub vertex_origin: Vec<usize>,
    /// Input edge index of every surviving edge.
    pub edge_origin: Vec<usize>,
}

impl SkeletonPruning {
    /// Assemble a result and compute its fingerprint.
    pub fn new(thresholds: Vec<f64>, components: Vec<ComponentReport>, policy: &PruningPolicy) -> Self {
        let params_hash = policy.params_hash();
        let fingerprint = threshold_fingerprint(crate::SKELETON_SCHEMA_VERSION, &params_hash, &thresholds);
        Self {
            schema_version: crate::SKELETON_SCHEMA_VERSION.to_string(),
            policy_id: policy.policy_id().to_string(),
            params_hash,
            thresholds,
            components,
            fingerprint,
        }
    }

    /// Recompute the fingerprint and compare.
    pub fn verify_fingerprint(&self) -> bool {
        threshold_fingerprint(&self.schema_version, &self.params_hash, &self.thresholds) == self.fingerprint
    }

    /// Number of thresholds.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether there are no thresholds.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Indices of edges whose threshold is at least `cutoff`.
    pub fn retained_edges(&self, cutoff: f64) -> Vec<usize> {
        self.thresholds
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t >= cutoff)
            .map(|(i, _)| i)
            .collect()
    }

    /// Keep the edges of `input` that survive `cutoff` and the vertices
    /// they touch, renumbering both in input order.
    ///
    /// `input` must be the skeleton these thresholds were computed for.
    pub fn simplify(&self, input: &SkeletonInput, cutoff: f64) -> SimplifiedSkeleton {
        let edge_origin: Vec<usize> = self
            .retained_edges(cutoff)
            .into_iter()
            .filter(|&e| e < input.edges.len() && e < input.angles.len())
            .collect();

        let mut used = vec![false; input.points.len()];
        for &e in &edge_origin {
            for v in input.edges[e] {
                if let Some(slot) = used.get_mut(v) {
                    *slot = true;
                }
            }
        }

        let mut new_id = vec![usize::MAX; input.points.len()];
        let mut vertex_origin = Vec::new();
        for (v, _) in used.iter().enumerate().filter(|&(_, &u)| u) {
            new_id[v] = vertex_origin.len();
            vertex_origin.push(v);
        }

        let skeleton = SkeletonInput::new(
            vertex_origin.iter().map(|&v| input.points[v]).collect(),
            edge_origin
                .iter()
                .map(|&e| {
                    let [a, b] = input.edges[e];
                    [new_id[a], new_id[b]]
                })
                .collect(),
            edge_origin.iter().map(|&e| input.angles[e]).collect(),
        );

        SimplifiedSkeleton {
            skeleton,
            vertex_origin,
            edge_origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point2;
    use crate::NEVER_DROPS;

    fn path_input() -> SkeletonInput {
        SkeletonInput::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(3.0, 0.0),
            ],
            vec![[0, 1], [1, 2], [2, 3]],
            vec![0.1, 0.2, 0.3],
        )
    }

    #[test]
    fn test_retained_edges() {
        let pruning = SkeletonPruning::new(vec![0.5, 0.96, NEVER_DROPS], Vec::new(), &PruningPolicy::default());

        assert_eq!(pruning.retained_edges(crate::SINGLE_STROKE_CUTOFF), vec![1, 2]);
        assert_eq!(pruning.retained_edges(0.0), vec![0, 1, 2]);
        assert_eq!(pruning.retained_edges(f64::INFINITY), Vec::<usize>::new());
    }

    #[test]
    fn test_simplify_renumbers() {
        let pruning = SkeletonPruning::new(vec![0.1, 0.95, 0.92], Vec::new(), &PruningPolicy::default());
        let simplified = pruning.simplify(&path_input(), crate::MULTI_STROKE_CUTOFF);

        assert_eq!(simplified.edge_origin, vec![1, 2]);
        assert_eq!(simplified.vertex_origin, vec![1, 2, 3]);
        assert_eq!(simplified.skeleton.edges, vec![[0, 1], [1, 2]]);
        assert_eq!(simplified.skeleton.angles, vec![0.2, 0.3]);
        assert_eq!(simplified.skeleton.points[0], Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_fingerprint_roundtrip() {
        let pruning = SkeletonPruning::new(vec![0.1, 0.2], Vec::new(), &PruningPolicy::default());
        assert!(pruning.verify_fingerprint());
        assert_eq!(pruning.len(), 2);

        let mut tampered = pruning.clone();
        tampered.thresholds[0] = 0.3;
        assert!(!tampered.verify_fingerprint());
    }
}
