//! Skeleton pruner: components, junction trees and threshold write-back.
//!
//! ## Pipeline
//!
//! 1. Validate the input and build the skeleton graph (core burned)
//! 2. Split it into connected components
//! 3. Per component: junction tree, significance pruning, coverage check
//! 4. Write every branch threshold back onto its original edge
//! 5. Report core edges with the policy's core threshold
//!
//! Components share nothing, so with the `parallel` feature they are
//! pruned on the rayon pool once there are enough of them. Results are
//! collected in component order either way.

use std::collections::HashMap;

use crate::graph::SkeletonGraph;
use crate::policy::PruningPolicy;
use crate::pruner::{InvariantViolation, SignificancePruner};
use crate::types::{ComponentReport, InputError, Point2, SkeletonInput, SkeletonPruning};
use crate::NEVER_DROPS;

/// Error type for pruning a skeleton.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PruneError {
    /// The input violates a precondition.
    #[error("Invalid skeleton input: {0}")]
    InvalidInput(#[from] InputError),
    /// Internal bookkeeping failed for one component (should never happen).
    #[error("Invariant violated in component {component}: {violation}")]
    Invariant {
        /// Component index, in discovery order.
        component: usize,
        /// What went wrong.
        violation: InvariantViolation,
    },
}

/// Thresholds and report of one component.
struct ComponentPruning {
    report: ComponentReport,
    thresholds: Vec<(usize, f64)>,
}

/// Computes vanishing thresholds for every edge of a skeleton.
///
/// ## Determinism
///
/// Same input and same policy give bit-identical thresholds and the same
/// fingerprint, with or without the `parallel` feature.
#[derive(Debug, Clone, Default)]
pub struct SkeletonPruner {
    pruner: SignificancePruner,
}

impl SkeletonPruner {
    /// Create a pruner with the given policy.
    pub fn new(policy: PruningPolicy) -> Self {
        Self {
            pruner: SignificancePruner::new(policy),
        }
    }

    /// Get the policy.
    pub fn policy(&self) -> &PruningPolicy {
        self.pruner.policy()
    }

    /// Prune `input`, returning one threshold per input edge.
    pub fn prune(&self, input: &SkeletonInput) -> Result<SkeletonPruning, PruneError> {
        let mut graph = SkeletonGraph::build(input, self.policy())?;
        let components = graph.to_components();

        tracing::debug!(
            vertices = graph.num_vertices(),
            edges = graph.num_edges(),
            core_edges = graph.core_edge_count(),
            components = components.len(),
            "Pruning skeleton"
        );

        let pruned = self.prune_components(&components)?;

        let mut reports = Vec::with_capacity(pruned.len());
        for component in pruned {
            for (edge, threshold) in component.thresholds {
                graph.edge_mut(edge).drop_threshold = threshold;
            }
            reports.push(component.report);
        }

        let core_threshold = self.policy().core_threshold;
        let thresholds = graph
            .edges()
            .iter()
            .map(|e| if e.is_core { core_threshold } else { e.drop_threshold })
            .collect();

        Ok(SkeletonPruning::new(thresholds, reports, self.policy()))
    }

    #[cfg(feature = "parallel")]
    fn prune_components(&self, components: &[SkeletonGraph]) -> Result<Vec<ComponentPruning>, PruneError> {
        use rayon::prelude::*;

        if components.len() >= self.policy().parallel_threshold {
            return components
                .par_iter()
                .enumerate()
                .map(|(index, component)| self.prune_component(index, component))
                .collect();
        }
        components
            .iter()
            .enumerate()
            .map(|(index, component)| self.prune_component(index, component))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn prune_components(&self, components: &[SkeletonGraph]) -> Result<Vec<ComponentPruning>, PruneError> {
        components
            .iter()
            .enumerate()
            .map(|(index, component)| self.prune_component(index, component))
            .collect()
    }

    fn prune_component(&self, index: usize, component: &SkeletonGraph) -> Result<ComponentPruning, PruneError> {
        let fail = |violation: InvariantViolation| {
            tracing::error!(component = index, %violation, "Pruning invariant violated");
            PruneError::Invariant {
                component: index,
                violation,
            }
        };

        let tree = component.to_junction_tree();
        let outcome = self.pruner.prune(&tree).map_err(fail)?;

        let assigned: HashMap<usize, f64> = outcome.branch_thresholds().collect();
        for edge in component.edges().iter().filter(|e| !e.is_core) {
            match assigned.get(&edge.original_index) {
                Some(&t) if t.is_finite() && t != NEVER_DROPS => {}
                _ => {
                    return Err(fail(InvariantViolation::UncoveredBranch {
                        edge: edge.original_index,
                    }))
                }
            }
        }

        tracing::debug!(
            component = index,
            vertices = component.num_vertices(),
            edges = component.num_edges(),
            tree_nodes = tree.num_nodes(),
            rounds = outcome.rounds.len(),
            "Pruned component"
        );

        let thresholds = outcome.branch_thresholds().collect();
        Ok(ComponentPruning {
            report: ComponentReport {
                vertex_count: component.num_vertices(),
                edge_count: component.num_edges(),
                core_edge_count: component.core_edge_count(),
                tree_nodes: tree.num_nodes(),
                tree_edges: tree.num_edges(),
                alpha_list: outcome.alpha_list,
            },
            thresholds,
        })
    }
}

/// Vanishing threshold of every edge under the default policy.
///
/// `edges[i]` joins `points[edges[i][0]]` and `points[edges[i][1]]` and has
/// object angle `angles[i]`. Core edges get `NEVER_DROPS`.
pub fn vanishing_thresholds(
    points: &[Point2],
    edges: &[[usize; 2]],
    angles: &[f64],
) -> Result<Vec<f64>, PruneError> {
    let input = SkeletonInput::new(points.to_vec(), edges.to_vec(), angles.to_vec());
    Ok(SkeletonPruner::default().prune(&input)?.thresholds)
}
