//! Significance pruner: greedy fractional-ratio contraction of a junction tree.
//!
//! ## Phases
//!
//! 1. **Propagation** (`propagation`): leaf peeling fills the four
//!    directional aggregates of every tree edge.
//! 2. **Contraction** (`contraction`): each round cuts off the subtree with
//!    the lowest score/cost ratio, stamps its nodes with the cumulative
//!    scale, and re-bases the remaining scores.
//!
//! The input tree is never touched. Propagation runs on a retained copy,
//! which also receives every drop threshold; contraction destroys a
//! `WorkingTree` built from it.

pub mod candidate;
pub mod contraction;
pub mod propagation;
pub mod working;

use serde::{Deserialize, Serialize};

use crate::policy::PruningPolicy;
use crate::tree::{JunctionTree, NodeId, TreeEdgeId};

pub use candidate::Candidate;
pub use propagation::{propagate, Totals};
pub use working::WorkingTree;

/// Defect in the pruner's own bookkeeping.
///
/// None of these can happen for a junction tree produced by
/// `SkeletonGraph::to_junction_tree()`; seeing one means the computation
/// for that component cannot be trusted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// The tree is disconnected or has a cycle.
    #[error("Malformed junction tree: {nodes} nodes, {edges} edges, connected: {connected}")]
    MalformedTree {
        /// Number of nodes.
        nodes: usize,
        /// Number of edges.
        edges: usize,
        /// Whether the tree is connected.
        connected: bool,
    },
    /// Neither direction of an edge could be set by propagation.
    #[error("Directional aggregates of tree edge {edge} could not be derived")]
    UnresolvedEdge {
        /// Tree edge id.
        edge: TreeEdgeId,
    },
    /// Shrink step asked to cut an edge that is gone or has no cost on the chosen side.
    #[error("Contraction candidate on tree edge {edge} is not live")]
    DeadCandidate {
        /// Tree edge id.
        edge: TreeEdgeId,
    },
    /// A branch edge ended up without a finite threshold.
    #[error("Branch edge {edge} received no drop threshold")]
    UncoveredBranch {
        /// Caller edge index.
        edge: usize,
    },
}

/// One contraction round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractionRound {
    /// Minimum ratio of the round, clamped at zero.
    pub step: f64,
    /// Cumulative scale after the round.
    pub alpha: f64,
    /// Retained-tree ids of the nodes removed, in removal order.
    pub removed: Vec<NodeId>,
}

/// Result of pruning one junction tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PruneOutcome {
    /// Cumulative pruning scales, seeded with 0. A round may remove
    /// the core node, so the tail can exceed every branch threshold.
    pub alpha_list: Vec<f64>,
    /// Round-by-round contraction log.
    pub rounds: Vec<ContractionRound>,
    /// Retained tree: propagated aggregates plus every node's drop threshold.
    pub tree: JunctionTree,
    /// Total score and cost of the tree.
    pub totals: Totals,
}

impl PruneOutcome {
    /// `(caller edge index, drop threshold)` for every branch node.
    pub fn branch_thresholds(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.tree
            .nodes()
            .iter()
            .filter_map(|n| n.source.branch_index().map(|index| (index, n.drop_threshold)))
    }

    /// Final cumulative scale.
    pub fn final_alpha(&self) -> f64 {
        self.alpha_list.last().copied().unwrap_or(0.0)
    }
}

/// Runs the two-phase pruning over junction trees.
#[derive(Debug, Clone, Default)]
pub struct SignificancePruner {
    policy: PruningPolicy,
}

impl SignificancePruner {
    /// Create a pruner with the given policy.
    pub fn new(policy: PruningPolicy) -> Self {
        Self { policy }
    }

    /// Get the policy.
    pub fn policy(&self) -> &PruningPolicy {
        &self.policy
    }

    /// Assign a drop threshold to every node of `tree`.
    pub fn prune(&self, tree: &JunctionTree) -> Result<PruneOutcome, InvariantViolation> {
        let shape = tree.check_tree();
        if !shape.is_tree() {
            return Err(InvariantViolation::MalformedTree {
                nodes: shape.nodes,
                edges: shape.edges,
                connected: shape.connected,
            });
        }

        let mut retained = tree.clone();
        let totals = propagate(&mut retained)?;
        let mut working = WorkingTree::new(&retained);

        let (alpha_list, rounds) = contraction::contract(&mut working, &mut retained, &self.policy, &totals)?;

        tracing::debug!(
            nodes = retained.num_nodes(),
            rounds = rounds.len(),
            final_alpha = alpha_list.last().copied().unwrap_or(0.0),
            "Pruned junction tree"
        );

        Ok(PruneOutcome {
            alpha_list,
            rounds,
            tree: retained,
            totals,
        })
    }
}
