//! Phase B: greedy fractional contraction.
//!
//! Each round:
//!
//! 1. Select the live edge side with the lowest score/cost ratio
//! 2. Advance the cumulative scale by that ratio (clamped at zero)
//! 3. Remove the losing subtree, stamping the cumulative scale on the
//!    matching retained nodes
//! 4. Lower every remaining score by `step * cost` on the same side
//! 5. Walk outward from the safe endpoint and release the removed cost
//!    from every side that still counted it
//!
//! Nodes that outlive the last round get their threshold from
//! `survivor_threshold`.

use std::collections::VecDeque;

use crate::policy::PruningPolicy;
use crate::tree::{JunctionTree, NodeId, Side, TreeEdgeId};

use super::candidate::{select, Candidate};
use super::propagation::Totals;
use super::working::WorkingTree;
use super::{ContractionRound, InvariantViolation};

/// Outcome of removing one subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Shrink {
    /// Endpoint of the cut edge that stays.
    pub safe: NodeId,
    /// Cost of the removed side.
    pub removed_cost: f64,
    /// Working ids of the removed nodes, breadth-first from the anchor.
    pub removed: Vec<NodeId>,
}

/// Run contraction rounds until no live edge or no candidate remains.
///
/// Returns the cumulative scale list (seeded with 0) and the round log.
/// Every node of `retained` ends up with a drop threshold.
pub fn contract(
    working: &mut WorkingTree,
    retained: &mut JunctionTree,
    policy: &PruningPolicy,
    totals: &Totals,
) -> Result<(Vec<f64>, Vec<ContractionRound>), InvariantViolation> {
    let cost_floor = policy.zero_cost_epsilon * totals.cost.abs();
    let mut alpha_list = vec![0.0];
    let mut rounds = Vec::new();

    while working.num_live_edges() > 0 {
        let Some(candidate) = select(working, policy, cost_floor) else {
            tracing::warn!(
                live_edges = working.num_live_edges(),
                live_nodes = working.num_live_nodes(),
                "No positive-cost side left; stopping contraction early"
            );
            break;
        };

        let step = candidate.ratio.max(0.0);
        let alpha = alpha_list.last().copied().unwrap_or(0.0) + step;
        alpha_list.push(alpha);

        let cut = shrink(working, &candidate)?;
        let removed: Vec<NodeId> = cut.removed.iter().map(|&n| working.origin(n)).collect();
        for &node in &removed {
            retained.node_mut(node).drop_threshold = alpha;
        }

        apply_residual(working, step);
        release_cost(working, cut.safe, cut.removed_cost);

        tracing::trace!(
            round = rounds.len() + 1,
            ratio = candidate.ratio,
            alpha,
            removed = removed.len(),
            "Contraction round"
        );
        rounds.push(ContractionRound { step, alpha, removed });
    }

    let final_alpha = alpha_list.last().copied().unwrap_or(0.0);
    for node in working.live_nodes() {
        let threshold = survivor_threshold(working, node, final_alpha);
        retained.node_mut(working.origin(node)).drop_threshold = threshold;
    }

    Ok((alpha_list, rounds))
}

/// Remove the subtree on the losing side of `candidate`.
///
/// Breadth-first from the anchor; the cut edge is deleted with the
/// anchor, so the walk never reaches the safe endpoint.
pub fn shrink(working: &mut WorkingTree, candidate: &Candidate) -> Result<Shrink, InvariantViolation> {
    let dead = InvariantViolation::DeadCandidate { edge: candidate.edge };
    if !working.is_edge_alive(candidate.edge) {
        return Err(dead);
    }
    let removed_cost = match working.edge(candidate.edge).cost_on(candidate.side) {
        Some(cost) if cost > 0.0 => cost,
        _ => return Err(dead),
    };
    let anchor = candidate.anchor(working);
    let safe = candidate.safe(working);

    let mut removed = Vec::new();
    let mut queue = VecDeque::from([anchor]);
    while let Some(node) = queue.pop_front() {
        for &edge in working.incident(node) {
            let next = working.edge(edge).other(node);
            if next != safe {
                queue.push_back(next);
            }
        }
        // Removing the node unlinks its edges, so nothing is queued twice
        working.remove_node(node);
        removed.push(node);
    }

    Ok(Shrink {
        safe,
        removed_cost,
        removed,
    })
}

/// Re-base every live edge side: `score -= step * cost`.
pub fn apply_residual(working: &mut WorkingTree, step: f64) {
    let live: Vec<TreeEdgeId> = working.live_edges().collect();
    for id in live {
        let edge = working.edge_mut(id);
        for side in Side::BOTH {
            if let (Some(score), Some(cost)) = (edge.score_on(side), edge.cost_on(side)) {
                edge.score[side.index()] = Some(score - step * cost);
            }
        }
    }
}

/// Subtract `removed_cost` from the side facing `safe` on every edge
/// reachable from it, flooring at zero.
pub fn release_cost(working: &mut WorkingTree, safe: NodeId, removed_cost: f64) {
    let mut queue: VecDeque<(TreeEdgeId, NodeId)> =
        working.incident(safe).iter().map(|&e| (e, safe)).collect();

    while let Some((edge_id, from)) = queue.pop_front() {
        let edge = working.edge_mut(edge_id);
        let side = edge.near_side(from);
        if let Some(cost) = edge.cost_on(side) {
            edge.cost[side.index()] = Some((cost - removed_cost).max(0.0));
        }

        let next = edge.other(from);
        queue.extend(
            working
                .incident(next)
                .iter()
                .filter(|&&e| e != edge_id)
                .map(|&e| (e, next)),
        );
    }
}

/// Threshold of a node that no round removed: its own ratio if that is
/// higher than the final scale.
pub fn survivor_threshold(working: &WorkingTree, node: NodeId, final_alpha: f64) -> f64 {
    let node = working.node(node);
    if node.cost > 0.0 {
        final_alpha.max(node.reward / node.cost)
    } else {
        final_alpha
    }
}
