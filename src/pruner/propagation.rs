//! Phase A: directional aggregates by iterative leaf peeling.
//!
//! Each round collects the unvisited nodes with fewer than two unvisited
//! neighbours. Every such leaf folds in the running totals of its already
//! visited neighbours, recording them on the connecting edges, and only
//! then is the whole round marked visited. Whatever a round leaves unset
//! is recovered from the complementary sums.

use serde::{Deserialize, Serialize};

use crate::tree::{JunctionTree, NodeId, Side};

use super::InvariantViolation;

/// Total score and cost of a junction tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of node rewards.
    pub score: f64,
    /// Sum of node costs.
    pub cost: f64,
}

/// Fill the directional score and cost of every edge of `tree`.
///
/// Resets the node accumulators and edge fields first, so it can be run
/// on a tree that was propagated before. Afterwards every edge satisfies
/// `score[A] + score[B] == totals.score` and the same for cost, up to
/// rounding.
pub fn propagate(tree: &mut JunctionTree) -> Result<Totals, InvariantViolation> {
    for id in 0..tree.num_nodes() {
        let node = tree.node_mut(id);
        node.score = node.reward;
        node.total_cost = node.cost;
        node.visited = false;
    }
    for id in 0..tree.num_edges() {
        tree.edge_mut(id).clear_sides();
    }
    let totals = Totals {
        score: tree.total_reward(),
        cost: tree.total_cost(),
    };

    let mut last_round = Vec::new();
    loop {
        let leaves = current_leaves(tree);
        if leaves.is_empty() {
            break;
        }
        for &leaf in &leaves {
            fold_leaf(tree, leaf);
        }
        for &leaf in &leaves {
            tree.node_mut(leaf).visited = true;
        }
        last_round = leaves;
    }

    match last_round[..] {
        [last] => finish_single(tree, last),
        [first, second] => finish_pair(tree, first, second),
        _ => {}
    }

    complete_sides(tree, &totals)?;
    Ok(totals)
}

fn current_leaves(tree: &JunctionTree) -> Vec<NodeId> {
    (0..tree.num_nodes())
        .filter(|&id| {
            let node = tree.node(id);
            !node.visited
                && node
                    .edges()
                    .iter()
                    .filter(|&&e| !tree.node(tree.edge(e).other(id)).visited)
                    .count()
                    < 2
        })
        .collect()
}

fn fold_leaf(tree: &mut JunctionTree, leaf: NodeId) {
    let incident = tree.node(leaf).edges().to_vec();
    for edge_id in incident {
        let far = tree.edge(edge_id).other(leaf);
        let far_node = tree.node(far);
        if !far_node.visited {
            continue;
        }
        let (score, cost) = (far_node.score, far_node.total_cost);

        let edge = tree.edge_mut(edge_id);
        let side = edge.far_side(leaf);
        edge.set_side(side, score, cost);

        let node = tree.node_mut(leaf);
        node.score += score;
        node.total_cost += cost;
    }
}

/// The last round was one node: every edge's far side is its neighbour's subtree.
fn finish_single(tree: &mut JunctionTree, last: NodeId) {
    let incident = tree.node(last).edges().to_vec();
    for edge_id in incident {
        let far = tree.edge(edge_id).other(last);
        let side = tree.edge(edge_id).far_side(last);
        if tree.edge(edge_id).score_on(side).is_none() {
            let (score, cost) = (tree.node(far).score, tree.node(far).total_cost);
            tree.edge_mut(edge_id).set_side(side, score, cost);
        }
    }
}

/// The last round was two adjacent nodes: the edge joining them gets its
/// A side from endpoint A's final totals.
fn finish_pair(tree: &mut JunctionTree, first: NodeId, second: NodeId) {
    let joining = tree
        .node(first)
        .edges()
        .iter()
        .copied()
        .find(|&e| tree.edge(e).other(first) == second);
    if let Some(edge_id) = joining {
        let a = tree.edge(edge_id).end(Side::A);
        let (score, cost) = (tree.node(a).score, tree.node(a).total_cost);
        tree.edge_mut(edge_id).set_side(Side::A, score, cost);
    }
}

fn complete_sides(tree: &mut JunctionTree, totals: &Totals) -> Result<(), InvariantViolation> {
    for id in 0..tree.num_edges() {
        let edge = tree.edge_mut(id);
        for side in Side::BOTH {
            let (here, there) = (side.index(), side.opposite().index());
            if edge.score[here].is_none() {
                edge.score[here] = edge.score[there].map(|known| totals.score - known);
            }
            if edge.cost[here].is_none() {
                edge.cost[here] = edge.cost[there].map(|known| totals.cost - known);
            }
        }
        if edge.score.contains(&None) || edge.cost.contains(&None) {
            return Err(InvariantViolation::UnresolvedEdge { edge: id });
        }
    }
    Ok(())
}
