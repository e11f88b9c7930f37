//! Junction tree: the acyclic reduction of one skeleton component.
//!
//! One node per branch edge, one aggregate node for the whole core, and
//! zero-cost junction nodes where branches fan out. Nodes and edges are
//! stored in vectors; every cross reference is an index.
//!
//! ## Directional fields
//!
//! A tree edge splits the tree in two. `score[Side::A]` / `cost[Side::A]`
//! aggregate the subtree that contains endpoint A (what would be removed if
//! A's side were cut away), and symmetrically for B. Once propagation has
//! run, `score[A] + score[B]` equals the tree's total score on every edge,
//! and the same for cost.

pub mod builder;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::Point2;
use crate::NEVER_DROPS;

/// Index of a node inside one `JunctionTree`.
pub type NodeId = usize;

/// Index of an edge inside one `JunctionTree`.
pub type TreeEdgeId = usize;

/// One of the two endpoints of a tree edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First endpoint.
    A,
    /// Second endpoint.
    B,
}

impl Side {
    /// Both sides, A first.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Array index of this side.
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// What a tree node stands for in the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeSource {
    /// A branch edge, by its index in the caller's edge list.
    Branch(usize),
    /// Synthetic zero-cost junction.
    Junction,
    /// The aggregate core node.
    Core,
}

impl NodeSource {
    /// Caller edge index for branch nodes.
    pub fn branch_index(self) -> Option<usize> {
        match self {
            NodeSource::Branch(index) => Some(index),
            NodeSource::Junction | NodeSource::Core => None,
        }
    }

    /// Signed encoding: branch index, `-1` for junctions, `-2` for the core.
    pub fn as_signed(self) -> i64 {
        match self {
            NodeSource::Branch(index) => index as i64,
            NodeSource::Junction => -1,
            NodeSource::Core => -2,
        }
    }
}

/// Junction tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Representative position (edge midpoint, junction vertex, core centroid).
    pub position: Point2,
    /// Angular reward.
    pub reward: f64,
    /// Removal cost.
    pub cost: f64,
    /// Running score during propagation.
    pub score: f64,
    /// Running cost during propagation.
    pub total_cost: f64,
    /// Propagation visit flag.
    pub visited: bool,
    /// Skeleton element this node represents.
    pub source: NodeSource,
    /// Pruning scale at which the node vanishes.
    pub drop_threshold: f64,
    /// Incident tree edges.
    edges: Vec<TreeEdgeId>,
}

impl TreeNode {
    /// Create a node with accumulators reset and no edges.
    pub fn new(position: Point2, reward: f64, cost: f64, source: NodeSource) -> Self {
        Self {
            position,
            reward,
            cost,
            score: reward,
            total_cost: cost,
            visited: false,
            source,
            drop_threshold: NEVER_DROPS,
            edges: Vec::new(),
        }
    }

    /// Zero-reward, zero-cost junction at `position`.
    pub fn junction(position: Point2) -> Self {
        Self::new(position, 0.0, 0.0, NodeSource::Junction)
    }

    /// Incident edges.
    pub fn edges(&self) -> &[TreeEdgeId] {
        &self.edges
    }

    /// Number of incident edges.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// Junction tree edge with its four directional aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEdge {
    /// Endpoints, indexed by `Side`.
    pub ends: [NodeId; 2],
    /// Subtree score on each side; `None` until propagation sets it.
    pub score: [Option<f64>; 2],
    /// Subtree cost on each side; `None` until propagation sets it.
    pub cost: [Option<f64>; 2],
}

impl TreeEdge {
    /// Create an edge with unset directional fields.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            ends: [a, b],
            score: [None; 2],
            cost: [None; 2],
        }
    }

    /// Endpoint on `side`.
    pub fn end(&self, side: Side) -> NodeId {
        self.ends[side.index()]
    }

    /// Side on which `node` sits, `None` if it is not an endpoint.
    pub fn side_of(&self, node: NodeId) -> Option<Side> {
        if self.ends[0] == node {
            Some(Side::A)
        } else if self.ends[1] == node {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Side on which `node` sits. `node` must be an endpoint.
    pub fn near_side(&self, node: NodeId) -> Side {
        if self.ends[0] == node {
            Side::A
        } else {
            Side::B
        }
    }

    /// Side opposite to `node`. `node` must be an endpoint.
    pub fn far_side(&self, node: NodeId) -> Side {
        self.near_side(node).opposite()
    }

    /// Endpoint opposite to `node`.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.ends[0] == node {
            self.ends[1]
        } else {
            self.ends[0]
        }
    }

    /// Score of the subtree on `side`.
    pub fn score_on(&self, side: Side) -> Option<f64> {
        self.score[side.index()]
    }

    /// Cost of the subtree on `side`.
    pub fn cost_on(&self, side: Side) -> Option<f64> {
        self.cost[side.index()]
    }

    /// Record the aggregates of the subtree on `side`.
    pub fn set_side(&mut self, side: Side, score: f64, cost: f64) {
        self.score[side.index()] = Some(score);
        self.cost[side.index()] = Some(cost);
    }

    /// Forget all directional aggregates.
    pub fn clear_sides(&mut self) {
        self.score = [None; 2];
        self.cost = [None; 2];
    }
}

/// Result of the structural tree check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeShape {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of edges.
    pub edges: usize,
    /// Whether every node is reachable from node 0.
    pub connected: bool,
}

impl TreeShape {
    /// `|E| = |N| - 1` and connected (an empty tree counts as a tree).
    pub fn is_tree(&self) -> bool {
        self.nodes == 0 || (self.connected && self.edges + 1 == self.nodes)
    }
}

/// Acyclic, connected tree over branch, junction and core nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JunctionTree {
    nodes: Vec<TreeNode>,
    edges: Vec<TreeEdge>,
}

impl JunctionTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Connect two existing nodes and return the edge id.
    ///
    /// Panics if either node does not exist.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> TreeEdgeId {
        let id = self.edges.len();
        self.edges.push(TreeEdge::new(a, b));
        self.nodes[a].edges.push(id);
        self.nodes[b].edges.push(id);
        id
    }

    /// All nodes.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// All edges.
    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    /// One node.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// One node, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id]
    }

    /// One edge.
    pub fn edge(&self, id: TreeEdgeId) -> &TreeEdge {
        &self.edges[id]
    }

    /// One edge, mutably.
    pub fn edge_mut(&mut self, id: TreeEdgeId) -> &mut TreeEdge {
        &mut self.edges[id]
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the aggregate core node, if any.
    pub fn core_node(&self) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.source == NodeSource::Core)
    }

    /// Sum of node rewards.
    pub fn total_reward(&self) -> f64 {
        self.nodes.iter().map(|n| n.reward).sum()
    }

    /// Sum of node costs.
    pub fn total_cost(&self) -> f64 {
        self.nodes.iter().map(|n| n.cost).sum()
    }

    /// Count nodes and edges and test connectivity from node 0.
    pub fn check_tree(&self) -> TreeShape {
        let mut reached = vec![false; self.nodes.len()];
        let mut count = 0;
        if !self.nodes.is_empty() {
            reached[0] = true;
            let mut queue = VecDeque::from([0]);
            while let Some(node) = queue.pop_front() {
                count += 1;
                for &edge in &self.nodes[node].edges {
                    let next = self.edges[edge].other(node);
                    if !reached[next] {
                        reached[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        TreeShape {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            connected: count == self.nodes.len(),
        }
    }

    /// Short human-readable summary.
    pub fn describe(&self) -> String {
        let junctions = self.nodes.iter().filter(|n| n.source == NodeSource::Junction).count();
        format!(
            "{} nodes ({} junctions, core: {}), {} edges",
            self.nodes.len(),
            junctions,
            self.core_node().is_some(),
            self.edges.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(index: usize, reward: f64, cost: f64) -> TreeNode {
        TreeNode::new(Point2::default(), reward, cost, NodeSource::Branch(index))
    }

    #[test]
    fn test_side_helpers() {
        let mut edge = TreeEdge::new(3, 7);

        assert_eq!(edge.side_of(3), Some(Side::A));
        assert_eq!(edge.side_of(7), Some(Side::B));
        assert_eq!(edge.side_of(1), None);
        assert_eq!(edge.other(3), 7);
        assert_eq!(edge.end(Side::B), 7);
        assert_eq!(edge.near_side(7), Side::B);
        assert_eq!(edge.far_side(7), Side::A);
        assert_eq!(Side::A.opposite(), Side::B);

        edge.set_side(Side::B, 1.5, 2.0);
        assert_eq!(edge.score_on(Side::B), Some(1.5));
        assert_eq!(edge.cost_on(Side::B), Some(2.0));
        assert_eq!(edge.score_on(Side::A), None);
        edge.clear_sides();
        assert_eq!(edge.cost_on(Side::B), None);
    }

    #[test]
    fn test_node_source_encoding() {
        assert_eq!(NodeSource::Branch(4).as_signed(), 4);
        assert_eq!(NodeSource::Junction.as_signed(), -1);
        assert_eq!(NodeSource::Core.as_signed(), -2);
        assert_eq!(NodeSource::Branch(4).branch_index(), Some(4));
        assert_eq!(NodeSource::Core.branch_index(), None);
    }

    #[test]
    fn test_check_tree() {
        let mut tree = JunctionTree::new();
        let a = tree.add_node(branch(0, 1.0, 1.0));
        let b = tree.add_node(branch(1, 1.0, 1.0));
        let c = tree.add_node(branch(2, 1.0, 1.0));
        tree.add_edge(a, b);

        let shape = tree.check_tree();
        assert!(!shape.connected);
        assert!(!shape.is_tree());

        tree.add_edge(b, c);
        assert!(tree.check_tree().is_tree());
        assert_eq!(tree.node(b).degree(), 2);

        tree.add_edge(c, a);
        assert!(!tree.check_tree().is_tree());
    }

    #[test]
    fn test_totals() {
        let mut tree = JunctionTree::new();
        tree.add_node(branch(0, 0.5, 2.0));
        tree.add_node(TreeNode::junction(Point2::new(1.0, 1.0)));
        tree.add_node(branch(1, 0.25, 1.0));

        assert_eq!(tree.total_reward(), 0.75);
        assert_eq!(tree.total_cost(), 3.0);
        assert_eq!(tree.core_node(), None);
        assert!(JunctionTree::new().check_tree().is_tree());
    }
}
