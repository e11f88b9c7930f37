//! Disposable copy of a junction tree for destructive contraction.

use crate::tree::{JunctionTree, NodeId, TreeEdge, TreeEdgeId, TreeNode};

/// Junction tree copy with liveness flags and mutable adjacency.
///
/// Node and edge ids stay those of the source tree; `origin` maps each
/// working node back to the retained node that receives its threshold.
#[derive(Debug, Clone)]
pub struct WorkingTree {
    nodes: Vec<TreeNode>,
    edges: Vec<TreeEdge>,
    node_alive: Vec<bool>,
    edge_alive: Vec<bool>,
    adjacency: Vec<Vec<TreeEdgeId>>,
    origin: Vec<NodeId>,
    initial_degree: Vec<usize>,
    live_nodes: usize,
    live_edges: usize,
}

impl WorkingTree {
    /// Deep copy `tree`, including its directional aggregates.
    pub fn new(tree: &JunctionTree) -> Self {
        let adjacency: Vec<Vec<TreeEdgeId>> = tree.nodes().iter().map(|n| n.edges().to_vec()).collect();
        Self {
            nodes: tree.nodes().to_vec(),
            edges: tree.edges().to_vec(),
            node_alive: vec![true; tree.num_nodes()],
            edge_alive: vec![true; tree.num_edges()],
            initial_degree: adjacency.iter().map(Vec::len).collect(),
            adjacency,
            origin: (0..tree.num_nodes()).collect(),
            live_nodes: tree.num_nodes(),
            live_edges: tree.num_edges(),
        }
    }

    /// Retained-tree id of a working node.
    pub fn origin(&self, node: NodeId) -> NodeId {
        self.origin[node]
    }

    /// Degree of a node when the copy was made.
    pub fn initial_degree(&self, node: NodeId) -> usize {
        self.initial_degree[node]
    }

    /// One node.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// One edge.
    pub fn edge(&self, id: TreeEdgeId) -> &TreeEdge {
        &self.edges[id]
    }

    /// One edge, mutably.
    pub fn edge_mut(&mut self, id: TreeEdgeId) -> &mut TreeEdge {
        &mut self.edges[id]
    }

    /// Live edges incident to `node`.
    pub fn incident(&self, node: NodeId) -> &[TreeEdgeId] {
        &self.adjacency[node]
    }

    /// Whether the node has not been removed.
    pub fn is_node_alive(&self, id: NodeId) -> bool {
        self.node_alive[id]
    }

    /// Whether the edge has not been removed.
    pub fn is_edge_alive(&self, id: TreeEdgeId) -> bool {
        self.edge_alive[id]
    }

    /// Ids of live nodes, ascending.
    pub fn live_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).filter(|&id| self.node_alive[id])
    }

    /// Ids of live edges, ascending.
    pub fn live_edges(&self) -> impl Iterator<Item = TreeEdgeId> + '_ {
        (0..self.edges.len()).filter(|&id| self.edge_alive[id])
    }

    /// Number of live nodes.
    pub fn num_live_nodes(&self) -> usize {
        self.live_nodes
    }

    /// Number of live edges.
    pub fn num_live_edges(&self) -> usize {
        self.live_edges
    }

    /// Delete an edge and unlink it from both endpoints.
    pub fn remove_edge(&mut self, id: TreeEdgeId) {
        if !self.edge_alive[id] {
            return;
        }
        self.edge_alive[id] = false;
        self.live_edges -= 1;
        for end in self.edges[id].ends {
            self.adjacency[end].retain(|&e| e != id);
        }
    }

    /// Delete a node together with its remaining edges.
    pub fn remove_node(&mut self, id: NodeId) {
        if !self.node_alive[id] {
            return;
        }
        for edge in std::mem::take(&mut self.adjacency[id]) {
            self.remove_edge(edge);
        }
        self.node_alive[id] = false;
        self.live_nodes -= 1;
    }
}
