//! Reduction of a burned skeleton component into a junction tree.
//!
//! ## Node layout
//!
//! 1. The aggregate core node, when the component has a core
//! 2. One node per branch edge, in edge order
//! 3. Synthetic junctions, in vertex order
//!
//! ## Vertex rules
//!
//! | core edges | branch edges | tree edges added |
//! |---|---|---|
//! | >0 | 0 | none |
//! | >0 | 1 | core - branch |
//! | >0 | >1 | core - junction, junction - each branch |
//! | 0 | 0 or 1 | none |
//! | 0 | 2 | branch - branch |
//! | 0 | >2 | junction - each branch |

use crate::graph::{BranchEdge, SkeletonGraph};
use crate::types::Point2;

use super::{JunctionTree, NodeId, NodeSource, TreeNode};

impl SkeletonGraph {
    /// Build the junction tree of this component.
    ///
    /// Expects `burn()` to have run (which `build()` and `to_components()`
    /// guarantee). The core collapses into one node whose reward is the
    /// angular reward of every edge in the component and whose cost is the
    /// component's shortest edge length.
    pub fn to_junction_tree(&self) -> JunctionTree {
        let mut tree = JunctionTree::new();

        let core = self.has_core().then(|| {
            let position = Point2::centroid(
                self.vertices().iter().filter(|v| v.is_core).map(|v| &v.position),
            )
            .unwrap_or_default();
            let reward: f64 = self.edges().iter().map(BranchEdge::reward).sum();
            let cost = self
                .edges()
                .iter()
                .map(|e| e.length)
                .fold(f64::INFINITY, f64::min);
            tree.add_node(TreeNode::new(position, reward, cost, NodeSource::Core))
        });

        let mut branch_node: Vec<Option<NodeId>> = vec![None; self.num_edges()];
        for (id, edge) in self.edges().iter().enumerate() {
            if edge.is_core {
                continue;
            }
            if edge.length == 0.0 {
                tracing::warn!(
                    edge = edge.original_index,
                    "Zero-length branch edge carried with zero cost"
                );
            }
            let [a, b] = edge.endpoints;
            let position = self.vertices()[a].position.midpoint(&self.vertices()[b].position);
            branch_node[id] = Some(tree.add_node(TreeNode::new(
                position,
                edge.reward(),
                edge.length,
                NodeSource::Branch(edge.original_index),
            )));
        }

        for vertex in self.vertices() {
            let core_count = vertex
                .incident()
                .iter()
                .filter(|&&e| self.edges()[e].is_core)
                .count();
            let branches: Vec<NodeId> = vertex
                .incident()
                .iter()
                .filter_map(|&e| branch_node[e])
                .collect();

            let hub = if core_count > 0 { core } else { None };
            match (hub, branches.len()) {
                (Some(_), 0) | (None, 0 | 1) => {}
                (Some(core), 1) => {
                    tree.add_edge(core, branches[0]);
                }
                (Some(core), _) => {
                    let junction = tree.add_node(TreeNode::junction(vertex.position));
                    tree.add_edge(core, junction);
                    for &branch in &branches {
                        tree.add_edge(junction, branch);
                    }
                }
                (None, 2) => {
                    tree.add_edge(branches[0], branches[1]);
                }
                (None, _) => {
                    let junction = tree.add_node(TreeNode::junction(vertex.position));
                    for &branch in &branches {
                        tree.add_edge(junction, branch);
                    }
                }
            }
        }

        tracing::debug!(
            vertices = self.num_vertices(),
            edges = self.num_edges(),
            core_edges = self.core_edge_count(),
            tree = %tree.describe(),
            "Built junction tree"
        );
        tree
    }
}
