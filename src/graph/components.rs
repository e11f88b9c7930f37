//! Connected-component split of a skeleton graph.

use std::collections::VecDeque;

use super::{SkeletonGraph, VertexId};

impl SkeletonGraph {
    /// Component label of every vertex, labels numbered in discovery order.
    ///
    /// Discovery is breadth-first from the lowest unlabelled vertex, so the
    /// labelling is a pure function of the graph.
    pub fn component_labels(&self) -> Vec<usize> {
        let mut labels: Vec<Option<usize>> = vec![None; self.vertices.len()];
        let mut next_label = 0;

        for start in 0..self.vertices.len() {
            if labels[start].is_some() {
                continue;
            }
            labels[start] = Some(next_label);
            let mut queue = VecDeque::from([start]);
            while let Some(vertex) = queue.pop_front() {
                for &edge in &self.vertices[vertex].incident {
                    let next = self.edges[edge].other(vertex);
                    if labels[next].is_none() {
                        labels[next] = Some(next_label);
                        queue.push_back(next);
                    }
                }
            }
            next_label += 1;
        }

        labels.into_iter().map(|l| l.unwrap_or_default()).collect()
    }

    /// Split into maximal connected subgraphs.
    ///
    /// Each component is an independent graph with freshly numbered
    /// vertices (breadth-first order) and every edge whose endpoints fall
    /// inside it (input order), so cycles survive the split. Vertex
    /// `source_index`, edge `original_index`, `theta` and `length` are
    /// carried over, then `burn()` runs on the copy. Components without
    /// edges are dropped.
    pub fn to_components(&self) -> Vec<SkeletonGraph> {
        let labels = self.component_labels();
        let count = labels.iter().max().map_or(0, |&l| l + 1);

        // BFS discovery order per component, so local ids follow traversal
        let mut members: Vec<Vec<VertexId>> = vec![Vec::new(); count];
        let mut seen = vec![false; self.vertices.len()];
        for start in 0..self.vertices.len() {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(vertex) = queue.pop_front() {
                members[labels[vertex]].push(vertex);
                for &edge in &self.vertices[vertex].incident {
                    let next = self.edges[edge].other(vertex);
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        let mut local_id: Vec<VertexId> = vec![0; self.vertices.len()];
        let mut components: Vec<SkeletonGraph> = members
            .iter()
            .map(|vertices| {
                let mut component = SkeletonGraph::new();
                for &vertex in vertices {
                    let old = &self.vertices[vertex];
                    local_id[vertex] = component.add_vertex(old.source_index, old.position);
                }
                component
            })
            .collect();

        for edge in &self.edges {
            let [a, b] = edge.endpoints;
            components[labels[a]].add_edge(
                local_id[a],
                local_id[b],
                edge.length,
                edge.theta,
                edge.original_index,
            );
        }

        components.retain(|c| c.num_edges() > 0);
        for component in &mut components {
            component.burn();
        }

        tracing::debug!(
            components = components.len(),
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            "Split skeleton into components"
        );
        components
    }
}
