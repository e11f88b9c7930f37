//! Skeleton graph: vertices, branch edges and the core/branch split.
//!
//! Vertices and edges live in index-addressed vectors owned by the graph.
//! Every cross reference (edge endpoints, vertex adjacency) is a plain index.
//!
//! ## Core detection
//!
//! `burn()` strips degree-1 vertices in FIFO order. Every edge reached by
//! the sweep becomes a branch (`is_core = false`); the edges it never
//! reaches form the 2-core: cycles plus the paths binding them.

pub mod components;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{InputError, Point2, SkeletonInput};
use crate::policy::PruningPolicy;
use crate::NEVER_DROPS;

/// Index of a vertex inside one `SkeletonGraph`.
pub type VertexId = usize;

/// Index of a branch edge inside one `SkeletonGraph`.
pub type BranchId = usize;

/// Skeleton vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Index of this vertex in the caller's point list.
    pub source_index: usize,
    /// Position in the plane.
    pub position: Point2,
    /// Whether the vertex touches at least one core edge.
    pub is_core: bool,
    /// Incident branch edges.
    incident: Vec<BranchId>,
}

impl Vertex {
    fn new(source_index: usize, position: Point2) -> Self {
        Self {
            source_index,
            position,
            is_core: false,
            incident: Vec::new(),
        }
    }

    /// Incident edge ids, in insertion order.
    pub fn incident(&self) -> &[BranchId] {
        &self.incident
    }

    /// Number of incident edges.
    pub fn degree(&self) -> usize {
        self.incident.len()
    }

    /// Whether the vertex is a leaf or dangling point (degree ≤ 1).
    pub fn is_isolated(&self) -> bool {
        self.degree() <= 1
    }
}

/// Skeleton edge between two vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchEdge {
    /// Endpoint vertex ids.
    pub endpoints: [VertexId; 2],
    /// Euclidean length.
    pub length: f64,
    /// Object angle in radians.
    pub theta: f64,
    /// Whether the edge belongs to the 2-core.
    pub is_core: bool,
    /// Index of this edge in the caller's edge list.
    pub original_index: usize,
    /// Pruning scale at which the edge vanishes.
    pub drop_threshold: f64,
}

impl BranchEdge {
    /// Endpoint opposite to `vertex`.
    pub fn other(&self, vertex: VertexId) -> VertexId {
        if self.endpoints[0] == vertex {
            self.endpoints[1]
        } else {
            self.endpoints[0]
        }
    }

    /// Angular reward `sin(theta) * length`.
    pub fn reward(&self) -> f64 {
        self.theta.sin() * self.length
    }
}

/// Undirected skeleton graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonGraph {
    vertices: Vec<Vertex>,
    edges: Vec<BranchEdge>,
}

impl SkeletonGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `input` and build its graph, with the core already burned.
    pub fn build(input: &SkeletonInput, policy: &PruningPolicy) -> Result<Self, InputError> {
        input.validate(policy)?;

        let mut graph = Self::new();
        for (index, point) in input.points.iter().enumerate() {
            graph.add_vertex(index, *point);
        }
        for (index, (&[a, b], &theta)) in input.edges.iter().zip(&input.angles).enumerate() {
            let length = input.points[a].distance(&input.points[b]);
            graph.add_edge(a, b, length, theta, index);
        }

        graph.burn();
        Ok(graph)
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, source_index: usize, position: Point2) -> VertexId {
        self.vertices.push(Vertex::new(source_index, position));
        self.vertices.len() - 1
    }

    /// Add an edge between two existing vertices and return its id.
    ///
    /// Panics if either endpoint does not exist; `build()` validates
    /// indices before calling this.
    pub fn add_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        length: f64,
        theta: f64,
        original_index: usize,
    ) -> BranchId {
        let id = self.edges.len();
        self.edges.push(BranchEdge {
            endpoints: [a, b],
            length,
            theta,
            is_core: true,
            original_index,
            drop_threshold: NEVER_DROPS,
        });
        self.vertices[a].incident.push(id);
        self.vertices[b].incident.push(id);
        id
    }

    /// All vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All edges.
    pub fn edges(&self) -> &[BranchEdge] {
        &self.edges
    }

    /// Mutable access to one edge, for threshold write-back.
    pub fn edge_mut(&mut self, id: BranchId) -> &mut BranchEdge {
        &mut self.edges[id]
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges in the 2-core.
    pub fn core_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_core).count()
    }

    /// Whether the graph has any core edge.
    pub fn has_core(&self) -> bool {
        self.edges.iter().any(|e| e.is_core)
    }

    /// Split edges into core and branch by iterative leaf stripping.
    ///
    /// Starts from every edge flagged core, seeds a FIFO queue with all
    /// degree-1 vertices, and for each dequeued vertex turns its single
    /// remaining edge into a branch; the far endpoint is enqueued once it
    /// is down to one remaining edge. Degrees are tracked on a scratch
    /// table, so adjacency lists are left untouched and repeated calls give
    /// identical flags. Returns the number of branch edges.
    pub fn burn(&mut self) -> usize {
        for edge in &mut self.edges {
            edge.is_core = true;
        }

        let mut live_degree: Vec<usize> = self.vertices.iter().map(Vertex::degree).collect();
        let mut queue: VecDeque<VertexId> = live_degree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 1)
            .map(|(v, _)| v)
            .collect();

        let mut burned = 0;
        while let Some(vertex) = queue.pop_front() {
            let remaining = self.vertices[vertex]
                .incident
                .iter()
                .copied()
                .find(|&e| self.edges[e].is_core);
            let Some(edge_id) = remaining else {
                continue;
            };

            let edge = &mut self.edges[edge_id];
            edge.is_core = false;
            burned += 1;

            let far = edge.other(vertex);
            live_degree[far] -= 1;
            if live_degree[far] == 1 {
                queue.push_back(far);
            }
        }

        for vertex in &mut self.vertices {
            vertex.is_core = vertex.incident.iter().any(|&e| self.edges[e].is_core);
        }

        tracing::debug!(
            vertices = self.vertices.len(),
            edges = self.edges.len(),
            burned,
            "Burned skeleton graph"
        );
        burned
    }
}
