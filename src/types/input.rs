//! Pruning entry-point input: skeleton vertices, branch edges, object angles.

use serde::{Deserialize, Serialize};

use super::geometry::Point2;
use crate::policy::{PruningPolicy, ZeroLengthEdges};

/// Rejected-input error.
///
/// Every variant is a precondition violation: the upstream graph
/// construction produced something the pruner cannot interpret.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// One angle per edge is required.
    #[error("Expected one angle per edge: {edges} edges, {angles} angles")]
    AngleCountMismatch {
        /// Number of edges.
        edges: usize,
        /// Number of angles.
        angles: usize,
    },
    /// Edge references a vertex that does not exist.
    #[error("Edge {edge} references vertex {vertex}, but only {vertex_count} vertices exist")]
    VertexOutOfBounds {
        /// Offending edge index.
        edge: usize,
        /// Referenced vertex index.
        vertex: usize,
        /// Number of vertices.
        vertex_count: usize,
    },
    /// Edge joins a vertex to itself.
    #[error("Edge {edge} is a self loop on vertex {vertex}")]
    SelfLoop {
        /// Offending edge index.
        edge: usize,
        /// Vertex index.
        vertex: usize,
    },
    /// Edge endpoints coincide (only under `ZeroLengthEdges::Reject`).
    #[error("Edge {edge} has zero length")]
    ZeroLengthEdge {
        /// Offending edge index.
        edge: usize,
    },
    /// Vertex coordinate is NaN or infinite.
    #[error("Vertex {vertex} has a non-finite position")]
    NonFinitePoint {
        /// Offending vertex index.
        vertex: usize,
    },
    /// Object angle is NaN or infinite.
    #[error("Edge {edge} has a non-finite object angle")]
    NonFiniteAngle {
        /// Offending edge index.
        edge: usize,
    },
}

/// Skeleton graph as handed over by the medial-axis construction.
///
/// `edges[i]` joins `points[edges[i][0]]` and `points[edges[i][1]]` and has
/// object angle `angles[i]` (radians). Output thresholds follow edge order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonInput {
    /// Vertex positions.
    pub points: Vec<Point2>,
    /// Vertex index pairs, one per branch edge.
    pub edges: Vec<[usize; 2]>,
    /// Object angle per edge.
    pub angles: Vec<f64>,
}

impl SkeletonInput {
    /// Create a new input.
    pub fn new(points: Vec<Point2>, edges: Vec<[usize; 2]>, angles: Vec<f64>) -> Self {
        Self { points, edges, angles }
    }

    /// Number of vertices.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of branch edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Euclidean length of edge `edge`. Panics on an invalid index.
    pub fn edge_length(&self, edge: usize) -> f64 {
        let [a, b] = self.edges[edge];
        self.points[a].distance(&self.points[b])
    }

    /// Check every precondition of the pruner.
    ///
    /// Zero-length edges are accepted under `ZeroLengthEdges::Warn` and
    /// rejected under `ZeroLengthEdges::Reject`.
    pub fn validate(&self, policy: &PruningPolicy) -> Result<(), InputError> {
        if self.angles.len() != self.edges.len() {
            return Err(InputError::AngleCountMismatch {
                edges: self.edges.len(),
                angles: self.angles.len(),
            });
        }

        if let Some(vertex) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(InputError::NonFinitePoint { vertex });
        }

        for (edge, (&[a, b], angle)) in self.edges.iter().zip(&self.angles).enumerate() {
            for vertex in [a, b] {
                if vertex >= self.points.len() {
                    return Err(InputError::VertexOutOfBounds {
                        edge,
                        vertex,
                        vertex_count: self.points.len(),
                    });
                }
            }
            if a == b {
                return Err(InputError::SelfLoop { edge, vertex: a });
            }
            if !angle.is_finite() {
                return Err(InputError::NonFiniteAngle { edge });
            }
            if self.edge_length(edge) == 0.0 {
                match policy.zero_length_edges {
                    ZeroLengthEdges::Reject => return Err(InputError::ZeroLengthEdge { edge }),
                    // Reported when the junction tree is built
                    ZeroLengthEdges::Warn => {}
                }
            }
        }

        Ok(())
    }
}
