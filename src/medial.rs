//! Medial graph construction from a Voronoi diagram of boundary samples.
//!
//! The Voronoi diagram of densely sampled closed curves contains the
//! shape's medial axis plus spurious ridges. This module keeps the ridges
//! that can belong to the medial axis and turns them into a
//! `SkeletonInput` with one object angle per edge.
//!
//! ## Ridge filtering
//!
//! A ridge is dropped when:
//!
//! - its two generating samples are neighbours on the same curve
//!   (consecutive indices, or the two ends of the curve's range)
//! - either of its Voronoi vertices is unbounded (negative index)
//! - both Voronoi vertices are the same
//! - it repeats a vertex pair already seen
//! - a generating sample sits exactly on the ridge midpoint
//!
//! ## Sample layout
//!
//! `sample[i]` is closed: its last point repeats the first, so it
//! contributes `len - 1` points to `points`, in curve order.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::types::{angle_between, Point2, SkeletonInput};

/// Error type for medial graph construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RidgeError {
    /// `ridge_points` and `ridge_vertices` differ in length.
    #[error("Ridge arrays differ in length: {ridge_points} point pairs, {ridge_vertices} vertex pairs")]
    LengthMismatch {
        /// Number of point pairs.
        ridge_points: usize,
        /// Number of vertex pairs.
        ridge_vertices: usize,
    },
    /// A boundary curve has no points at all.
    #[error("Boundary curve {curve} is empty")]
    EmptyCurve {
        /// Curve index.
        curve: usize,
    },
    /// A ridge references a sample point that does not exist.
    #[error("Ridge {ridge} references sample point {point}, but only {point_count} exist")]
    PointOutOfBounds {
        /// Ridge index.
        ridge: usize,
        /// Referenced point.
        point: usize,
        /// Number of sample points.
        point_count: usize,
    },
    /// A ridge references a Voronoi vertex that does not exist.
    #[error("Ridge {ridge} references Voronoi vertex {vertex}, but only {vertex_count} exist")]
    VertexOutOfBounds {
        /// Ridge index.
        ridge: usize,
        /// Referenced vertex.
        vertex: i64,
        /// Number of Voronoi vertices.
        vertex_count: usize,
    },
}

/// Voronoi diagram of the boundary samples, in the layout Voronoi libraries emit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoronoiRidges {
    /// Generating sample points.
    pub points: Vec<Point2>,
    /// Pair of generating points per ridge.
    pub ridge_points: Vec<[usize; 2]>,
    /// Pair of Voronoi vertices per ridge; negative means unbounded.
    pub ridge_vertices: Vec<[i64; 2]>,
    /// Voronoi vertex positions.
    pub vertices: Vec<Point2>,
    /// Closed boundary curves the points were sampled from.
    pub sample: Vec<Vec<Point2>>,
}

/// Medial graph ready for pruning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedialGraph {
    /// Skeleton vertices, edges and object angles.
    pub skeleton: SkeletonInput,
    /// Voronoi vertex index of every skeleton vertex.
    pub vertex_ids: Vec<usize>,
    /// Distance from every skeleton vertex to a generating sample.
    pub radii: Vec<f64>,
}

impl VoronoiRidges {
    /// Index range each curve occupies in `points`.
    pub fn curve_ranges(&self) -> Result<Vec<Range<usize>>, RidgeError> {
        let mut start = 0;
        self.sample
            .iter()
            .enumerate()
            .map(|(curve, points)| {
                if points.is_empty() {
                    return Err(RidgeError::EmptyCurve { curve });
                }
                let range = start..start + points.len() - 1;
                start = range.end;
                Ok(range)
            })
            .collect()
    }
}

/// Whether two samples are neighbours on the curve occupying `range`.
fn are_adjacent(a: usize, b: usize, range: &Range<usize>) -> bool {
    if !range.contains(&a) || !range.contains(&b) {
        return false;
    }
    let last = range.end - 1;
    (a == range.start && b == last) || (b == range.start && a == last) || a.abs_diff(b) == 1
}

/// Skeleton vertices collected in first-use order.
#[derive(Default)]
struct VertexTable {
    index: HashMap<usize, usize>,
    positions: Vec<Point2>,
    vertex_ids: Vec<usize>,
    radii: Vec<f64>,
}

impl VertexTable {
    fn intern(&mut self, vertex: usize, position: Point2, radius: f64) -> usize {
        *self.index.entry(vertex).or_insert_with(|| {
            self.positions.push(position);
            self.vertex_ids.push(vertex);
            self.radii.push(radius);
            self.positions.len() - 1
        })
    }
}

/// Build the medial graph of `ridges`.
pub fn medial_graph(ridges: &VoronoiRidges) -> Result<MedialGraph, RidgeError> {
    if ridges.ridge_points.len() != ridges.ridge_vertices.len() {
        return Err(RidgeError::LengthMismatch {
            ridge_points: ridges.ridge_points.len(),
            ridge_vertices: ridges.ridge_vertices.len(),
        });
    }
    let ranges = ridges.curve_ranges()?;

    let mut table = VertexTable::default();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut edges = Vec::new();
    let mut angles = Vec::new();

    for (ridge, (&[p1, p2], &[v1, v2])) in ridges.ridge_points.iter().zip(&ridges.ridge_vertices).enumerate() {
        for point in [p1, p2] {
            if point >= ridges.points.len() {
                return Err(RidgeError::PointOutOfBounds {
                    ridge,
                    point,
                    point_count: ridges.points.len(),
                });
            }
        }
        if ranges.iter().any(|range| are_adjacent(p1, p2, range)) {
            continue;
        }
        if v1 < 0 || v2 < 0 {
            continue;
        }
        for vertex in [v1, v2] {
            if vertex as usize >= ridges.vertices.len() {
                return Err(RidgeError::VertexOutOfBounds {
                    ridge,
                    vertex,
                    vertex_count: ridges.vertices.len(),
                });
            }
        }
        let (v1, v2) = (v1 as usize, v2 as usize);
        if v1 == v2 {
            continue;
        }
        if !seen.insert((v1.min(v2), v1.max(v2))) {
            tracing::warn!(ridge, vertex_a = v1, vertex_b = v2, "Duplicate Voronoi ridge ignored");
            continue;
        }

        let (pos1, pos2) = (ridges.vertices[v1], ridges.vertices[v2]);
        let (sample1, sample2) = (ridges.points[p1], ridges.points[p2]);
        let mid = pos1.midpoint(&pos2);
        let object_angle = angle_between(&sample1.relative_to(&mid), &sample2.relative_to(&mid)) / 2.0;
        if !object_angle.is_finite() {
            tracing::warn!(ridge, "Generating sample on ridge midpoint; ridge ignored");
            continue;
        }

        let a = table.intern(v1, pos1, pos1.distance(&sample1));
        let b = table.intern(v2, pos2, pos2.distance(&sample1));
        edges.push([a, b]);
        angles.push(object_angle);
    }

    tracing::debug!(
        ridges = ridges.ridge_points.len(),
        vertices = table.positions.len(),
        edges = edges.len(),
        "Built medial graph"
    );

    Ok(MedialGraph {
        skeleton: SkeletonInput::new(table.positions, edges, angles),
        vertex_ids: table.vertex_ids,
        radii: table.radii,
    })
}
