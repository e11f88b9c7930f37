//! # skeleton-significance
//!
//! Significance-ordered pruning of 2D skeleton (medial axis) graphs.
//!
//! For every branch of a skeleton the crate computes a **vanishing
//! threshold**: the pruning scale at which the branch disappears. Keeping
//! only the branches whose threshold is at least a cutoff yields a valid,
//! progressively simpler skeleton for any cutoff.
//!
//! ## Core Contract
//!
//! 1. Split the skeleton into its 2-core (cycles, never pruned) and branches
//! 2. Reduce every connected component to an acyclic junction tree
//! 3. Contract each tree greedily by lowest score/cost ratio, recording the
//!    cumulative scale at which each branch goes
//!
//! ## Architecture
//!
//! ```text
//! VoronoiRidges → medial_graph → SkeletonInput → SkeletonGraph (burn)
//!                                                     ↓ to_components
//!                                               JunctionTree per component
//!                                                     ↓ SignificancePruner
//!                                               SkeletonPruning (thresholds)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same input + same policy → bit-identical thresholds and fingerprint
//! - Components are numbered in breadth-first discovery order
//! - Ratio ties are broken by anchor degree, edge id and side, never by
//!   hash order

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod graph;
pub mod tree;
pub mod pruner;
pub mod orchestrator;
pub mod medial;
pub mod canonical;
pub mod telemetry;

// Re-exports
pub use types::{
    angle_between, ComponentReport, InputError, Point2, SimplifiedSkeleton, SkeletonInput,
    SkeletonPruning,
};
pub use policy::{PruningPolicy, ZeroLengthEdges};
pub use graph::{BranchEdge, SkeletonGraph, Vertex};
pub use tree::{JunctionTree, NodeSource, Side, TreeEdge, TreeNode};
pub use pruner::{ContractionRound, InvariantViolation, PruneOutcome, SignificancePruner};
pub use orchestrator::{vanishing_thresholds, PruneError, SkeletonPruner};
pub use medial::{medial_graph, MedialGraph, RidgeError, VoronoiRidges};
pub use canonical::{canonical_hash, canonical_hash_hex, threshold_fingerprint, to_canonical_bytes};

/// Schema version for all result types.
/// Increment on breaking changes to any schema type.
pub const SKELETON_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "pruning_policy_v1";

/// Threshold of edges that never drop (the skeleton core).
pub const NEVER_DROPS: f64 = f64::MAX;

/// Cutoff preset for single-stroke shapes.
pub const SINGLE_STROKE_CUTOFF: f64 = 0.95;

/// Cutoff preset for multi-stroke shapes.
pub const MULTI_STROKE_CUTOFF: f64 = 0.90;
