//! PruningPolicy v1: sentinel, tolerances and input strictness.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Tolerances in this policy are far below any decimal quantization step
//! (`1e-9`, `1e-12`), so floats are hashed through their IEEE-754 bit
//! pattern instead of being rounded. Two policies hash equally iff every
//! field is bit-identical.

use serde::{Deserialize, Serialize};
use crate::canonical::Fingerprint;
use crate::{DEFAULT_POLICY_VERSION, NEVER_DROPS};

/// What to do with branch edges whose endpoints coincide.
///
/// A zero-length branch has an undefined significance ratio, so it either
/// gets logged and carried through with zero cost, or rejects the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroLengthEdges {
    /// Log a warning and keep the edge.
    #[default]
    Warn,
    /// Fail with `InputError::ZeroLengthEdge`.
    Reject,
}

/// Pruning policy version 1.
///
/// ## Parameters
///
/// - `core_threshold`: value reported for edges that stay in the skeleton core
/// - `ratio_tolerance`: relative gap under which two significance ratios tie
/// - `zero_cost_epsilon`: directions whose cost is at most this fraction of
///   the tree's total cost are excluded from the minimum-ratio search
/// - `zero_length_edges`: warn about or reject zero-length branches
/// - `parallel_threshold`: number of components from which components are
///   pruned concurrently (only with the `parallel` feature)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruningPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Threshold reported for core edges ("never drops").
    pub core_threshold: f64,
    /// Relative tolerance for ratio ties.
    pub ratio_tolerance: f64,
    /// Relative cost under which a direction counts as zero-cost.
    pub zero_cost_epsilon: f64,
    /// Handling of zero-length branch edges.
    pub zero_length_edges: ZeroLengthEdges,
    /// Minimum component count for concurrent pruning.
    pub parallel_threshold: usize,
}

impl PruningPolicy {
    /// Create a policy with a custom core sentinel and default tolerances.
    pub fn with_core_threshold(core_threshold: f64) -> Self {
        Self {
            core_threshold,
            ..Self::default()
        }
    }

    /// Strict variant: zero-length branches are rejected.
    pub fn strict() -> Self {
        Self {
            zero_length_edges: ZeroLengthEdges::Reject,
            ..Self::default()
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        let zero_length_tag = match self.zero_length_edges {
            ZeroLengthEdges::Warn => 0,
            ZeroLengthEdges::Reject => 1,
        };
        Fingerprint::new()
            .str(&self.version)
            .f64(self.core_threshold)
            .f64(self.ratio_tolerance)
            .f64(self.zero_cost_epsilon)
            .u64(zero_length_tag)
            .u64(self.parallel_threshold as u64)
            .hex()
    }

    /// Whether `candidate` ties with `best` under the ratio tolerance.
    pub fn ratios_tie(&self, candidate: f64, best: f64) -> bool {
        (candidate - best).abs() <= self.ratio_tolerance * best.abs().max(1.0)
    }

    /// Whether `candidate` is strictly below `best` beyond the tolerance.
    pub fn ratio_below(&self, candidate: f64, best: f64) -> bool {
        candidate < best - self.ratio_tolerance * best.abs().max(1.0)
    }
}

impl Default for PruningPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            core_threshold: NEVER_DROPS,
            ratio_tolerance: 1e-9,
            zero_cost_epsilon: 1e-12,
            zero_length_edges: ZeroLengthEdges::Warn,
            parallel_threshold: 4,
        }
    }
}
