//! Canonical serialization and fingerprints for pruning results.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order, vectors in index order
//! - Floats in fingerprints are hashed through `f64::to_bits`, so
//!   `-0.0`/`0.0` and every NaN payload stay distinguishable and no
//!   decimal rendering is involved
//! - Strings are length-prefixed, so adjacent fields cannot run together
//! - No HashMap is ever serialized

use serde::Serialize;
use xxhash_rust::xxh64::{xxh64, Xxh64};

/// Seed for every fingerprint computed by this crate.
const FINGERPRINT_SEED: u64 = 0;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute the canonical xxh64 hash of a serializable value.
///
/// Fails when the value cannot be rendered as JSON (e.g. a map with
/// non-string keys).
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    Ok(xxh64(&to_canonical_bytes(value)?, FINGERPRINT_SEED))
}

/// Compute the canonical hash and render it as 16 hex digits.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(format!("{:016x}", canonical_hash(value)?))
}

/// Streaming xxh64 over fixed-width fields.
///
/// Used for the crate's own fingerprints, whose fields are all strings,
/// integers and floats, so hashing cannot fail.
pub(crate) struct Fingerprint(Xxh64);

impl Fingerprint {
    pub(crate) fn new() -> Self {
        Self(Xxh64::new(FINGERPRINT_SEED))
    }

    pub(crate) fn str(mut self, value: &str) -> Self {
        self.0.update(&(value.len() as u64).to_le_bytes());
        self.0.update(value.as_bytes());
        self
    }

    pub(crate) fn u64(mut self, value: u64) -> Self {
        self.0.update(&value.to_le_bytes());
        self
    }

    pub(crate) fn f64(self, value: f64) -> Self {
        self.u64(value.to_bits())
    }

    pub(crate) fn hex(self) -> String {
        format!("{:016x}", self.0.digest())
    }
}

/// Fingerprint a threshold list together with its provenance.
///
/// Same schema, same policy hash and bit-identical thresholds give the
/// same fingerprint.
pub fn threshold_fingerprint(schema_version: &str, params_hash: &str, thresholds: &[f64]) -> String {
    thresholds
        .iter()
        .fold(
            Fingerprint::new()
                .str(schema_version)
                .str(params_hash)
                .u64(thresholds.len() as u64),
            |fp, &t| fp.f64(t),
        )
        .hex()
}
