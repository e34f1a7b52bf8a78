//! Nullifier derivation and the used-nullifier registry
//!
//! A nullifier is the deterministic digest `H("nullifier" || voter_id ||
//! target_id)`. The determinism is the point: the same (voter, target) pair
//! always derives the same nullifier, so a second vote attempt is detectable
//! without ever looking up the voter's identity. Different targets derive
//! uncorrelated nullifiers, so votes by one voter across submissions stay
//! unlinkable.
//!
//! The registry's used-set is the only authoritative shared mutable state in
//! the subsystem. `mark_used` is a single atomic insert-if-absent under one
//! write-lock acquisition; at most one of any set of racing attempts for the
//! same nullifier wins. The set is append-only: never deleted, never reset.

use crate::digest::{hash_parts, Digest};
use crate::proof::unix_now;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Registry errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The nullifier was already present. The registry state is unchanged;
    /// callers must treat this as a hard rejection of the vote attempt.
    #[error("nullifier {0} has already been consumed")]
    AlreadyUsed(String),
}

/// A deterministic per-(voter, target) replay detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nullifier(Digest);

impl Nullifier {
    /// Returns the underlying digest.
    pub fn as_digest(&self) -> &Digest {
        &self.0
    }

    /// Hex rendering for persistence keys.
    pub fn hex(&self) -> String {
        self.0.hex()
    }
}

/// Derives the nullifier for a (voter, target) pair:
/// `H("nullifier" || voter_id || target_id)`. Pure and deterministic.
///
/// The derivation concatenates the ids without a separator, so it assumes
/// ids are opaque platform identifiers of a fixed shape (the boundary
/// between voter and target must be unambiguous). Ids whose concatenations
/// coincide, such as `("ab", "c")` and `("a", "bc")`, would derive the same
/// nullifier and falsely reject the second pair.
pub fn derive_nullifier(voter_id: &str, target_id: &str) -> Nullifier {
    Nullifier(hash_parts(&[
        b"nullifier",
        voter_id.as_bytes(),
        target_id.as_bytes(),
    ]))
}

/// Append-only set of consumed nullifiers.
///
/// Values are consumption timestamps (unix seconds). Clones share the same
/// underlying set, so one registry can be handed to concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct NullifierRegistry {
    used: Arc<RwLock<HashMap<Nullifier, u64>>>,
}

impl NullifierRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advisory read: true iff the nullifier has never been marked used.
    ///
    /// This is the fast-path check before proof issuance. It is not a
    /// reservation: the authoritative gate is `mark_used`.
    pub fn is_unused(&self, nullifier: &Nullifier) -> bool {
        !self.used.read().unwrap().contains_key(nullifier)
    }

    /// Atomic insert-if-absent. The check and the mark happen under a single
    /// write-lock acquisition, so of any set of concurrent calls for the same
    /// nullifier exactly one returns `Ok`.
    pub fn mark_used(&self, nullifier: Nullifier) -> Result<(), RegistryError> {
        let now = unix_now();
        let mut used = self.used.write().unwrap();
        match used.entry(nullifier) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyUsed(nullifier.hex())),
            Entry::Vacant(slot) => {
                slot.insert(now);
                tracing::debug!(nullifier = %nullifier.hex(), "nullifier consumed");
                Ok(())
            }
        }
    }

    /// Consumption timestamp for a used nullifier, if any.
    pub fn consumed_at(&self, nullifier: &Nullifier) -> Option<u64> {
        self.used.read().unwrap().get(nullifier).copied()
    }

    /// Number of consumed nullifiers.
    #[allow(dead_code)]
    pub(crate) fn len(&self) -> usize {
        self.used.read().unwrap().len()
    }

    /// True iff no nullifier has been consumed yet.
    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.used.read().unwrap().is_empty()
    }
}
