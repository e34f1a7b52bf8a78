//! Collision-resistant digest primitive
//!
//! Every derivation in this crate (identity hashing, commitments, nullifiers,
//! proof attestation) is defined in terms of the single `H(bytes)` function
//! exposed here. Swapping the underlying hash touches only this module.
//!
//! # Security Properties
//!
//! - **Determinism**: Same input always produces the same digest
//! - **Collision Resistance**: Different inputs produce different digests
//! - **One-way**: A digest cannot be reversed to recover its preimage

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

/// A 32-byte opaque digest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Creates a Digest from a 32-byte array.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of the digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex rendering, as carried in public signals.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// `H(bytes)`: SHA-256 over the concatenation of `parts`.
pub fn hash_parts(parts: &[&[u8]]) -> Digest {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    Digest(hasher.finalize().into())
}

/// One-way identity masking: `H(id)`.
///
/// The hashed form is the only representation of a voter or user that ever
/// crosses the API boundary. Recovering the cleartext id requires a preimage
/// attack on the digest.
pub fn hash_identity(id: &str) -> Digest {
    hash_parts(&[id.as_bytes()])
}
