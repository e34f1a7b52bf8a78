//! Hiding, binding commitments over (voter, target) pairs
//!
//! A commitment binds a voter to a target without revealing the voter:
//! `commitment = H(voter_id || ":" || target_id || ":" || salt)`. The salt is
//! drawn fresh per commitment from the system CSPRNG and must never be reused
//! across distinct commitments for the same pair, or the two become linkable.
//!
//! Salts are ephemeral: they live only inside the issuing call and the proof
//! transcript, are redacted from `Debug` output, and are zeroized on drop.

use crate::digest::{hash_parts, Digest};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Salt length in bytes (128 bits of entropy).
pub const SALT_LEN: usize = 16;

/// Commitment generation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("failed to draw salt entropy from the system RNG")]
    Entropy,
}

/// A fresh random salt opening a single commitment.
///
/// Never logged, never persisted standalone; zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Draws a fresh salt from the system CSPRNG.
    pub fn generate() -> Result<Self, CommitmentError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; SALT_LEN];
        rng.fill(&mut bytes).map_err(|_| CommitmentError::Entropy)?;
        Ok(Self(bytes))
    }

    /// Creates a salt from explicit bytes (deterministic path for
    /// re-verification and tests).
    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// Hex rendering for proof transcripts.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redacted: salts must never appear in logs or debug dumps.
        write!(f, "Salt(..)")
    }
}

/// An opaque commitment digest binding a (voter, target) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(Digest);

impl Commitment {
    /// Returns the underlying digest.
    pub fn as_digest(&self) -> &Digest {
        &self.0
    }

    /// Hex rendering, as carried in a vote proof's public signals.
    pub fn hex(&self) -> String {
        self.0.hex()
    }
}

/// Deterministic core: `H(voter_id || ":" || target_id || ":" || salt)`.
fn commit(voter_id: &str, target_id: &str, salt: &Salt) -> Commitment {
    Commitment(hash_parts(&[
        voter_id.as_bytes(),
        b":",
        target_id.as_bytes(),
        b":",
        salt.as_bytes(),
    ]))
}

/// Generates a commitment for a (voter, target) pair.
///
/// When `salt` is `None` a fresh 128-bit salt is drawn; passing an explicit
/// salt makes the call deterministic. Returns the commitment together with
/// the salt that opens it. Pure over its inputs, no side effects.
pub fn generate_commitment(
    voter_id: &str,
    target_id: &str,
    salt: Option<Salt>,
) -> Result<(Commitment, Salt), CommitmentError> {
    let salt = match salt {
        Some(salt) => salt,
        None => Salt::generate()?,
    };
    let commitment = commit(voter_id, target_id, &salt);
    Ok((commitment, salt))
}

/// Recomputes the commitment and compares: true iff `commitment` opens to
/// `(voter_id, target_id)` under `salt`.
pub fn verify_commitment(
    commitment: &Commitment,
    voter_id: &str,
    target_id: &str,
    salt: &Salt,
) -> bool {
    commit(voter_id, target_id, salt) == *commitment
}
