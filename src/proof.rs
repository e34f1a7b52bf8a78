//! Shared proof body and freshness policy
//!
//! Both proof kinds carry the same body: an opaque digest produced by the
//! proof backend, an ordered list of public signals, and the issuance
//! timestamp. The timestamp is set once at issuance and never mutated;
//! verification is a pure function of the proof plus the observed time.
//!
//! Freshness windows are data-driven, not scheduler-driven: a proof aged
//! exactly the window is still valid, one second past it is expired.

use crate::digest::Digest;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Freshness window for reputation proofs (1 hour).
pub const REPUTATION_PROOF_TTL_SECS: u64 = 3600;

/// Freshness window for vote proofs (24 hours).
pub const VOTE_PROOF_TTL_SECS: u64 = 86_400;

/// Proof-verification rejections. None of these are retryable: every
/// rejection reflects a protocol violation or an already-settled fact.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("proof expired: age {age_secs}s exceeds the {window_secs}s freshness window")]
    Expired { age_secs: u64, window_secs: u64 },

    #[error("proof is malformed: {0}")]
    Malformed(String),

    #[error("threshold mismatch: proof was issued for minimum {found}, expected {expected}")]
    ThresholdMismatch { expected: u64, found: u64 },
}

/// The common proof body shared by vote and reputation proofs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Opaque digest produced by the proof backend over the issuance
    /// transcript.
    pub digest: Digest,

    /// Ordered public signals. Order is part of the contract.
    pub public_signals: Vec<String>,

    /// Issuance instant, unix seconds. Set once, never mutated.
    pub issued_at: u64,
}

impl Proof {
    /// Age of the proof at `now`, saturating at zero for clock skew.
    pub fn age_at(&self, now: u64) -> u64 {
        now.saturating_sub(self.issued_at)
    }

    /// Rejects with `Expired` iff the proof is strictly older than
    /// `window_secs` at `now`.
    pub fn check_freshness(&self, window_secs: u64, now: u64) -> Result<(), VerifyError> {
        let age_secs = self.age_at(now);
        if age_secs > window_secs {
            return Err(VerifyError::Expired {
                age_secs,
                window_secs,
            });
        }
        Ok(())
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
