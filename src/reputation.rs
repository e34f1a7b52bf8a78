//! Reputation threshold proofs
//!
//! Proves "the holder's reputation is at least `min_reputation`" without
//! exposing the real value. The issuer checks the inequality before anything
//! is produced: no proof for a false claim ever exists. The transcript handed
//! to the backend carries only the minimum, the hashed user id, the issuance
//! timestamp, and the satisfied flag; the actual reputation appears nowhere
//! in the proof, its signals, or its transcript.
//!
//! Proofs are per-check and short-lived (1 hour window); they are not meant
//! to be persisted beyond the verification they were issued for.

use crate::backend::ProofBackend;
use crate::digest::{hash_identity, Digest};
use crate::proof::{unix_now, Proof, VerifyError, REPUTATION_PROOF_TTL_SECS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Issuance failures. `InsufficientReputation` is fatal for the attempt and
/// never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueError {
    #[error("reputation {actual} does not meet the required minimum {required}")]
    InsufficientReputation { actual: u64, required: u64 },

    #[error("failed to encode proof transcript: {0}")]
    Transcript(String),
}

/// A claim that the holder's reputation meets `min_reputation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationProof {
    /// Common proof body; `public_signals = [min_reputation, hashed_user_id]`.
    pub proof: Proof,

    /// The threshold this proof was issued for.
    pub min_reputation: u64,

    /// One-way hash of the holder's user id.
    pub hashed_user_id: Digest,
}

/// What a successful verification exposes: the hashed id and the threshold,
/// never the real reputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedReputation {
    pub hashed_user_id: Digest,
    pub min_reputation: u64,
}

#[derive(Serialize)]
struct ReputationTranscript<'a> {
    min_reputation: u64,
    hashed_user_id: &'a Digest,
    issued_at: u64,
    meets_requirement: bool,
}

/// Issues a reputation threshold proof.
///
/// Precondition: `actual_reputation >= min_reputation`. On violation the call
/// fails with `InsufficientReputation` and nothing is issued.
pub fn issue_reputation_proof<B: ProofBackend>(
    backend: &B,
    user_id: &str,
    actual_reputation: u64,
    min_reputation: u64,
) -> Result<ReputationProof, IssueError> {
    issue_reputation_proof_at(backend, user_id, actual_reputation, min_reputation, unix_now())
}

/// Issuance with an explicit timestamp; `issue_reputation_proof` passes the
/// current time.
pub fn issue_reputation_proof_at<B: ProofBackend>(
    backend: &B,
    user_id: &str,
    actual_reputation: u64,
    min_reputation: u64,
    issued_at: u64,
) -> Result<ReputationProof, IssueError> {
    if actual_reputation < min_reputation {
        return Err(IssueError::InsufficientReputation {
            actual: actual_reputation,
            required: min_reputation,
        });
    }

    let hashed_user_id = hash_identity(user_id);
    let transcript = serde_json::to_vec(&ReputationTranscript {
        min_reputation,
        hashed_user_id: &hashed_user_id,
        issued_at,
        meets_requirement: true,
    })
    .map_err(|e| IssueError::Transcript(e.to_string()))?;
    let digest = backend.attest(&transcript);

    tracing::debug!(
        hashed_user = %hashed_user_id.hex(),
        min_reputation,
        "issued reputation proof"
    );

    Ok(ReputationProof {
        proof: Proof {
            digest,
            public_signals: vec![min_reputation.to_string(), hashed_user_id.hex()],
            issued_at,
        },
        min_reputation,
        hashed_user_id,
    })
}

/// Verifies a reputation proof against the currently observed time.
pub fn verify_reputation_proof(
    proof: &ReputationProof,
    expected_min_reputation: u64,
) -> Result<VerifiedReputation, VerifyError> {
    verify_reputation_proof_at(proof, expected_min_reputation, unix_now())
}

/// Verification at an explicit observation time. Pure in (proof, now):
/// threshold equality first, then the 1-hour freshness window.
pub fn verify_reputation_proof_at(
    proof: &ReputationProof,
    expected_min_reputation: u64,
    now: u64,
) -> Result<VerifiedReputation, VerifyError> {
    if proof.min_reputation != expected_min_reputation {
        return Err(VerifyError::ThresholdMismatch {
            expected: expected_min_reputation,
            found: proof.min_reputation,
        });
    }

    proof.proof.check_freshness(REPUTATION_PROOF_TTL_SECS, now)?;

    Ok(VerifiedReputation {
        hashed_user_id: proof.hashed_user_id,
        min_reputation: proof.min_reputation,
    })
}
