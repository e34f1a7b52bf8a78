//! Anonymous vote proofs and the advisory vote ledger
//!
//! A vote proof claims "some voter, identified only by a one-way hash, cast a
//! vote for this submission". Issuance binds a fresh commitment for the
//! (voter, submission) pair into the transcript alongside the hashed voter,
//! the vote value, the salt, and the timestamp; the public signals expose
//! only `[commitment, submission_id, vote_value]`.
//!
//! Issuance also records the attempt in the `VoteLedger`, keyed by
//! `(submission_id, hashed_voter_id)`. The ledger answers `has_voted` queries
//! for the UI without touching the nullifier registry; the registry remains
//! authoritative for acceptance.

use crate::backend::ProofBackend;
use crate::commitment::{generate_commitment, Commitment, CommitmentError, Salt};
use crate::digest::{hash_identity, Digest};
use crate::proof::{unix_now, Proof, VerifyError, VOTE_PROOF_TTL_SECS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Vote proof issuance failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VoteIssueError {
    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    #[error("failed to encode proof transcript: {0}")]
    Transcript(String),
}

/// The value of a vote on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Up => "up",
            VoteValue::Down => "down",
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An anonymous vote proof. Created once per attempt, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteProof {
    /// Common proof body;
    /// `public_signals = [commitment, submission_id, vote_value]`.
    pub proof: Proof,

    /// The submission the vote targets.
    pub submission_id: String,

    /// One-way hash of the voter's id.
    pub hashed_voter_id: Digest,
}

/// What a successful verification exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedVote {
    pub submission_id: String,
    pub hashed_voter_id: Digest,
}

/// The full proof data recorded at issuance.
#[derive(Debug, Clone)]
pub struct VoteRecord {
    pub commitment: Commitment,
    pub hashed_voter_id: Digest,
    pub submission_id: String,
    pub vote_value: VoteValue,
    pub salt: Salt,
    pub issued_at: u64,
}

/// Advisory replay-detection store keyed by `(submission_id,
/// hashed_voter_id)`.
///
/// Belt-and-suspenders next to the nullifier registry: this store powers
/// `has_voted` for the caller's UI, while acceptance is gated solely by the
/// registry. Clones share the same underlying records.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    records: Arc<RwLock<HashMap<(String, Digest), VoteRecord>>>,
}

impl VoteLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a vote attempt was recorded for this (voter, submission)
    /// pair.
    pub fn has_voted(&self, voter_id: &str, submission_id: &str) -> bool {
        let key = (submission_id.to_string(), hash_identity(voter_id));
        self.records.read().unwrap().contains_key(&key)
    }

    /// The recorded attempt for a (voter, submission) pair, if any.
    pub fn record_for(&self, voter_id: &str, submission_id: &str) -> Option<VoteRecord> {
        let key = (submission_id.to_string(), hash_identity(voter_id));
        self.records.read().unwrap().get(&key).cloned()
    }

    fn record(&self, record: VoteRecord) {
        let key = (record.submission_id.clone(), record.hashed_voter_id);
        self.records.write().unwrap().insert(key, record);
    }
}

#[derive(Serialize)]
struct VoteTranscript<'a> {
    commitment: String,
    hashed_voter_id: String,
    submission_id: &'a str,
    vote_value: VoteValue,
    salt: String,
    issued_at: u64,
}

/// Issues an anonymous vote proof and records the attempt in the ledger.
pub fn issue_vote_proof<B: ProofBackend>(
    backend: &B,
    ledger: &VoteLedger,
    voter_id: &str,
    submission_id: &str,
    vote_value: VoteValue,
) -> Result<VoteProof, VoteIssueError> {
    let (commitment, salt) = generate_commitment(voter_id, submission_id, None)?;
    let hashed_voter_id = hash_identity(voter_id);
    let issued_at = unix_now();

    let transcript = serde_json::to_vec(&VoteTranscript {
        commitment: commitment.hex(),
        hashed_voter_id: hashed_voter_id.hex(),
        submission_id,
        vote_value,
        salt: salt.hex(),
        issued_at,
    })
    .map_err(|e| VoteIssueError::Transcript(e.to_string()))?;
    let digest = backend.attest(&transcript);

    ledger.record(VoteRecord {
        commitment,
        hashed_voter_id,
        submission_id: submission_id.to_string(),
        vote_value,
        salt,
        issued_at,
    });

    tracing::debug!(
        submission = submission_id,
        hashed_voter = %hashed_voter_id.hex(),
        "issued vote proof"
    );

    Ok(VoteProof {
        proof: Proof {
            digest,
            public_signals: vec![
                commitment.hex(),
                submission_id.to_string(),
                vote_value.to_string(),
            ],
            issued_at,
        },
        submission_id: submission_id.to_string(),
        hashed_voter_id,
    })
}

/// Verifies a vote proof against the currently observed time.
pub fn verify_vote_proof(proof: &VoteProof) -> Result<VerifiedVote, VerifyError> {
    verify_vote_proof_at(proof, unix_now())
}

/// Verification at an explicit observation time. Pure in (proof, now): the
/// 24-hour freshness window first, then the exactly-three-signals shape.
pub fn verify_vote_proof_at(proof: &VoteProof, now: u64) -> Result<VerifiedVote, VerifyError> {
    proof.proof.check_freshness(VOTE_PROOF_TTL_SECS, now)?;

    let signals = proof.proof.public_signals.len();
    if signals != 3 {
        return Err(VerifyError::Malformed(format!(
            "expected 3 public signals, found {signals}"
        )));
    }

    Ok(VerifiedVote {
        submission_id: proof.submission_id.clone(),
        hashed_voter_id: proof.hashed_voter_id,
    })
}
