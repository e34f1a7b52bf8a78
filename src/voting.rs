//! Cast-vote orchestration
//!
//! `AnonymousVoting` owns the nullifier registry and the advisory vote
//! ledger, and packages the ordered cast-vote protocol:
//!
//! 1. derive the nullifier and reject `AlreadyVoted` if it is consumed
//!    (advisory fast path, avoids wasted proof work)
//! 2. issue and verify a reputation proof (`ReputationTooLow` on failure)
//! 3. issue and verify a vote proof (`InvalidProof` on failure)
//! 4. atomically mark the nullifier used: the authoritative anti-replay
//!    gate; a losing racer gets `AlreadyVoted` here even if step 1 passed
//! 5. hand back the receipt for the caller to persist
//!
//! Persisting the vote record itself belongs to the external store, not this
//! subsystem.

use crate::backend::{DigestBackend, ProofBackend};
use crate::codec::{self, CodecError};
use crate::digest::Digest;
use crate::nullifier::{derive_nullifier, Nullifier, NullifierRegistry, RegistryError};
use crate::proof::{Proof, VerifyError};
use crate::reputation::{
    issue_reputation_proof, verify_reputation_proof, IssueError, ReputationProof,
    VerifiedReputation,
};
use crate::vote::{
    issue_vote_proof, verify_vote_proof, VerifiedVote, VoteIssueError, VoteLedger, VoteProof,
    VoteValue,
};
use thiserror::Error;

/// Rejections of a single cast-vote attempt. `AlreadyVoted` is a normal
/// settled outcome, not an exceptional failure; none of these are retryable.
#[derive(Debug, Error)]
pub enum CastError {
    #[error("this voter has already cast a vote for this submission")]
    AlreadyVoted,

    #[error("reputation requirement not satisfied: {0}")]
    ReputationTooLow(String),

    #[error("vote proof rejected: {0}")]
    InvalidProof(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// What an accepted vote hands back for external persistence.
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    /// The consumed nullifier: the persistence key of the used-set.
    pub nullifier: Nullifier,

    /// One-way hash of the voter, the vote-record index key together with
    /// the submission id.
    pub hashed_voter_id: Digest,

    /// The submission the vote targets.
    pub submission_id: String,

    /// Serialized proof body, opaque to the caller.
    pub serialized_proof: String,
}

/// The voting-privacy subsystem behind one handle.
///
/// Generic over the proof engine; the hash-based `DigestBackend` is the
/// default. Clones share the registry and ledger, so one instance can serve
/// concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct AnonymousVoting<B: ProofBackend = DigestBackend> {
    backend: B,
    registry: NullifierRegistry,
    ledger: VoteLedger,
}

impl AnonymousVoting<DigestBackend> {
    /// A subsystem using the hash-based stand-in engine.
    pub fn new() -> Self {
        Self::with_backend(DigestBackend)
    }
}

impl<B: ProofBackend> AnonymousVoting<B> {
    /// A subsystem over a caller-supplied proof engine.
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            registry: NullifierRegistry::new(),
            ledger: VoteLedger::new(),
        }
    }

    /// The authoritative used-nullifier registry.
    pub fn registry(&self) -> &NullifierRegistry {
        &self.registry
    }

    /// The advisory vote ledger.
    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Issues a reputation threshold proof for `user_id`.
    pub fn generate_reputation_proof(
        &self,
        user_id: &str,
        reputation: u64,
        min_reputation: u64,
    ) -> Result<ReputationProof, IssueError> {
        issue_reputation_proof(&self.backend, user_id, reputation, min_reputation)
    }

    /// Verifies a reputation proof against the expected threshold.
    pub fn verify_reputation_proof(
        &self,
        proof: &ReputationProof,
        min_reputation: u64,
    ) -> Result<VerifiedReputation, VerifyError> {
        verify_reputation_proof(proof, min_reputation)
    }

    /// Derives the deterministic nullifier for a (voter, target) pair.
    pub fn generate_nullifier(&self, voter_id: &str, target_id: &str) -> Nullifier {
        derive_nullifier(voter_id, target_id)
    }

    /// Advisory check: has this nullifier never been consumed?
    pub fn is_unused(&self, nullifier: &Nullifier) -> bool {
        self.registry.is_unused(nullifier)
    }

    /// Atomically consumes a nullifier; `AlreadyUsed` is a hard rejection.
    pub fn mark_used(&self, nullifier: Nullifier) -> Result<(), RegistryError> {
        self.registry.mark_used(nullifier)
    }

    /// Issues an anonymous vote proof, recording the attempt in the ledger.
    pub fn generate_anonymous_vote_proof(
        &self,
        voter_id: &str,
        submission_id: &str,
        vote_value: VoteValue,
    ) -> Result<VoteProof, VoteIssueError> {
        issue_vote_proof(&self.backend, &self.ledger, voter_id, submission_id, vote_value)
    }

    /// Verifies an anonymous vote proof.
    pub fn verify_anonymous_vote_proof(
        &self,
        proof: &VoteProof,
    ) -> Result<VerifiedVote, VerifyError> {
        verify_vote_proof(proof)
    }

    /// Advisory UX query against the vote ledger.
    pub fn has_user_voted(&self, voter_id: &str, submission_id: &str) -> bool {
        self.ledger.has_voted(voter_id, submission_id)
    }

    /// Serializes a proof body to its opaque wire string.
    pub fn serialize_proof(&self, proof: &Proof) -> Result<String, CodecError> {
        codec::serialize_proof(proof)
    }

    /// Parses a wire string back into a proof body.
    pub fn deserialize_proof(&self, wire: &str) -> Result<Proof, CodecError> {
        codec::deserialize_proof(wire)
    }

    /// Runs the full cast-vote protocol for one attempt.
    ///
    /// `reputation` is the caller-attested actual value; `min_reputation` the
    /// submission's voting threshold. On success the nullifier is consumed
    /// and the receipt is ready for external persistence. Under concurrent
    /// attempts for the same (voter, submission) pair at most one call
    /// returns `Ok`.
    pub fn cast_vote(
        &self,
        voter_id: &str,
        submission_id: &str,
        reputation: u64,
        min_reputation: u64,
        vote_value: VoteValue,
    ) -> Result<VoteReceipt, CastError> {
        // Fast path: skip the proof work when the vote is already settled.
        let nullifier = derive_nullifier(voter_id, submission_id);
        if !self.registry.is_unused(&nullifier) {
            return Err(CastError::AlreadyVoted);
        }

        let reputation_proof =
            issue_reputation_proof(&self.backend, voter_id, reputation, min_reputation)
                .map_err(|e| CastError::ReputationTooLow(e.to_string()))?;
        verify_reputation_proof(&reputation_proof, min_reputation)
            .map_err(|e| CastError::ReputationTooLow(e.to_string()))?;

        let vote_proof =
            issue_vote_proof(&self.backend, &self.ledger, voter_id, submission_id, vote_value)
                .map_err(|e| CastError::InvalidProof(e.to_string()))?;
        let verified = verify_vote_proof(&vote_proof)
            .map_err(|e| CastError::InvalidProof(e.to_string()))?;

        // Authoritative gate: of concurrent attempts racing past the fast
        // path, only the first insert wins.
        self.registry
            .mark_used(nullifier)
            .map_err(|_| CastError::AlreadyVoted)?;

        let serialized_proof = codec::serialize_proof(&vote_proof.proof)?;

        tracing::debug!(
            submission = submission_id,
            hashed_voter = %verified.hashed_voter_id.hex(),
            "vote accepted"
        );

        Ok(VoteReceipt {
            nullifier,
            hashed_voter_id: verified.hashed_voter_id,
            submission_id: verified.submission_id,
            serialized_proof,
        })
    }
}
