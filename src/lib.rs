//! Veilvote - Anonymous Voting Subsystem
//!
//! The voting-privacy layer of a challenge platform: participants vote on
//! submissions anonymously, each eligible voter votes at most once per
//! submission, and eligibility ("reputation meets the threshold") is proven
//! without revealing the actual reputation.
//!
//! Key principles:
//! - Voter identities cross the boundary only as one-way hashes
//! - Replay prevention via deterministic nullifiers in an append-only set
//! - At-most-one vote per (voter, submission), linearizable under races
//! - Proof freshness windows checked against issuance timestamps
//!
//! Persistence of accepted votes and the challenge/submission data model live
//! outside this crate; callers persist the receipts this subsystem hands
//! back.

pub mod backend;
pub mod codec;
pub mod commitment;
pub mod digest;
pub mod nullifier;
pub mod proof;
pub mod reputation;
pub mod vote;
pub mod voting;

#[cfg(test)]
mod proptests;

pub use backend::{DigestBackend, ProofBackend};
pub use codec::{deserialize_proof, serialize_proof, CodecError};
pub use commitment::{generate_commitment, verify_commitment, Commitment, CommitmentError, Salt};
pub use digest::{hash_identity, Digest};
pub use nullifier::{derive_nullifier, Nullifier, NullifierRegistry, RegistryError};
pub use proof::{Proof, VerifyError, REPUTATION_PROOF_TTL_SECS, VOTE_PROOF_TTL_SECS};
pub use reputation::{
    issue_reputation_proof, verify_reputation_proof, IssueError, ReputationProof,
    VerifiedReputation,
};
pub use vote::{
    issue_vote_proof, verify_vote_proof, VerifiedVote, VoteIssueError, VoteLedger, VoteProof,
    VoteValue,
};
pub use voting::{AnonymousVoting, CastError, VoteReceipt};
