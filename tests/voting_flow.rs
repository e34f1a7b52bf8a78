// Integration tests for the anonymous voting protocol
//
// These tests verify:
// - The full cast-vote sequence: reputation gate, vote proof, nullifier mark
// - Double votes are rejected regardless of value or timing
// - Concurrent attempts for one (voter, submission) pair have one winner
// - Freshness windows at their exact boundaries
// - Serialized receipts round-trip to verification-equivalent proofs

use std::sync::Arc;
use std::thread;

use veilvote::reputation::{issue_reputation_proof_at, verify_reputation_proof_at};
use veilvote::vote::verify_vote_proof_at;
use tracing_subscriber::EnvFilter;
use veilvote::{
    AnonymousVoting, CastError, DigestBackend, VerifyError, VoteProof, VoteValue,
    REPUTATION_PROOF_TTL_SECS, VOTE_PROOF_TTL_SECS,
};

/// Capture the subsystem's tracing events in test output (RUST_LOG-driven).
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_single_vote_accepted_and_settled() {
    init_tracing();

    // Voter with reputation 15 votes on a submission requiring threshold 10.
    let voting = AnonymousVoting::new();

    let receipt = voting
        .cast_vote("voter-1", "submission-1", 15, 10, VoteValue::Up)
        .expect("eligible first vote should be accepted");

    // The nullifier is consumed and the advisory ledger knows the attempt.
    assert!(!voting.is_unused(&receipt.nullifier));
    assert!(voting.has_user_voted("voter-1", "submission-1"));
    assert!(voting
        .registry()
        .consumed_at(&receipt.nullifier)
        .is_some());
}

#[test]
fn test_double_vote_rejected_regardless_of_value_or_timing() {
    let voting = AnonymousVoting::new();

    voting
        .cast_vote("voter-1", "submission-1", 15, 10, VoteValue::Up)
        .unwrap();

    // Same pair, opposite value: the recomputed nullifier matches and the
    // attempt is rejected as already voted.
    let retry = voting.cast_vote("voter-1", "submission-1", 15, 10, VoteValue::Down);
    assert!(matches!(retry, Err(CastError::AlreadyVoted)));

    // Other voters and other submissions are unaffected.
    assert!(voting
        .cast_vote("voter-2", "submission-1", 15, 10, VoteValue::Up)
        .is_ok());
    assert!(voting
        .cast_vote("voter-1", "submission-2", 15, 10, VoteValue::Up)
        .is_ok());
}

#[test]
fn test_reputation_below_threshold_rejects_without_consuming() {
    let voting = AnonymousVoting::new();

    let result = voting.cast_vote("voter-1", "submission-1", 9, 10, VoteValue::Up);
    assert!(matches!(result, Err(CastError::ReputationTooLow(_))));

    let nullifier = voting.generate_nullifier("voter-1", "submission-1");
    assert!(voting.is_unused(&nullifier));
}

#[test]
fn test_concurrent_votes_have_exactly_one_winner() {
    init_tracing();

    let voting = Arc::new(AnonymousVoting::new());

    let handles: Vec<_> = (0..12)
        .map(|_| {
            let voting = Arc::clone(&voting);
            thread::spawn(move || {
                voting
                    .cast_vote("voter-1", "submission-1", 15, 10, VoteValue::Up)
                    .is_ok()
            })
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(accepted, 1, "at most one concurrent attempt may be accepted");
    // The winning attempt consumed the pair's one nullifier.
    let nullifier = voting.generate_nullifier("voter-1", "submission-1");
    assert!(!voting.is_unused(&nullifier));
    assert!(voting.registry().consumed_at(&nullifier).is_some());
}

#[test]
fn test_nullifier_determinism_across_instances() {
    // The derivation is pure: two subsystem instances agree on the nullifier
    // for a pair, while different pairs stay uncorrelated.
    let a = AnonymousVoting::new();
    let b = AnonymousVoting::new();

    assert_eq!(
        a.generate_nullifier("voter-1", "submission-1"),
        b.generate_nullifier("voter-1", "submission-1")
    );
    assert_ne!(
        a.generate_nullifier("voter-1", "submission-1"),
        a.generate_nullifier("voter-1", "submission-2")
    );
}

#[test]
fn test_reputation_proof_freshness_boundary() {
    let backend = DigestBackend;
    let issued_at = 1_700_000_000;
    let proof = issue_reputation_proof_at(&backend, "voter-1", 50, 10, issued_at).unwrap();

    // 59m59s old: valid.
    assert!(
        verify_reputation_proof_at(&proof, 10, issued_at + REPUTATION_PROOF_TTL_SECS - 1).is_ok()
    );
    // 1h01s old: expired.
    let expired =
        verify_reputation_proof_at(&proof, 10, issued_at + REPUTATION_PROOF_TTL_SECS + 1);
    assert!(matches!(expired, Err(VerifyError::Expired { .. })));
}

#[test]
fn test_vote_proof_freshness_boundary() {
    let voting = AnonymousVoting::new();
    let proof = voting
        .generate_anonymous_vote_proof("voter-1", "submission-1", VoteValue::Up)
        .unwrap();
    let issued_at = proof.proof.issued_at;

    // 23h59m59s old: valid.
    assert!(verify_vote_proof_at(&proof, issued_at + VOTE_PROOF_TTL_SECS - 1).is_ok());
    // 24h01s old: expired.
    let expired = verify_vote_proof_at(&proof, issued_at + VOTE_PROOF_TTL_SECS + 1);
    assert!(matches!(expired, Err(VerifyError::Expired { .. })));
}

#[test]
fn test_threshold_non_disclosure() {
    // Two proofs for the same user with actual reputation 50 at thresholds
    // 10 and 40: both valid, neither carries the actual value anywhere.
    let voting = AnonymousVoting::new();

    let low = voting
        .generate_reputation_proof("voter-1", 50, 10)
        .unwrap();
    let high = voting
        .generate_reputation_proof("voter-1", 50, 40)
        .unwrap();

    assert!(voting.verify_reputation_proof(&low, 10).is_ok());
    assert!(voting.verify_reputation_proof(&high, 40).is_ok());

    for proof in [&low, &high] {
        assert!(!proof.proof.public_signals.contains(&"50".to_string()));
        assert_eq!(proof.proof.public_signals.len(), 2);
    }
    // The proofs differ only in their stated threshold signal.
    assert_eq!(low.proof.public_signals[1], high.proof.public_signals[1]);
    assert_ne!(low.proof.public_signals[0], high.proof.public_signals[0]);
}

#[test]
fn test_serialized_receipt_is_verification_equivalent() {
    let voting = AnonymousVoting::new();

    let original = voting
        .generate_anonymous_vote_proof("voter-1", "submission-1", VoteValue::Up)
        .unwrap();
    let wire = voting.serialize_proof(&original.proof).unwrap();

    // The caller reconstructs the typed proof from the wire body plus the
    // context it already holds.
    let reconstructed = VoteProof {
        proof: voting.deserialize_proof(&wire).unwrap(),
        submission_id: original.submission_id.clone(),
        hashed_voter_id: original.hashed_voter_id,
    };

    let a = voting.verify_anonymous_vote_proof(&original).unwrap();
    let b = voting.verify_anonymous_vote_proof(&reconstructed).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_wrong_threshold_is_rejected() {
    let voting = AnonymousVoting::new();
    let proof = voting
        .generate_reputation_proof("voter-1", 50, 10)
        .unwrap();

    let result = voting.verify_reputation_proof(&proof, 40);
    assert_eq!(
        result,
        Err(VerifyError::ThresholdMismatch {
            expected: 40,
            found: 10,
        })
    );
}
