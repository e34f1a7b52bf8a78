//! Property-based tests for the voting-privacy protocol
//!
//! Tests for:
//! - Determinism: nullifiers and salted commitments are pure functions
//! - Unlinkability: distinct pairs derive uncorrelated values
//! - Binding: a commitment opens only under its original inputs
//! - Round-trip: the codec wire form is lossless for any proof body

use crate::codec::{deserialize_proof, serialize_proof};
use crate::commitment::{generate_commitment, verify_commitment, Salt, SALT_LEN};
use crate::digest::hash_identity;
use crate::nullifier::derive_nullifier;
use crate::proof::Proof;
use proptest::prelude::*;

fn salt_strategy() -> impl Strategy<Value = Salt> {
    proptest::array::uniform16(any::<u8>()).prop_map(|bytes: [u8; SALT_LEN]| Salt::from_bytes(bytes))
}

proptest! {
    /// Same (voter, target) pair always derives the same nullifier.
    #[test]
    fn prop_nullifier_determinism(voter in "[a-z0-9]{1,32}", target in "[a-z0-9]{1,32}") {
        let n1 = derive_nullifier(&voter, &target);
        let n2 = derive_nullifier(&voter, &target);
        prop_assert_eq!(n1, n2);
    }

    /// The same voter on different targets derives uncorrelated nullifiers.
    #[test]
    fn prop_nullifier_unlinkable_across_targets(
        voter in "[a-z0-9]{1,32}",
        target1 in "[a-z0-9]{1,32}",
        target2 in "[a-z0-9]{1,32}",
    ) {
        prop_assume!(target1 != target2);
        prop_assert_ne!(
            derive_nullifier(&voter, &target1),
            derive_nullifier(&voter, &target2)
        );
    }

    /// Distinct identities never collide under the one-way hash.
    #[test]
    fn prop_identity_hash_collision_resistance(
        id1 in "[a-z0-9._@+-]{1,48}",
        id2 in "[a-z0-9._@+-]{1,48}",
    ) {
        prop_assume!(id1 != id2);
        prop_assert_ne!(hash_identity(&id1), hash_identity(&id2));
    }

    /// A salted commitment is deterministic and opens under its inputs.
    #[test]
    fn prop_commitment_determinism_and_opening(
        voter in "[a-z0-9]{1,32}",
        target in "[a-z0-9]{1,32}",
        salt in salt_strategy(),
    ) {
        let (c1, _) = generate_commitment(&voter, &target, Some(salt.clone())).unwrap();
        let (c2, _) = generate_commitment(&voter, &target, Some(salt.clone())).unwrap();
        prop_assert_eq!(c1, c2);
        prop_assert!(verify_commitment(&c1, &voter, &target, &salt));
    }

    /// A commitment does not open under a different voter.
    #[test]
    fn prop_commitment_binding(
        voter1 in "[a-z0-9]{1,32}",
        voter2 in "[a-z0-9]{1,32}",
        target in "[a-z0-9]{1,32}",
        salt in salt_strategy(),
    ) {
        prop_assume!(voter1 != voter2);
        let (commitment, _) = generate_commitment(&voter1, &target, Some(salt.clone())).unwrap();
        prop_assert!(!verify_commitment(&commitment, &voter2, &target, &salt));
    }

    /// The codec round-trips any proof body losslessly.
    #[test]
    fn prop_codec_round_trip(
        seed in "[a-z0-9]{1,32}",
        signals in proptest::collection::vec("[ -~]{0,64}", 0..6),
        issued_at in 0u64..=u32::MAX as u64,
    ) {
        let proof = Proof {
            digest: hash_identity(&seed),
            public_signals: signals,
            issued_at,
        };
        let wire = serialize_proof(&proof).unwrap();
        let decoded = deserialize_proof(&wire).unwrap();
        prop_assert_eq!(proof, decoded);
    }
}
