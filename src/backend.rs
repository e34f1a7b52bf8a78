//! Proof engine seam
//!
//! Issuers hand the backend a serialized transcript and get back the opaque
//! proof digest. The shipped `DigestBackend` is a hash-based stand-in: it
//! attests whatever transcript the issuer already trusts, with no
//! cryptographic enforcement of the claim itself. A real succinct-proof
//! engine (a range/threshold circuit) replaces it behind this trait without
//! touching the issuer/verifier contracts: public signals, expiry, and the
//! external operations stay identical.

use crate::digest::{hash_parts, Digest};

/// Produces the opaque proof digest for an issuance transcript.
pub trait ProofBackend: Send + Sync {
    /// Attests a serialized transcript, returning the opaque proof value.
    fn attest(&self, transcript: &[u8]) -> Digest;
}

/// The hash-based stand-in engine: domain-separated SHA-256 over the
/// transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestBackend;

impl ProofBackend for DigestBackend {
    fn attest(&self, transcript: &[u8]) -> Digest {
        hash_parts(&[b"veilvote-attest-v1", transcript])
    }
}
