//! Proof codec
//!
//! Serializes the common proof body for storage or transmission. The wire
//! form is an opaque JSON string covering `{digest, public_signals,
//! issued_at}` only: type-specific fields (submission id, threshold) ride
//! inside the public signals or are reconstructed by the caller from context,
//! so the codec carries exactly what later re-verification needs.

use crate::proof::Proof;
use thiserror::Error;

/// Codec failures.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode proof: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to encode proof: {0}")]
    Encode(serde_json::Error),
}

/// Serializes a proof body to its opaque wire string.
pub fn serialize_proof(proof: &Proof) -> Result<String, CodecError> {
    serde_json::to_string(proof).map_err(CodecError::Encode)
}

/// Parses a wire string back into a proof body. Fails with a decode error on
/// malformed input.
pub fn deserialize_proof(wire: &str) -> Result<Proof, CodecError> {
    Ok(serde_json::from_str(wire)?)
}
