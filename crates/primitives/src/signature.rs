//! Signer recovery from 65-byte r/s/v signatures.
//!
//! Policy: a malformed signature, a failed recovery and an all-zero recovered
//! address are indistinguishable to callers of [`verify_signer`]; all of
//! them mean the request was not signed by the claimed user. The zero
//! address is never a legitimate match.

use alloy_primitives::{Address, Signature, B256};
use core::fmt;

/// Length of an r || s || v encoded signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Signature verification failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// Signature is not exactly 65 bytes.
    InvalidLength(usize),
    /// Signature bytes do not parse or do not recover to any address.
    Malformed,
    /// Recovery produced the zero address.
    ZeroAddress,
    /// Recovered address does not match the claimed signer.
    SignerMismatch {
        /// The claimed signer.
        expected: Address,
        /// The address the signature actually recovers to.
        recovered: Address,
    },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "signature must be 65 bytes, got {len}"),
            Self::Malformed => f.write_str("malformed signature"),
            Self::ZeroAddress => f.write_str("signature recovered to the zero address"),
            Self::SignerMismatch {
                expected,
                recovered,
            } => write!(f, "signer mismatch: expected {expected}, recovered {recovered}"),
        }
    }
}

impl core::error::Error for SignatureError {}

/// Recovers the signer of `digest` from an r || s || v signature.
pub fn recover_signer(digest: B256, signature: &[u8]) -> Result<Address, SignatureError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::InvalidLength(signature.len()));
    }
    let signature =
        Signature::from_raw(signature).map_err(|_| SignatureError::Malformed)?;
    let recovered = signature
        .recover_address_from_prehash(&digest)
        .map_err(|_| SignatureError::Malformed)?;
    if recovered == Address::ZERO {
        return Err(SignatureError::ZeroAddress);
    }
    Ok(recovered)
}

/// Verifies that `signature` over `digest` was produced by `expected`.
pub fn verify_signer(
    digest: B256,
    signature: &[u8],
    expected: Address,
) -> Result<(), SignatureError> {
    let recovered = recover_signer(digest, signature)?;
    if recovered != expected {
        return Err(SignatureError::SignerMismatch {
            expected,
            recovered,
        });
    }
    Ok(())
}
