//! Authorization failure taxonomy.

use alloy_primitives::Bytes;
use core::fmt;

/// Result of an authorization attempt.
pub type AuthorizationResult<T> = Result<T, AuthorizationError>;

/// Why an authorization attempt was rejected.
///
/// Every rejection is atomic: no ledger state changes and no target call is
/// made (or, for [`AuthorizationError::TargetCallFailed`], the ledger change
/// is rolled back together with the call).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuthorizationError {
    /// Malformed signature, failed recovery, zero recovered address, or a
    /// recovered address that does not match the claimed user.
    InvalidSignature,
    /// Supplied nonce does not equal the user's stored nonce.
    NonceMismatch,
    /// Digest was already consumed by an earlier request.
    Replay,
    /// Non-zero deadline has passed.
    DeadlineExpired,
    /// Supplied chain id does not match the runtime chain id.
    ChainIdMismatch,
    /// Inner payload attempts to re-enter the authorization entry point.
    SelfCallRecursion,
    /// The downstream call reverted; carries the revert data unmodified.
    TargetCallFailed(Bytes),
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature => f.write_str("invalid signature"),
            Self::NonceMismatch => f.write_str("nonce mismatch"),
            Self::Replay => f.write_str("digest already used"),
            Self::DeadlineExpired => f.write_str("deadline expired"),
            Self::ChainIdMismatch => f.write_str("chain id mismatch"),
            Self::SelfCallRecursion => f.write_str("self-call recursion"),
            Self::TargetCallFailed(data) => write!(f, "target call failed: {data}"),
        }
    }
}

impl core::error::Error for AuthorizationError {}

impl From<primitives::SignatureError> for AuthorizationError {
    fn from(_: primitives::SignatureError) -> Self {
        // All signature-layer failure modes collapse to one kind: callers
        // must not be able to distinguish a malformed signature from a
        // wrong signer.
        Self::InvalidSignature
    }
}

impl AuthorizationError {
    /// Returns `true` if resubmission with corrected parameters may succeed.
    ///
    /// A wrong nonce, a passed deadline, a wrong chain id or a reverting
    /// target can all be fixed by re-signing with updated fields or
    /// resubmitting later; `Replay`, `InvalidSignature` and
    /// `SelfCallRecursion` never can.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NonceMismatch
                | Self::DeadlineExpired
                | Self::ChainIdMismatch
                | Self::TargetCallFailed(_)
        )
    }
}
