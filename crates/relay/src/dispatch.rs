//! Downstream call dispatch.
//!
//! The engines never execute business logic themselves; they hand the
//! authorized payload to a [`CallTarget`] and transactionally unwind the
//! ledger if it reverts.

use crate::{ledger::ReplayProtection, AuthorizationError, AuthorizationResult};
use alloy_primitives::{Address, Bytes, B256};

/// A fully assembled downstream call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CallRequest {
    /// Contract being invoked.
    pub target: Address,
    /// Immediate caller the target observes (the engine's own address).
    pub caller: Address,
    /// Payload, with the verified user appended as the last 20 bytes.
    pub data: Bytes,
}

/// Something that can execute an authorized call.
///
/// `Err` carries the revert data, which is bubbled to the relayer unmodified
/// inside [`AuthorizationError::TargetCallFailed`].
pub trait CallTarget {
    /// Executes `request` and returns its output.
    fn call(&mut self, request: CallRequest) -> Result<Bytes, Bytes>;
}

impl<T: CallTarget + ?Sized> CallTarget for &mut T {
    fn call(&mut self, request: CallRequest) -> Result<Bytes, Bytes> {
        (**self).call(request)
    }
}

/// Consumes the ledger entry, then invokes the target.
///
/// Effects strictly precede interactions: the ledger is marked before the
/// call so a reentrant resubmission of the same signature fails its replay
/// check. If the call reverts, the ledger entry is reverted with it and the
/// whole authorization fails as a unit.
pub(crate) fn dispatch_guarded<L: ReplayProtection>(
    ledger: &mut L,
    user: Address,
    digest: B256,
    proof: &L::Proof,
    request: CallRequest,
    target: &mut dyn CallTarget,
) -> AuthorizationResult<Bytes> {
    let entry = ledger.consume(user, digest, proof);
    match target.call(request) {
        Ok(output) => Ok(output),
        Err(revert) => {
            ledger.revert(entry);
            Err(AuthorizationError::TargetCallFailed(revert))
        }
    }
}
