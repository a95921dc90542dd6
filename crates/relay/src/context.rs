//! Verified-sender propagation.
//!
//! Both invocation conventions carry the cryptographically verified user as
//! 20 raw bytes appended to the call payload
//! ([ERC-2771](https://eips.ethereum.org/EIPS/eip-2771)). The suffix is only
//! honored when the immediate caller is trusted (the forwarder address for
//! relayed calls, the contract's own address for self-calls), so the
//! extracted identity can never bypass the signature check.
//!
//! The trailing-bytes convention lives entirely in [`append_sender`] and
//! [`split_appended_sender`]; nothing else in the crate touches the byte
//! layout.

use alloc::vec::Vec;
use alloy_primitives::{Address, Bytes};

/// Appends `sender` as the last 20 bytes of `data`.
pub fn append_sender(data: &[u8], sender: Address) -> Bytes {
    let mut out = Vec::with_capacity(data.len() + Address::len_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(sender.as_slice());
    out.into()
}

/// Splits an appended sender off the end of `data`.
///
/// Returns `None` when `data` is too short to carry a suffix.
pub fn split_appended_sender(data: &[u8]) -> Option<(&[u8], Address)> {
    let split = data.len().checked_sub(Address::len_bytes())?;
    let (inner, suffix) = data.split_at(split);
    Some((inner, Address::from_slice(suffix)))
}

/// Resolves the effective sender of an incoming call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrustedContext {
    trusted: Address,
}

impl TrustedContext {
    /// Context trusting calls from `trusted` to carry an appended sender.
    pub fn new(trusted: Address) -> Self {
        Self { trusted }
    }

    /// The address whose calls carry a verified appended sender.
    pub fn trusted(&self) -> Address {
        self.trusted
    }

    /// Returns the effective sender and the payload without the suffix.
    ///
    /// When `caller` is the trusted address, the appended identity was
    /// placed there by the authorization engine and is returned; any other
    /// caller is its own identity and the payload is untouched.
    pub fn msg_sender<'a>(&self, caller: Address, data: &'a [u8]) -> (Address, &'a [u8]) {
        if caller == self.trusted {
            if let Some((inner, sender)) = split_appended_sender(data) {
                return (sender, inner);
            }
        }
        (caller, data)
    }
}
