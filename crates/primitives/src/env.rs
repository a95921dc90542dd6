//! Execution environment handed to the authorization engines.
//!
//! Chain id and clock are injected rather than read from ambient state so the
//! engines can be driven deterministically in tests and embedded anywhere.

use alloy_primitives::{ChainId, U256};

/// The environment a request is authorized against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Env {
    /// Chain id of the chain the engine is running on.
    pub chain_id: ChainId,
    /// Current timestamp in seconds, used for deadline checks.
    pub timestamp: u64,
}

impl Env {
    /// Returns a new environment.
    pub fn new(chain_id: ChainId, timestamp: u64) -> Self {
        Self {
            chain_id,
            timestamp,
        }
    }

    /// Returns `true` if `deadline` has passed.
    ///
    /// A deadline of zero is the "no expiry" sentinel and never passes;
    /// otherwise a request is live while `timestamp <= deadline`.
    pub fn deadline_passed(&self, deadline: U256) -> bool {
        !deadline.is_zero() && U256::from(self.timestamp) > deadline
    }
}
