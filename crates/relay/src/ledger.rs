//! Replay-protection ledgers.
//!
//! Two strategies guard against signature replay:
//!
//! * [`NonceLedger`]: a per-user monotonic counter. Requests execute in
//!   strict per-user order; one stuck request blocks all later ones for that
//!   user.
//! * [`HashLedger`]: a set of consumed digests. Any number of outstanding
//!   signed requests may execute in any order, each exactly once, provided
//!   every request carries fresh randomness.
//!
//! `consume` returns a journal entry that [`ReplayProtection::revert`]
//! undoes, so an engine can unwind the ledger mutation when the downstream
//! call fails and keep the whole authorization all-or-nothing.

use crate::{AuthorizationError, AuthorizationResult};
use alloc::vec::Vec;
use alloy_primitives::{
    map::{HashMap, HashSet},
    Address, B256,
};

/// Replay-protection strategy used by an authorization engine.
pub trait ReplayProtection {
    /// Per-request proof material supplied by the signer (a nonce, or
    /// nothing when the digest itself is the identity).
    type Proof;
    /// Journal entry undoing one `consume`.
    type Entry;

    /// Checks that `(user, digest, proof)` has not been used yet.
    fn check(&self, user: Address, digest: B256, proof: &Self::Proof) -> AuthorizationResult<()>;

    /// Marks `(user, digest, proof)` as used. Must be called at most once
    /// per authorized request, after `check`, before the target call.
    fn consume(&mut self, user: Address, digest: B256, proof: &Self::Proof) -> Self::Entry;

    /// Undoes a previous `consume`.
    fn revert(&mut self, entry: Self::Entry);
}

/// Per-user strictly increasing nonce counter, starting at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NonceLedger {
    nonces: HashMap<Address, u64>,
}

impl NonceLedger {
    /// Returns an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nonce for `user`; the value the next request must carry.
    pub fn user_nonce(&self, user: Address) -> u64 {
        self.nonces.get(&user).copied().unwrap_or_default()
    }

    /// Bulk nonce read, used by relayers to prefetch nonces.
    pub fn user_nonces(&self, users: &[Address]) -> Vec<(Address, u64)> {
        users
            .iter()
            .map(|user| (*user, self.user_nonce(*user)))
            .collect()
    }
}

impl ReplayProtection for NonceLedger {
    type Proof = u64;
    type Entry = Address;

    fn check(&self, user: Address, _digest: B256, proof: &u64) -> AuthorizationResult<()> {
        if self.user_nonce(user) != *proof {
            return Err(AuthorizationError::NonceMismatch);
        }
        Ok(())
    }

    fn consume(&mut self, user: Address, _digest: B256, _proof: &u64) -> Address {
        *self.nonces.entry(user).or_default() += 1;
        user
    }

    fn revert(&mut self, entry: Address) {
        if let Some(nonce) = self.nonces.get_mut(&entry) {
            *nonce -= 1;
        }
    }
}

/// Set of consumed digests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashLedger {
    consumed: HashSet<B256>,
}

impl HashLedger {
    /// Returns an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `digest` was already consumed.
    pub fn was_consumed(&self, digest: B256) -> bool {
        self.consumed.contains(&digest)
    }
}

impl ReplayProtection for HashLedger {
    type Proof = ();
    type Entry = B256;

    fn check(&self, _user: Address, digest: B256, _proof: &()) -> AuthorizationResult<()> {
        if self.was_consumed(digest) {
            return Err(AuthorizationError::Replay);
        }
        Ok(())
    }

    fn consume(&mut self, _user: Address, digest: B256, _proof: &()) -> B256 {
        self.consumed.insert(digest);
        digest
    }

    fn revert(&mut self, entry: B256) {
        self.consumed.remove(&entry);
    }
}

/// Generates a fresh random salt for concurrent requests.
#[cfg(feature = "rand")]
pub fn random_salt() -> B256 {
    B256::random()
}
