//! Direct-integration meta-transaction executor.
//!
//! One engine, generic over the replay strategy:
//!
//! * [`MetaTxExecutor::sequential`]: nonce-ordered requests, signed against
//!   the historical domain shape that carries the chain id in the `salt`
//!   field. The message has no deadline; cross-chain replay is rejected by
//!   the domain-embedded chain id alone, surfacing as an invalid signature.
//! * [`MetaTxExecutor::concurrent`]: salted requests with a deadline,
//!   signed against the common `chainId` domain shape.
//!
//! The executor plays the target contract's own role: after verification it
//! self-calls with the verified user appended, and the business function
//! resolves the effective sender through [`TrustedContext`] trusting the
//! contract's own address.

use crate::{
    context::{append_sender, TrustedContext},
    dispatch::{dispatch_guarded, CallRequest, CallTarget},
    error::{AuthorizationError, AuthorizationResult},
    ledger::{HashLedger, NonceLedger, ReplayProtection},
};
use alloc::string::String;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall};
use primitives::{
    message::{concurrent, sequential},
    typed_data_digest, verify_signer, DomainEncoding, Env, SigningDomain,
};

sol! {
    /// ABI entry points, declared only for their selectors: the recursion
    /// guard rejects inner payloads that would re-enter authorization.
    function executeMetaTransaction(
        address userAddress,
        bytes functionSignature,
        bytes32 sigR,
        bytes32 sigS,
        uint8 sigV
    );

    function executeSaltedMetaTransaction(
        address userAddress,
        bytes32 userSalt,
        uint256 deadline,
        bytes functionSignature,
        bytes signature
    );
}

/// Direct-integration authorization engine.
#[derive(Clone, Debug)]
pub struct MetaTxExecutor<L> {
    address: Address,
    domain: SigningDomain,
    ledger: L,
}

impl<L> MetaTxExecutor<L> {
    /// The engine's own contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current domain separator under `env`.
    pub fn domain_separator(&self, env: &Env) -> B256 {
        self.domain.separator(env, self.address)
    }

    /// Sender-resolution context for the business logic behind this engine.
    ///
    /// Trusts self-calls only: an appended sender is honored exclusively
    /// when the engine itself placed it there.
    pub fn context(&self) -> TrustedContext {
        TrustedContext::new(self.address)
    }

    /// Replay ledger, for read accessors.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    fn guard_recursion(payload: &[u8]) -> AuthorizationResult<()> {
        if payload.len() >= 4
            && (payload[..4] == executeMetaTransactionCall::SELECTOR
                || payload[..4] == executeSaltedMetaTransactionCall::SELECTOR)
        {
            return Err(AuthorizationError::SelfCallRecursion);
        }
        Ok(())
    }

    fn self_call(&self, payload: &[u8], user: Address) -> CallRequest {
        CallRequest {
            target: self.address,
            caller: self.address,
            data: append_sender(payload, user),
        }
    }
}

impl MetaTxExecutor<NonceLedger> {
    /// Nonce-ordered executor for the contract at `address`.
    pub fn sequential(
        name: impl Into<String>,
        version: impl Into<String>,
        address: Address,
        env: &Env,
    ) -> Self {
        Self {
            address,
            domain: SigningDomain::new(name, version, DomainEncoding::ChainIdSalt, address, env),
            ledger: NonceLedger::new(),
        }
    }

    /// Nonce the next request from `user` must carry.
    pub fn user_nonce(&self, user: Address) -> u64 {
        self.ledger.user_nonce(user)
    }

    /// Digest a signer must produce for `(user, nonce, payload)`.
    pub fn meta_transaction_digest(
        &self,
        env: &Env,
        user: Address,
        nonce: u64,
        payload: &[u8],
    ) -> B256 {
        let message = sequential::MetaTransaction {
            nonce: U256::from(nonce),
            from: user,
            functionSignature: Bytes::copy_from_slice(payload),
        };
        typed_data_digest(self.domain_separator(env), &message)
    }

    /// Verifies and executes a nonce-ordered meta-transaction.
    ///
    /// Check order: recursion guard, nonce, signature; then the nonce is
    /// consumed and the payload self-called with `user` appended. A revert
    /// in the target rolls the nonce back.
    pub fn execute_meta_transaction(
        &mut self,
        env: &Env,
        user: Address,
        payload: &[u8],
        nonce: u64,
        signature: &[u8],
        target: &mut dyn CallTarget,
    ) -> AuthorizationResult<Bytes> {
        Self::guard_recursion(payload)?;
        let digest = self.meta_transaction_digest(env, user, nonce, payload);
        self.ledger.check(user, digest, &nonce)?;
        verify_signer(digest, signature, user)?;
        let request = self.self_call(payload, user);
        dispatch_guarded(&mut self.ledger, user, digest, &nonce, request, target)
    }
}

impl MetaTxExecutor<HashLedger> {
    /// Salted (concurrent) executor for the contract at `address`.
    pub fn concurrent(
        name: impl Into<String>,
        version: impl Into<String>,
        address: Address,
        env: &Env,
    ) -> Self {
        Self {
            address,
            domain: SigningDomain::new(name, version, DomainEncoding::ChainIdField, address, env),
            ledger: HashLedger::new(),
        }
    }

    /// Returns `true` if `digest` was already consumed.
    pub fn was_consumed(&self, digest: B256) -> bool {
        self.ledger.was_consumed(digest)
    }

    /// Digest a signer must produce for `(user, salt, payload, deadline)`.
    pub fn salted_meta_transaction_digest(
        &self,
        env: &Env,
        user: Address,
        salt: B256,
        payload: &[u8],
        deadline: u64,
    ) -> B256 {
        let message = concurrent::MetaTransaction {
            userSalt: salt,
            from: user,
            functionSignature: Bytes::copy_from_slice(payload),
            deadline: U256::from(deadline),
        };
        typed_data_digest(self.domain_separator(env), &message)
    }

    /// Verifies and executes a salted meta-transaction.
    ///
    /// Check order: recursion guard, deadline, replay, signature; then the
    /// digest is consumed and the payload self-called with `user` appended.
    /// A revert in the target frees the digest again.
    pub fn execute_salted_meta_transaction(
        &mut self,
        env: &Env,
        user: Address,
        payload: &[u8],
        salt: B256,
        deadline: u64,
        signature: &[u8],
        target: &mut dyn CallTarget,
    ) -> AuthorizationResult<Bytes> {
        Self::guard_recursion(payload)?;
        if env.deadline_passed(U256::from(deadline)) {
            return Err(AuthorizationError::DeadlineExpired);
        }
        let digest = self.salted_meta_transaction_digest(env, user, salt, payload, deadline);
        self.ledger.check(user, digest, &())?;
        verify_signer(digest, signature, user)?;
        let request = self.self_call(payload, user);
        dispatch_guarded(&mut self.ledger, user, digest, &(), request, target)
    }
}
