//! Trusted-forwarder relay engine.
//!
//! Unlike the direct executor, the forwarder verifies on behalf of other
//! contracts: the signed request names its own `target`, the forwarder is
//! the immediate caller the target observes, and targets resolve the real
//! sender through [`TrustedContext`] trusting the forwarder's address.
//!
//! Both forwarder schemas carry an explicit `chainId` field, checked at the
//! top of the pipeline so a cross-chain submission fails with
//! [`AuthorizationError::ChainIdMismatch`] instead of a generic signature
//! error.
//!
//! Every successful relay produces one sponsor-accounting log so the fee
//! pipeline can settle off-chain.

use crate::{
    context::{append_sender, TrustedContext},
    dispatch::{dispatch_guarded, CallRequest, CallTarget},
    error::{AuthorizationError, AuthorizationResult},
    ledger::{HashLedger, NonceLedger, ReplayProtection},
};
use alloc::string::String;
use alloy_primitives::{Address, Bytes, ChainId, Log, B256, U256};
use alloy_sol_types::{sol, SolEvent};
use primitives::{
    typed_data_digest, verify_signer, DomainEncoding, Env, SigningDomain,
    SponsoredCallConcurrentERC2771, SponsoredCallERC2771,
};

sol! {
    /// Sponsor-accounting record emitted once per successful relay.
    #[derive(Debug, PartialEq, Eq)]
    event LogSponsoredCall(
        address indexed sponsor,
        address indexed target,
        address indexed feeToken,
        uint256 sponsorChainId,
        uint256 nativeToFeeTokenXRateNumerator,
        uint256 nativeToFeeTokenXRateDenominator,
        bytes32 correlationId
    );
}

/// Fee-accounting parameters supplied by the relayer, echoed into the
/// sponsor-accounting log. Not part of the signed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SponsorParams {
    /// Account paying for the relay.
    pub sponsor: Address,
    /// Token the fee is settled in.
    pub fee_token: Address,
    /// Chain the sponsor's fee balance lives on.
    pub sponsor_chain_id: ChainId,
    /// Native-to-fee-token exchange rate numerator.
    pub xrate_numerator: U256,
    /// Native-to-fee-token exchange rate denominator.
    pub xrate_denominator: U256,
    /// Relayer-chosen id correlating the on-chain log with off-chain
    /// accounting.
    pub correlation_id: B256,
}

/// Trusted-forwarder authorization engine.
#[derive(Clone, Debug)]
pub struct Erc2771Forwarder<L> {
    address: Address,
    domain: SigningDomain,
    ledger: L,
}

impl<L> Erc2771Forwarder<L> {
    /// The forwarder's own contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current domain separator under `env`.
    pub fn domain_separator(&self, env: &Env) -> B256 {
        self.domain.separator(env, self.address)
    }

    /// Sender-resolution context for targets behind this forwarder.
    pub fn context(&self) -> TrustedContext {
        TrustedContext::new(self.address)
    }

    /// Replay ledger, for read accessors.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    fn check_chain(&self, env: &Env, supplied: U256) -> AuthorizationResult<()> {
        if supplied != U256::from(env.chain_id) {
            return Err(AuthorizationError::ChainIdMismatch);
        }
        Ok(())
    }

    fn relayed_call(&self, target: Address, data: &[u8], user: Address) -> CallRequest {
        CallRequest {
            target,
            caller: self.address,
            data: append_sender(data, user),
        }
    }

    fn accounting_log(&self, target: Address, sponsor: &SponsorParams) -> Log {
        let event = LogSponsoredCall {
            sponsor: sponsor.sponsor,
            target,
            feeToken: sponsor.fee_token,
            sponsorChainId: U256::from(sponsor.sponsor_chain_id),
            nativeToFeeTokenXRateNumerator: sponsor.xrate_numerator,
            nativeToFeeTokenXRateDenominator: sponsor.xrate_denominator,
            correlationId: sponsor.correlation_id,
        };
        Log {
            address: self.address,
            data: event.encode_log_data(),
        }
    }
}

impl Erc2771Forwarder<NonceLedger> {
    /// Nonce-ordered forwarder at `address`.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        address: Address,
        env: &Env,
    ) -> Self {
        Self {
            address,
            domain: SigningDomain::new(name, version, DomainEncoding::ChainIdField, address, env),
            ledger: NonceLedger::new(),
        }
    }

    /// Nonce the next request from `user` must carry.
    pub fn user_nonce(&self, user: Address) -> u64 {
        self.ledger.user_nonce(user)
    }

    /// Digest a signer must produce for `call`.
    pub fn sponsored_call_digest(&self, env: &Env, call: &SponsoredCallERC2771) -> B256 {
        typed_data_digest(self.domain_separator(env), call)
    }

    /// Verifies and relays a nonce-ordered sponsored call.
    ///
    /// Check order: chain id, deadline, nonce, signature; then the nonce is
    /// consumed and the target invoked with `call.user` appended. Returns
    /// the target's output together with the sponsor-accounting log.
    pub fn sponsored_call(
        &mut self,
        env: &Env,
        call: &SponsoredCallERC2771,
        sponsor: &SponsorParams,
        signature: &[u8],
        target: &mut dyn CallTarget,
    ) -> AuthorizationResult<(Bytes, Log)> {
        self.check_chain(env, call.chainId)?;
        if env.deadline_passed(call.userDeadline) {
            return Err(AuthorizationError::DeadlineExpired);
        }
        // Stored nonces are 64-bit; a wider supplied nonce can never match.
        let nonce = u64::try_from(call.userNonce)
            .map_err(|_| AuthorizationError::NonceMismatch)?;
        let digest = self.sponsored_call_digest(env, call);
        self.ledger.check(call.user, digest, &nonce)?;
        verify_signer(digest, signature, call.user)?;
        let request = self.relayed_call(call.target, &call.data, call.user);
        let output =
            dispatch_guarded(&mut self.ledger, call.user, digest, &nonce, request, target)?;
        Ok((output, self.accounting_log(call.target, sponsor)))
    }
}

impl Erc2771Forwarder<HashLedger> {
    /// Salted (concurrent) forwarder at `address`.
    pub fn new_concurrent(
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

    /// Digest a signer must produce for `call`.
    pub fn sponsored_call_concurrent_digest(
        &self,
        env: &Env,
        call: &SponsoredCallConcurrentERC2771,
    ) -> B256 {
        typed_data_digest(self.domain_separator(env), call)
    }

    /// Verifies and relays a salted sponsored call.
    ///
    /// Check order: chain id, deadline, replay, signature; then the digest
    /// is consumed and the target invoked with `call.user` appended.
    pub fn sponsored_call_concurrent(
        &mut self,
        env: &Env,
        call: &SponsoredCallConcurrentERC2771,
        sponsor: &SponsorParams,
        signature: &[u8],
        target: &mut dyn CallTarget,
    ) -> AuthorizationResult<(Bytes, Log)> {
        self.check_chain(env, call.chainId)?;
        if env.deadline_passed(call.userDeadline) {
            return Err(AuthorizationError::DeadlineExpired);
        }
        let digest = self.sponsored_call_concurrent_digest(env, call);
        self.ledger.check(call.user, digest, &())?;
        verify_signer(digest, signature, call.user)?;
        let request = self.relayed_call(call.target, &call.data, call.user);
        let output = dispatch_guarded(&mut self.ledger, call.user, digest, &(), request, target)?;
        Ok((output, self.accounting_log(call.target, sponsor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn chain_check_is_exact() {
        let env = Env::new(10, 0);
        let forwarder = Erc2771Forwarder::new(
            "Forwarder",
            "1",
            address!("00000000000000000000000000000000000000f0"),
            &env,
        );
        assert!(forwarder.check_chain(&env, U256::from(10u64)).is_ok());
        assert_eq!(
            forwarder.check_chain(&env, U256::from(11u64)),
            Err(AuthorizationError::ChainIdMismatch)
        );
    }

    #[test]
    fn accounting_log_carries_the_sponsor_fields() {
        let env = Env::new(1, 0);
        let forwarder_addr = address!("00000000000000000000000000000000000000f0");
        let forwarder: Erc2771Forwarder<NonceLedger> =
            Erc2771Forwarder::new("Forwarder", "1", forwarder_addr, &env);
        let sponsor = SponsorParams {
            sponsor: address!("3333333333333333333333333333333333333333"),
            fee_token: address!("4444444444444444444444444444444444444444"),
            sponsor_chain_id: 137,
            xrate_numerator: U256::from(3u64),
            xrate_denominator: U256::from(2u64),
            correlation_id: B256::repeat_byte(0xc1),
        };
        let target = address!("5555555555555555555555555555555555555555");

        let log = forwarder.accounting_log(target, &sponsor);
        assert_eq!(log.address, forwarder_addr);

        let decoded = LogSponsoredCall::decode_log_data(&log.data).unwrap();
        assert_eq!(decoded.sponsor, sponsor.sponsor);
        assert_eq!(decoded.target, target);
        assert_eq!(decoded.feeToken, sponsor.fee_token);
        assert_eq!(decoded.sponsorChainId, U256::from(137u64));
        assert_eq!(decoded.correlationId, sponsor.correlation_id);
    }
}
