//! [EIP-712](https://eips.ethereum.org/EIPS/eip-712) signing domain.
//!
//! Two domain encodings are in the wild for these message schemas and both
//! are supported:
//!
//! * `{name, version, chainId, verifyingContract}`: the common form, used by
//!   the salted direct variant and both forwarder variants.
//! * `{name, version, verifyingContract, salt}` with the chain id left-padded
//!   into the 32-byte `salt` field, used by the nonce-ordered direct
//!   variant. Historical, but off-chain signers hash it, so it stays.
//!
//! The separator is cached at construction and rebuilt whenever the live
//! chain id differs from the cached one (hard-fork protection) or the
//! requesting contract address differs from the cached one (clone
//! protection).

use crate::Env;
use alloc::{borrow::Cow, string::String};
use alloy_primitives::{Address, ChainId, B256, U256};
use alloy_sol_types::Eip712Domain;

/// How the chain id is bound into the domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DomainEncoding {
    /// `chainId` is a first-class domain field.
    ChainIdField,
    /// The chain id is carried left-padded in the `salt` field and the
    /// domain has no `chainId` field.
    ChainIdSalt,
}

/// A signing domain with a cached separator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SigningDomain {
    name: String,
    version: String,
    encoding: DomainEncoding,
    cached_separator: B256,
    cached_chain_id: ChainId,
    cached_contract: Address,
}

impl SigningDomain {
    /// Builds a domain bound to `verifying_contract` on `env.chain_id` and
    /// caches its separator.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        encoding: DomainEncoding,
        verifying_contract: Address,
        env: &Env,
    ) -> Self {
        let name = name.into();
        let version = version.into();
        let cached_separator =
            build_separator(&name, &version, encoding, env.chain_id, verifying_contract);
        Self {
            name,
            version,
            encoding,
            cached_separator,
            cached_chain_id: env.chain_id,
            cached_contract: verifying_contract,
        }
    }

    /// Domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Chain id encoding used by this domain.
    pub fn encoding(&self) -> DomainEncoding {
        self.encoding
    }

    /// Returns the separator for `verifying_contract` under `env`.
    ///
    /// The cached value is only returned when both the live chain id and the
    /// requesting contract match what the cache was built against; otherwise
    /// the separator is rebuilt from scratch. A forked chain or a cloned
    /// deployment therefore always gets a fresh, correct binding.
    pub fn separator(&self, env: &Env, verifying_contract: Address) -> B256 {
        if env.chain_id == self.cached_chain_id && verifying_contract == self.cached_contract {
            self.cached_separator
        } else {
            build_separator(
                &self.name,
                &self.version,
                self.encoding,
                env.chain_id,
                verifying_contract,
            )
        }
    }
}

fn build_separator(
    name: &str,
    version: &str,
    encoding: DomainEncoding,
    chain_id: ChainId,
    verifying_contract: Address,
) -> B256 {
    let domain = match encoding {
        DomainEncoding::ChainIdField => Eip712Domain::new(
            Some(Cow::Owned(String::from(name))),
            Some(Cow::Owned(String::from(version))),
            Some(U256::from(chain_id)),
            Some(verifying_contract),
            None,
        ),
        DomainEncoding::ChainIdSalt => Eip712Domain::new(
            Some(Cow::Owned(String::from(name))),
            Some(Cow::Owned(String::from(version))),
            None,
            Some(verifying_contract),
            Some(B256::from(U256::from(chain_id))),
        ),
    };
    domain.hash_struct()
}
