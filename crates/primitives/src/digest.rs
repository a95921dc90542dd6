//! Final signable digest composition.
//!
//! `digest = keccak256(0x19 0x01 || domainSeparator || structHash)`, the
//! byte layout every standard typed-data signer produces. Off-chain tooling
//! can reproduce any digest with these helpers alone, without instantiating
//! an engine.

use alloy_primitives::{Keccak256, B256};
use alloy_sol_types::SolStruct;

/// EIP-191 version byte pair prefixing a typed-data digest.
const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// Composes the signable digest from a domain separator and a struct hash.
pub fn compose_digest(separator: B256, struct_hash: B256) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(TYPED_DATA_PREFIX);
    hasher.update(separator);
    hasher.update(struct_hash);
    hasher.finalize()
}

/// Composes the signable digest for a typed message under `separator`.
pub fn typed_data_digest<T: SolStruct>(separator: B256, message: &T) -> B256 {
    compose_digest(separator, message.eip712_hash_struct())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DomainEncoding, SigningDomain},
        message::sequential::MetaTransaction,
        Env,
    };
    use alloy_primitives::{address, b256, Bytes, U256};
    use alloy_sol_types::Eip712Domain;

    fn message() -> MetaTransaction {
        MetaTransaction {
            nonce: U256::from(7u64),
            from: address!("1111111111111111111111111111111111111111"),
            functionSignature: Bytes::from_static(&[0xd0, 0x9d, 0xe0, 0x8a]),
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let separator = b256!("00000000000000000000000000000000000000000000000000000000000000ff");
        assert_eq!(
            typed_data_digest(separator, &message()),
            typed_data_digest(separator, &message())
        );
    }

    #[test]
    fn every_field_feeds_the_digest() {
        let separator = b256!("00000000000000000000000000000000000000000000000000000000000000ff");
        let base = typed_data_digest(separator, &message());

        let mut m = message();
        m.nonce = U256::from(8u64);
        assert_ne!(base, typed_data_digest(separator, &m));

        let mut m = message();
        m.from = address!("2222222222222222222222222222222222222222");
        assert_ne!(base, typed_data_digest(separator, &m));

        let mut m = message();
        m.functionSignature = Bytes::from_static(&[0xde, 0xad]);
        assert_ne!(base, typed_data_digest(separator, &m));
    }

    // Cross-check the manual 0x1901 layout against alloy's own signing-hash
    // path for the common domain encoding.
    #[test]
    fn layout_matches_alloy_signing_hash() {
        let env = Env::new(1, 0);
        let contract = address!("00000000000000000000000000000000000000aa");
        let domain = SigningDomain::new("Demo", "1", DomainEncoding::ChainIdField, contract, &env);

        let alloy_domain = Eip712Domain::new(
            Some("Demo".into()),
            Some("1".into()),
            Some(U256::from(1u64)),
            Some(contract),
            None,
        );
        assert_eq!(
            typed_data_digest(domain.separator(&env, contract), &message()),
            message().eip712_signing_hash(&alloy_domain)
        );
    }
}
