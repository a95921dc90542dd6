//! Signable message schemas.
//!
//! Field order and type names are part of the wire contract: off-chain
//! signers hash the exact [EIP-712](https://eips.ethereum.org/EIPS/eip-712)
//! type strings these declarations produce, so none of them may be reordered
//! or renamed.
//!
//! The two direct-integration shapes share the Solidity type name
//! `MetaTransaction` and therefore live in separate Rust modules:
//! [`sequential`] for the nonce-ordered shape and [`concurrent`] for the
//! salted shape.

use alloy_sol_types::sol;

/// Nonce-ordered direct meta-transaction message.
pub mod sequential {
    use alloy_sol_types::sol;

    sol! {
        /// Signed by the user, executed by anyone. Replay protection comes
        /// from `nonce`, which must equal the user's stored nonce.
        #[derive(Debug, PartialEq, Eq)]
        struct MetaTransaction {
            uint256 nonce;
            address from;
            bytes functionSignature;
        }
    }
}

/// Salted (concurrent) direct meta-transaction message.
pub mod concurrent {
    use alloy_sol_types::sol;

    sol! {
        /// Signed by the user, executed by anyone, in any order relative to
        /// the user's other salted messages. Replay protection comes from
        /// marking the digest as consumed.
        #[derive(Debug, PartialEq, Eq)]
        struct MetaTransaction {
            bytes32 userSalt;
            address from;
            bytes functionSignature;
            uint256 deadline;
        }
    }
}

sol! {
    /// Nonce-ordered sponsored call relayed through a trusted forwarder.
    #[derive(Debug, PartialEq, Eq)]
    struct SponsoredCallERC2771 {
        uint256 chainId;
        address target;
        bytes data;
        address user;
        uint256 userNonce;
        uint256 userDeadline;
    }

    /// Salted (concurrent) sponsored call relayed through a trusted forwarder.
    #[derive(Debug, PartialEq, Eq)]
    struct SponsoredCallConcurrentERC2771 {
        uint256 chainId;
        address target;
        bytes data;
        address user;
        bytes32 userSalt;
        uint256 userDeadline;
    }
}
