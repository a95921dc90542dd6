//! # metatx-primitives
//!
//! Stateless building blocks for meta-transaction authorization: EIP-712
//! domain separators, typed message schemas, digest composition and
//! signature recovery.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod digest;
pub mod domain;
pub mod env;
pub mod message;
pub mod signature;

pub use digest::{compose_digest, typed_data_digest};
pub use domain::{DomainEncoding, SigningDomain};
pub use env::Env;
pub use message::{SponsoredCallConcurrentERC2771, SponsoredCallERC2771};
pub use signature::{recover_signer, verify_signer, SignatureError};

// Re-export the underlying type crates, mirroring how downstream code is
// expected to name addresses, hashes and typed data.
pub use alloy_primitives;
pub use alloy_primitives::{Address, Bytes, ChainId, B256, U256};
pub use alloy_sol_types;
