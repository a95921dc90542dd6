//! # metatx-relay
//!
//! Replay-protected, signature-gated execution of relayed calls.
//!
//! Four engine flavors share one pipeline (chain check, deadline check,
//! replay check, signature check, ledger consumption, target invocation)
//! and differ along two axes:
//!
//! * where verification happens: inside the business contract itself
//!   ([`MetaTxExecutor`]) or inside a separate trusted forwarder
//!   ([`Erc2771Forwarder`]);
//! * how replay is prevented: per-user sequential nonces ([`NonceLedger`])
//!   or per-digest consumption marks ([`HashLedger`]).
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod context;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod forwarder;
pub mod ledger;

pub use context::{append_sender, split_appended_sender, TrustedContext};
pub use dispatch::{CallRequest, CallTarget};
pub use error::{AuthorizationError, AuthorizationResult};
pub use executor::MetaTxExecutor;
pub use forwarder::{Erc2771Forwarder, LogSponsoredCall, SponsorParams};
#[cfg(feature = "rand")]
pub use ledger::random_salt;
pub use ledger::{HashLedger, NonceLedger, ReplayProtection};

pub use primitives;
pub use primitives::{Env, SponsoredCallConcurrentERC2771, SponsoredCallERC2771};
