//! # agora-envelope
//!
//! The security envelope around maker orders: everything that must hold
//! before a strategy is allowed to price a match.
//!
//! - [`OrderValidator`]: structural and temporal checks against registry
//!   snapshots.
//! - [`SignatureVerifier`]: ed25519 authenticity with a delegate escape
//!   hatch for keyless identities.
//! - [`NonceRegistry`]: three-layer replay protection (global epoch,
//!   subset buckets, per-order nonces) with journalled consumption.
//! - [`StrategyRegistry`] / [`CurrencyAllowlist`]: governance-owned
//!   lookup tables the validator reads.
//!
//! All state lives in explicit registries passed by reference; nothing in
//! this crate talks to a clock or any global.

pub mod nonces;
pub mod registry;
pub mod signature;
pub mod validator;

pub use nonces::{ExecutionStatus, NonceRegistry, NonceState};
pub use registry::{CurrencyAllowlist, StrategyRegistry};
pub use signature::{SignatureDelegate, SignatureVerifier};
pub use validator::OrderValidator;

#[cfg(any(test, feature = "test-helpers"))]
pub use signature::testing;
