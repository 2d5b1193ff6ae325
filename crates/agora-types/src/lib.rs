//! # agora-types
//!
//! Shared types, errors, and configuration for the **Agora** asset exchange
//! engine.
//!
//! This crate is the workspace's leaf dependency; every other crate builds
//! on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`ItemId`], [`StrategyId`], [`GlobalNonce`], [`SubsetNonce`], [`OrderNonce`], [`SettlementId`]
//! - **Order model**: [`MakerOrder`], [`TakerOrder`], [`OrderSignature`], [`Side`], [`AssetKind`]
//! - **Strategy model**: [`StrategyKind`], [`Strategy`]
//! - **Settlement output**: [`SettlementRecord`], [`FeePayout`]
//! - **Configuration**: [`ProtocolConfig`]
//! - **Errors**: [`AgoraError`] with `AG_ERR_` prefix codes
//! - **Constants**: protocol-wide caps and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;
pub mod record;
pub mod strategy;

// Re-export all primary types at crate root for ergonomic imports:
//   use agora_types::{MakerOrder, TakerOrder, Side, StrategyKind, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use record::*;
pub use strategy::*;

// Constants are accessed via `agora_types::constants::FOO`
// (not re-exported to avoid name collisions).
