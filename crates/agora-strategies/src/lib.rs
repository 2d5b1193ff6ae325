//! # agora-strategies
//!
//! The closed set of pricing strategies and their dispatcher.
//!
//! A strategy turns a `(taker, maker)` pair plus an [`ExecutionContext`]
//! into a [`Fulfillment`]: the exact items to move and the settlement
//! price. Strategies never touch custody, nonces or fees; they only
//! decide whether the pair matches and at what price.
//!
//! Dispatch is a closed enum match in [`StrategyExecutor`]. The individual
//! strategy modules stay crate-private; new kinds are added by extending
//! `StrategyKind` and the match arms, not by registering trait objects.

pub mod context;
pub mod criteria;
pub mod oracle;
pub mod params;

mod collection;
mod dutch;
mod executor;
mod floor;
mod range;
mod standard;

pub use context::{ExecutionContext, Fulfillment};
pub use criteria::MerkleTree;
pub use executor::StrategyExecutor;
pub use oracle::{FloorOracle, FloorQuote, StaticFloorOracle};
