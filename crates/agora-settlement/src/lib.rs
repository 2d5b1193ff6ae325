//! # agora-settlement
//!
//! **Settlement plane**: the coordinator that turns a validated match
//! into moved assets, paid-out fees, a consumed nonce, and a receipt.
//!
//! ## Pipeline
//!
//! The [`Exchange`] receives a maker/taker pair and:
//! 1. Validates the maker order (window, strategy row, currency)
//! 2. Verifies the maker signature (direct ed25519 or delegate)
//! 3. Checks nonce freshness (no replay, no cancelled lineage)
//! 4. Prices the match through the order's strategy
//! 5. Splits the price into seller / creator / protocol / affiliate legs
//! 6. Moves assets and payment legs through pluggable custody backends
//! 7. Consumes the maker's order nonce and emits a [`SettlementRecord`]
//!
//! Any failure rolls the attempt back to its entry checkpoint. Batches
//! layer an outer checkpoint on top so atomic batches rewind as a unit.
//!
//! State lives in the caller: every engine call borrows its collaborators
//! through [`SettlementContext`].

pub mod batch;
pub mod custody;
pub mod engine;
pub mod fees;
pub mod guard;
pub mod phase;
pub mod royalties;

pub use agora_types::SettlementRecord;
pub use batch::{BatchEntry, BatchMode, BatchOutcome};
pub use custody::{AssetCustody, CurrencyVault, InMemoryCustody, InMemoryVault};
pub use engine::{Exchange, MatchRequest, SettlementContext};
pub use fees::{compute_split, AffiliateProgram, FeeSplit};
pub use guard::ReentrancyGuard;
pub use phase::{AttemptPhase, SettlementAttempt};
pub use royalties::{CreatorFee, CreatorFeeSource, ItemRoyaltyTable, NoRoyalties, RoyaltyRegistry};
