//! Batch settlement.
//!
//! A batch is a list of independently signed maker/taker pairs settled in
//! submission order under one failure policy. Atomic batches rewind
//! completely when any entry fails; non-atomic batches skip the failed
//! entry and keep going, which is only safe when every entry settles in
//! the same currency.

use std::fmt;

use agora_types::constants::MAX_BATCH_ENTRIES;
use agora_types::{
    Address, AgoraError, MakerOrder, OrderSignature, Result, SettlementRecord, TakerOrder,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::{Exchange, Marks, MatchRequest, SettlementContext};

/// One maker/taker pair inside a batch, with the maker's signature.
///
/// Entries carry both sides explicitly, so a single batch may mix maker
/// asks and maker bids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub maker: MakerOrder,
    pub taker: TakerOrder,
    pub signature: OrderSignature,
}

/// Failure policy for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchMode {
    /// Any entry failure aborts and rewinds the whole batch.
    Atomic,
    /// A failed entry is rolled back alone; later entries still run.
    NonAtomic,
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atomic => write!(f, "ATOMIC"),
            Self::NonAtomic => write!(f, "NON_ATOMIC"),
        }
    }
}

/// Per-entry outcome, in submission order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub index: usize,
    pub result: Result<SettlementRecord>,
}

impl Exchange {
    /// Settle a batch of matched pairs under the given failure policy.
    ///
    /// Atomic mode returns the first entry's error after rewinding every
    /// prior entry. Non-atomic mode always returns one outcome per entry
    /// and requires the whole batch to share a currency, so a partial
    /// result never leaves payouts split across denominations.
    pub fn execute_batch(
        &mut self,
        ctx: &mut SettlementContext<'_>,
        entries: &[BatchEntry],
        affiliate: Option<Address>,
        mode: BatchMode,
        now: i64,
    ) -> Result<Vec<BatchOutcome>> {
        self.guard.enter()?;
        let result = self.run_batch(ctx, entries, affiliate, mode, now);
        self.guard.exit();
        result
    }

    fn run_batch(
        &self,
        ctx: &mut SettlementContext<'_>,
        entries: &[BatchEntry],
        affiliate: Option<Address>,
        mode: BatchMode,
        now: i64,
    ) -> Result<Vec<BatchOutcome>> {
        if entries.is_empty() {
            return Err(AgoraError::LengthsInvalid {
                reason: "batch is empty".to_string(),
            });
        }
        if entries.len() > MAX_BATCH_ENTRIES {
            return Err(AgoraError::LengthsInvalid {
                reason: format!(
                    "batch has {} entries, limit is {MAX_BATCH_ENTRIES}",
                    entries.len()
                ),
            });
        }
        if mode == BatchMode::NonAtomic {
            let currency = entries[0].maker.currency;
            if let Some(entry) = entries.iter().find(|e| e.maker.currency != currency) {
                return Err(AgoraError::CurrencyInvalid {
                    currency: entry.maker.currency,
                });
            }
        }

        let batch_marks = Marks::take(ctx);
        let mut outcomes = Vec::with_capacity(entries.len());
        let mut succeeded = 0usize;
        for (index, entry) in entries.iter().enumerate() {
            let request = MatchRequest {
                taker: &entry.taker,
                maker: &entry.maker,
                signature: &entry.signature,
                affiliate,
            };
            match self.attempt_one(ctx, &request, None, now) {
                Ok(record) => {
                    succeeded += 1;
                    outcomes.push(BatchOutcome {
                        index,
                        result: Ok(record),
                    });
                }
                Err(err) => match mode {
                    BatchMode::Atomic => {
                        batch_marks.rollback(ctx);
                        info!(index, error = %err, "atomic batch aborted");
                        return Err(err);
                    }
                    BatchMode::NonAtomic => {
                        warn!(index, error = %err, "batch entry failed");
                        outcomes.push(BatchOutcome {
                            index,
                            result: Err(err),
                        });
                    }
                },
            }
        }
        info!(mode = %mode, total = entries.len(), succeeded, "batch settled");
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display_matches_wire_names() {
        assert_eq!(BatchMode::Atomic.to_string(), "ATOMIC");
        assert_eq!(BatchMode::NonAtomic.to_string(), "NON_ATOMIC");
    }

    #[test]
    fn mode_serializes_screaming_snake() {
        let json = serde_json::to_string(&BatchMode::NonAtomic).unwrap();
        assert_eq!(json, "\"NON_ATOMIC\"");
    }
}
