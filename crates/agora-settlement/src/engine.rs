//! The settlement coordinator.
//!
//! [`Exchange`] drives one matched pair through the full pipeline:
//! validate, verify signature, reserve the nonce, price via the strategy,
//! compute fees, move assets, move payment legs, consume the nonce,
//! record. A failure at any step aborts the whole attempt and rewinds the
//! custody, vault and nonce journals to the entry checkpoint, so no
//! observer ever sees a partial settlement.
//!
//! The engine holds no ledger state of its own. Every collaborator comes
//! in through [`SettlementContext`] by explicit reference.

use agora_envelope::{
    CurrencyAllowlist, NonceRegistry, OrderValidator, SignatureVerifier, StrategyRegistry,
};
use agora_strategies::{ExecutionContext, FloorOracle, StrategyExecutor};
use agora_types::{
    Address, AgoraError, FeePayout, MakerOrder, OrderSignature, ProtocolConfig, Result,
    SettlementId, SettlementRecord, Side, TakerOrder,
};
use chrono::DateTime;
use tracing::debug;

use crate::custody::{AssetCustody, CurrencyVault};
use crate::fees::{self, AffiliateProgram};
use crate::guard::ReentrancyGuard;
use crate::phase::{AttemptPhase, SettlementAttempt};
use crate::royalties::CreatorFeeSource;

/// Mutable collaborators for one engine call.
///
/// Everything the engine can touch is an explicit reference here; there
/// are no globals and no interior mutability, so every state mutation is
/// visible at the call site.
pub struct SettlementContext<'a> {
    pub nonces: &'a mut NonceRegistry,
    pub strategies: &'a StrategyRegistry,
    pub currencies: &'a CurrencyAllowlist,
    pub verifier: &'a SignatureVerifier,
    pub royalties: &'a dyn CreatorFeeSource,
    pub affiliates: &'a AffiliateProgram,
    pub oracle: Option<&'a dyn FloorOracle>,
    pub custody: &'a mut dyn AssetCustody,
    pub vault: &'a mut dyn CurrencyVault,
}

/// One settlement request: the matched pair plus its authentication.
#[derive(Clone, Copy)]
pub struct MatchRequest<'a> {
    pub taker: &'a TakerOrder,
    pub maker: &'a MakerOrder,
    pub signature: &'a OrderSignature,
    /// Affiliate attached by the submitting frontend, if any.
    pub affiliate: Option<Address>,
}

/// Journal marks over all three rollback scopes, taken together.
pub(crate) struct Marks {
    nonces: usize,
    custody: usize,
    vault: usize,
}

impl Marks {
    pub(crate) fn take(ctx: &SettlementContext<'_>) -> Self {
        Self {
            nonces: ctx.nonces.checkpoint(),
            custody: ctx.custody.checkpoint(),
            vault: ctx.vault.checkpoint(),
        }
    }

    pub(crate) fn rollback(&self, ctx: &mut SettlementContext<'_>) {
        ctx.vault.rollback_to(self.vault);
        ctx.custody.rollback_to(self.custody);
        ctx.nonces.rollback_to(self.nonces);
    }
}

/// The settlement coordinator.
pub struct Exchange {
    config: ProtocolConfig,
    validator: OrderValidator,
    executor: StrategyExecutor,
    pub(crate) guard: ReentrancyGuard,
}

impl Exchange {
    #[must_use]
    pub fn new(config: ProtocolConfig) -> Self {
        let executor = StrategyExecutor::new(config.coordinator);
        Self {
            config,
            validator: OrderValidator::new(),
            executor,
            guard: ReentrancyGuard::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Settle a taker bid against a maker ask: the taker pays and
    /// receives items.
    pub fn execute_taker_bid(
        &mut self,
        ctx: &mut SettlementContext<'_>,
        request: &MatchRequest<'_>,
        now: i64,
    ) -> Result<SettlementRecord> {
        self.execute_single(ctx, request, Side::Ask, now)
    }

    /// Settle a taker ask against a maker bid: the taker supplies items
    /// and receives the proceeds.
    pub fn execute_taker_ask(
        &mut self,
        ctx: &mut SettlementContext<'_>,
        request: &MatchRequest<'_>,
        now: i64,
    ) -> Result<SettlementRecord> {
        self.execute_single(ctx, request, Side::Bid, now)
    }

    /// Read-only preflight: would this maker order pass every gate short
    /// of execution right now? Returns the would-be rejection so callers
    /// can surface the precise reason without spending anything.
    pub fn is_order_valid(
        &self,
        ctx: &SettlementContext<'_>,
        maker: &MakerOrder,
        signature: &OrderSignature,
        now: i64,
    ) -> Result<()> {
        self.validator
            .validate(maker, ctx.strategies, ctx.currencies, now)?;
        ctx.verifier.verify(maker, signature)?;
        if !ctx.nonces.is_valid(maker.signer, maker) {
            return Err(AgoraError::NonceInvalid {
                signer: maker.signer,
                order_nonce: maker.order_nonce,
            });
        }
        let row = ctx.strategies.get(maker.strategy_id)?;
        self.executor.validate_maker(row.kind, maker)
    }

    fn execute_single(
        &mut self,
        ctx: &mut SettlementContext<'_>,
        request: &MatchRequest<'_>,
        expected_side: Side,
        now: i64,
    ) -> Result<SettlementRecord> {
        self.guard.enter()?;
        let result = self.attempt_one(ctx, request, Some(expected_side), now);
        self.guard.exit();
        result
    }

    /// One bracketed attempt: take marks, settle, roll everything back on
    /// failure. `expected_side` is `None` for batch entries, which carry
    /// no side constraint.
    pub(crate) fn attempt_one(
        &self,
        ctx: &mut SettlementContext<'_>,
        request: &MatchRequest<'_>,
        expected_side: Option<Side>,
        now: i64,
    ) -> Result<SettlementRecord> {
        let marks = Marks::take(ctx);
        let mut attempt = SettlementAttempt::new();
        let result = self.settle(ctx, &mut attempt, request, expected_side, now);
        if let Err(ref err) = result {
            marks.rollback(ctx);
            debug!(
                failed_at = %attempt.phase(),
                signer = %request.maker.signer,
                error = %err,
                "settlement attempt rolled back"
            );
            attempt.fail();
        }
        result
    }

    fn settle(
        &self,
        ctx: &mut SettlementContext<'_>,
        attempt: &mut SettlementAttempt,
        request: &MatchRequest<'_>,
        expected_side: Option<Side>,
        now: i64,
    ) -> Result<SettlementRecord> {
        let maker = request.maker;
        let taker = request.taker;

        // Received -> Validated
        if let Some(expected) = expected_side {
            if maker.side != expected {
                return Err(AgoraError::SideInvalid {
                    expected,
                    actual: maker.side,
                });
            }
        }
        self.validator
            .validate(maker, ctx.strategies, ctx.currencies, now)?;
        attempt.advance(AttemptPhase::Validated)?;

        // -> SignatureVerified
        ctx.verifier.verify(maker, request.signature)?;
        attempt.advance(AttemptPhase::SignatureVerified)?;

        // -> NonceReserved
        if !ctx.nonces.is_valid(maker.signer, maker) {
            return Err(AgoraError::NonceInvalid {
                signer: maker.signer,
                order_nonce: maker.order_nonce,
            });
        }
        attempt.advance(AttemptPhase::NonceReserved)?;

        // -> Priced
        let row = ctx.strategies.get(maker.strategy_id)?;
        let mut exec_ctx = ExecutionContext::new(self.config.coordinator, now);
        if let Some(oracle) = ctx.oracle {
            exec_ctx = exec_ctx.with_oracle(oracle, self.config.floor_price_max_age_secs);
        }
        let fill = self.executor.execute(row.kind, taker, maker, &exec_ctx)?;
        attempt.advance(AttemptPhase::Priced)?;

        // -> FeesComputed
        let creator = ctx
            .royalties
            .creator_fee_for(maker.collection, &fill.item_ids, fill.price)?;
        let affiliate_rate_bp = request.affiliate.map_or(0, |a| ctx.affiliates.rate_bp(a));
        let split = fees::compute_split(
            fill.price,
            row,
            creator.map_or(0, |c| c.fee_bp),
            self.config.max_creator_fee_bp,
            affiliate_rate_bp,
        )?;
        attempt.advance(AttemptPhase::FeesComputed)?;

        // Asset flow runs seller -> buyer; payment legs run buyer -> payees
        let (seller, buyer) = match maker.side {
            Side::Ask => (maker.signer, taker.recipient),
            Side::Bid => (taker.recipient, maker.signer),
        };

        // -> AssetsTransferred
        ctx.custody.transfer(
            maker.collection,
            maker.asset_kind,
            seller,
            buyer,
            &fill.item_ids,
            &fill.amounts,
        )?;
        attempt.advance(AttemptPhase::AssetsTransferred)?;

        // -> PaymentTransferred, waterfall order: seller, creator,
        //    protocol, affiliate
        if split.seller_amount > 0 {
            ctx.vault
                .transfer(maker.currency, buyer, seller, split.seller_amount)?;
        }
        if let Some(c) = creator {
            if split.creator_amount > 0 {
                ctx.vault
                    .transfer(maker.currency, buyer, c.recipient, split.creator_amount)?;
            }
        }
        if split.protocol_amount > 0 {
            ctx.vault.transfer(
                maker.currency,
                buyer,
                self.config.protocol_fee_recipient,
                split.protocol_amount,
            )?;
        }
        if let Some(affiliate) = request.affiliate {
            if split.affiliate_amount > 0 {
                ctx.vault
                    .transfer(maker.currency, buyer, affiliate, split.affiliate_amount)?;
            }
        }
        attempt.advance(AttemptPhase::PaymentTransferred)?;

        // -> NonceConsumed
        ctx.nonces.consume(maker.signer, maker.order_nonce)?;
        attempt.advance(AttemptPhase::NonceConsumed)?;

        // -> Recorded
        let record = SettlementRecord {
            id: SettlementId::deterministic(&maker.signer, maker.order_nonce),
            side: maker.side,
            signer: maker.signer,
            taker: taker.recipient,
            collection: maker.collection,
            currency: maker.currency,
            strategy_id: maker.strategy_id,
            order_nonce: maker.order_nonce,
            item_ids: fill.item_ids,
            amounts: fill.amounts,
            price: fill.price,
            seller: FeePayout::new(seller, split.seller_amount),
            creator: creator
                .filter(|_| split.creator_amount > 0)
                .map(|c| FeePayout::new(c.recipient, split.creator_amount)),
            protocol: FeePayout::new(self.config.protocol_fee_recipient, split.protocol_amount),
            affiliate: request
                .affiliate
                .filter(|_| split.affiliate_amount > 0)
                .map(|a| FeePayout::new(a, split.affiliate_amount)),
            executed_at: DateTime::from_timestamp(now, 0).unwrap_or_default(),
        };
        attempt.advance(AttemptPhase::Recorded)?;
        debug!(
            id = %record.id,
            side = %record.side,
            price = record.price,
            strategy = %record.strategy_id,
            "settlement recorded"
        );
        Ok(record)
    }
}
