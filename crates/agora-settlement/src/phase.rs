//! Settlement attempt lifecycle.
//!
//! One attempt walks a fixed phase sequence; any abort sends it to the
//! single terminal `Failed` state. The tracker rejects out-of-order
//! jumps, so a reordered engine step surfaces as an internal error
//! instead of a silent skipped check.

use agora_types::{AgoraError, Result};
use serde::{Deserialize, Serialize};

/// Phases of one settlement attempt, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptPhase {
    Received,
    Validated,
    SignatureVerified,
    NonceReserved,
    Priced,
    FeesComputed,
    AssetsTransferred,
    PaymentTransferred,
    NonceConsumed,
    Recorded,
    Failed,
}

impl AttemptPhase {
    /// The phase that follows in a successful attempt.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Validated),
            Self::Validated => Some(Self::SignatureVerified),
            Self::SignatureVerified => Some(Self::NonceReserved),
            Self::NonceReserved => Some(Self::Priced),
            Self::Priced => Some(Self::FeesComputed),
            Self::FeesComputed => Some(Self::AssetsTransferred),
            Self::AssetsTransferred => Some(Self::PaymentTransferred),
            Self::PaymentTransferred => Some(Self::NonceConsumed),
            Self::NonceConsumed => Some(Self::Recorded),
            Self::Recorded | Self::Failed => None,
        }
    }

    /// Legal transitions: one step forward, or any live phase to `Failed`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        if target == Self::Failed {
            return !matches!(self, Self::Recorded | Self::Failed);
        }
        self.next() == Some(target)
    }

    /// Terminal phases accept no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Recorded | Self::Failed)
    }
}

impl std::fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Received => "RECEIVED",
            Self::Validated => "VALIDATED",
            Self::SignatureVerified => "SIGNATURE_VERIFIED",
            Self::NonceReserved => "NONCE_RESERVED",
            Self::Priced => "PRICED",
            Self::FeesComputed => "FEES_COMPUTED",
            Self::AssetsTransferred => "ASSETS_TRANSFERRED",
            Self::PaymentTransferred => "PAYMENT_TRANSFERRED",
            Self::NonceConsumed => "NONCE_CONSUMED",
            Self::Recorded => "RECORDED",
            Self::Failed => "FAILED",
        };
        write!(f, "{name}")
    }
}

/// Phase tracker for one attempt.
#[derive(Debug)]
pub struct SettlementAttempt {
    phase: AttemptPhase,
}

impl SettlementAttempt {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: AttemptPhase::Received,
        }
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    /// Advance to `target`, rejecting out-of-order jumps.
    pub fn advance(&mut self, target: AttemptPhase) -> Result<()> {
        if !self.phase.can_transition_to(target) {
            return Err(AgoraError::Internal(format!(
                "illegal settlement phase transition {} -> {target}",
                self.phase
            )));
        }
        self.phase = target;
        Ok(())
    }

    /// Mark the attempt failed, from any live phase.
    pub fn fail(&mut self) {
        if self.phase.can_transition_to(AttemptPhase::Failed) {
            self.phase = AttemptPhase::Failed;
        }
    }
}

impl Default for SettlementAttempt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_walk_in_order() {
        let mut attempt = SettlementAttempt::new();
        let phases = [
            AttemptPhase::Validated,
            AttemptPhase::SignatureVerified,
            AttemptPhase::NonceReserved,
            AttemptPhase::Priced,
            AttemptPhase::FeesComputed,
            AttemptPhase::AssetsTransferred,
            AttemptPhase::PaymentTransferred,
            AttemptPhase::NonceConsumed,
            AttemptPhase::Recorded,
        ];
        for phase in phases {
            attempt.advance(phase).unwrap();
        }
        assert_eq!(attempt.phase(), AttemptPhase::Recorded);
        assert!(attempt.phase().is_terminal());
    }

    #[test]
    fn skipping_a_phase_rejected() {
        let mut attempt = SettlementAttempt::new();
        attempt.advance(AttemptPhase::Validated).unwrap();
        let err = attempt.advance(AttemptPhase::NonceReserved).unwrap_err();
        assert!(matches!(err, AgoraError::Internal(_)));
    }

    #[test]
    fn any_live_phase_can_fail() {
        for target in [
            AttemptPhase::Received,
            AttemptPhase::NonceReserved,
            AttemptPhase::PaymentTransferred,
        ] {
            assert!(target.can_transition_to(AttemptPhase::Failed), "{target}");
        }
    }

    #[test]
    fn terminal_phases_are_final() {
        assert!(!AttemptPhase::Recorded.can_transition_to(AttemptPhase::Failed));
        assert!(!AttemptPhase::Failed.can_transition_to(AttemptPhase::Failed));
        assert_eq!(AttemptPhase::Failed.next(), None);

        let mut attempt = SettlementAttempt::new();
        for phase in [
            AttemptPhase::Validated,
            AttemptPhase::SignatureVerified,
            AttemptPhase::NonceReserved,
            AttemptPhase::Priced,
            AttemptPhase::FeesComputed,
            AttemptPhase::AssetsTransferred,
            AttemptPhase::PaymentTransferred,
            AttemptPhase::NonceConsumed,
            AttemptPhase::Recorded,
        ] {
            attempt.advance(phase).unwrap();
        }
        attempt.fail();
        assert_eq!(attempt.phase(), AttemptPhase::Recorded, "recorded never fails");
    }

    #[test]
    fn fail_from_mid_flight() {
        let mut attempt = SettlementAttempt::new();
        attempt.advance(AttemptPhase::Validated).unwrap();
        attempt.fail();
        assert_eq!(attempt.phase(), AttemptPhase::Failed);
    }

    #[test]
    fn backwards_transition_rejected() {
        let mut attempt = SettlementAttempt::new();
        attempt.advance(AttemptPhase::Validated).unwrap();
        attempt.advance(AttemptPhase::SignatureVerified).unwrap();
        assert!(attempt.advance(AttemptPhase::Validated).is_err());
    }
}
