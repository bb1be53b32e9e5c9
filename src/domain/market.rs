//! Market definitions used when creating and resolving markets.

use alloy_primitives::{Address, B256, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::pricing::{calc_distribution_hint, scalar_odds};
use super::token::Token;

/// Realitio template for single-select questions (binary and categorical).
pub const SINGLE_SELECT_TEMPLATE: u64 = 2;

/// Realitio template for unsigned integer answers (scalar markets).
pub const UINT_TEMPLATE: u64 = 1;

/// Range of a scalar market and the value it opens at.
///
/// Only constructible through [`ScalarBounds::try_new`], so any instance
/// satisfies `lower < upper` and `lower <= starting_point <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScalarBounds {
    lower: U256,
    upper: U256,
    starting_point: U256,
}

impl ScalarBounds {
    /// Validate and build scalar bounds.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidBounds`] when the range is empty or the
    /// starting point lies outside it.
    pub fn try_new(lower: U256, upper: U256, starting_point: U256) -> Result<Self, DomainError> {
        if lower >= upper {
            return Err(DomainError::InvalidBounds {
                reason: format!("lower bound {lower} must be below upper bound {upper}"),
            });
        }
        if starting_point < lower || starting_point > upper {
            return Err(DomainError::InvalidBounds {
                reason: format!("starting point {starting_point} outside [{lower}, {upper}]"),
            });
        }
        Ok(Self {
            lower,
            upper,
            starting_point,
        })
    }

    #[must_use]
    pub const fn lower(&self) -> U256 {
        self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> U256 {
        self.upper
    }

    #[must_use]
    pub const fn starting_point(&self) -> U256 {
        self.starting_point
    }
}

/// Outcome space of a market.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketKind {
    /// Binary or categorical market with one outcome per answer.
    Categorical {
        outcomes: Vec<String>,
        /// Initial odds in percent, one per outcome.
        odds: Vec<f64>,
    },
    /// Range-valued market settled between two bounds.
    Scalar { unit: String, bounds: ScalarBounds },
}

/// Everything needed to create a market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketData {
    pub question: String,
    pub category: String,
    pub language: String,
    pub arbitrator: Address,
    /// Unix timestamp at which the question opens for answers.
    pub opening_ts: u32,
    /// Seconds an answer must stand unchallenged.
    pub timeout: u32,
    pub collateral: Token,
    pub funding: U256,
    /// Liquidity provider fee as a fraction.
    pub fee: Decimal,
    pub kind: MarketKind,
    /// Realitio question nonce.
    pub nonce: U256,
    /// Salt for the deterministic market maker address; random when absent.
    pub salt_nonce: Option<U256>,
}

impl MarketData {
    /// Check outcome and odds consistency.
    ///
    /// # Errors
    ///
    /// [`DomainError::EmptyOutcomes`] with fewer than two outcomes and
    /// [`DomainError::InvalidOdds`] when odds do not match the outcomes.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let MarketKind::Categorical { outcomes, odds } = &self.kind {
            if outcomes.len() < 2 {
                return Err(DomainError::EmptyOutcomes {
                    count: outcomes.len(),
                });
            }
            if odds.len() != outcomes.len() {
                return Err(DomainError::InvalidOdds {
                    reason: format!("{} odds for {} outcomes", odds.len(), outcomes.len()),
                });
            }
            let total: f64 = odds.iter().sum();
            if (total - 100.0).abs() > 0.01 {
                return Err(DomainError::InvalidOdds {
                    reason: format!("odds must sum to 100, got {total}"),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self.kind, MarketKind::Scalar { .. })
    }

    /// Number of outcome slots in the condition.
    #[must_use]
    pub fn outcome_slot_count(&self) -> usize {
        match &self.kind {
            MarketKind::Categorical { outcomes, .. } => outcomes.len(),
            MarketKind::Scalar { .. } => 2,
        }
    }

    #[must_use]
    pub const fn template_id(&self) -> u64 {
        match self.kind {
            MarketKind::Categorical { .. } => SINGLE_SELECT_TEMPLATE,
            MarketKind::Scalar { .. } => UINT_TEMPLATE,
        }
    }

    /// Scalar bounds, if this is a scalar market.
    #[must_use]
    pub const fn bounds(&self) -> Option<&ScalarBounds> {
        match &self.kind {
            MarketKind::Scalar { bounds, .. } => Some(bounds),
            MarketKind::Categorical { .. } => None,
        }
    }

    /// Funding distribution hint seeding the market's initial odds.
    ///
    /// # Errors
    ///
    /// Propagates [`calc_distribution_hint`] errors.
    pub fn distribution_hint(&self) -> Result<Vec<U256>, DomainError> {
        match &self.kind {
            MarketKind::Categorical { odds, .. } => calc_distribution_hint(odds),
            MarketKind::Scalar { bounds, .. } => {
                let odds = scalar_odds(bounds.lower, bounds.upper, bounds.starting_point);
                if odds.iter().any(|o| *o <= 0.0) {
                    // Starting at a bound cannot be expressed as a hint.
                    return Ok(Vec::new());
                }
                calc_distribution_hint(&odds)
            }
        }
    }
}

/// A Realitio question backing an existing market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: B256,
    pub template_id: u64,
    /// Encoded question text as submitted to Realitio.
    pub raw: String,
    pub outcome_count: usize,
}

/// Answer history needed to claim Realitio winnings, newest entry first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimHistory {
    pub history_hashes: Vec<B256>,
    pub answerers: Vec<Address>,
    pub bonds: Vec<U256>,
    pub answers: Vec<B256>,
}

impl ClaimHistory {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market(kind: MarketKind) -> MarketData {
        MarketData {
            question: "Will it rain?".into(),
            category: "weather".into(),
            language: "en_US".into(),
            arbitrator: Address::repeat_byte(9),
            opening_ts: 1_700_000_000,
            timeout: 86_400,
            collateral: Token::native("ETH"),
            funding: U256::from(1_000),
            fee: dec!(0.02),
            kind,
            nonce: U256::ZERO,
            salt_nonce: None,
        }
    }

    #[test]
    fn bounds_reject_empty_range() {
        let err = ScalarBounds::try_new(U256::from(10), U256::from(10), U256::from(10));
        assert!(matches!(err, Err(DomainError::InvalidBounds { .. })));
    }

    #[test]
    fn bounds_reject_starting_point_outside_range() {
        assert!(ScalarBounds::try_new(U256::from(0), U256::from(10), U256::from(11)).is_err());
        assert!(ScalarBounds::try_new(U256::from(5), U256::from(10), U256::from(4)).is_err());
        assert!(ScalarBounds::try_new(U256::from(5), U256::from(10), U256::from(5)).is_ok());
    }

    #[test]
    fn categorical_needs_matching_odds() {
        let data = market(MarketKind::Categorical {
            outcomes: vec!["Yes".into(), "No".into()],
            odds: vec![100.0],
        });
        assert!(matches!(data.validate(), Err(DomainError::InvalidOdds { .. })));

        let single = market(MarketKind::Categorical {
            outcomes: vec!["Yes".into()],
            odds: vec![100.0],
        });
        assert!(matches!(single.validate(), Err(DomainError::EmptyOutcomes { count: 1 })));
    }

    #[test]
    fn scalar_market_has_two_slots_and_uint_template() {
        let bounds = ScalarBounds::try_new(U256::ZERO, U256::from(100), U256::from(50)).unwrap();
        let data = market(MarketKind::Scalar {
            unit: "USD".into(),
            bounds,
        });
        assert!(data.is_scalar());
        assert_eq!(data.outcome_slot_count(), 2);
        assert_eq!(data.template_id(), UINT_TEMPLATE);
        assert!(data.distribution_hint().unwrap().is_empty());
    }

    #[test]
    fn uneven_odds_produce_a_hint() {
        let data = market(MarketKind::Categorical {
            outcomes: vec!["Yes".into(), "No".into()],
            odds: vec![60.0, 40.0],
        });
        data.validate().unwrap();
        assert_eq!(data.distribution_hint().unwrap().len(), 2);
    }
}
