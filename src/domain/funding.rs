//! Liquidity math: pool tokens minted, per-outcome send-backs, withdrawals.
//!
//! When funds are added to an unbalanced pool, only the most-held outcome
//! absorbs the full amount; the other outcomes' surplus shares are sent back
//! to the funder so the pool's prices do not move.

use alloy_primitives::U256;
use serde::Serialize;

/// Per-outcome amounts sent back to a liquidity provider.
///
/// At least one entry is zero (the maximally held outcome) and none are
/// negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundingAllocation(Vec<U256>);

impl FundingAllocation {
    /// Per-outcome amounts, in outcome order.
    #[must_use]
    pub fn amounts(&self) -> &[U256] {
        &self.0
    }

    /// Consume into the raw vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<U256> {
        self.0
    }

    /// True when no outcome receives anything back.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.0.iter().all(|a| a.is_zero())
    }
}

fn max_of(values: &[U256]) -> U256 {
    values.iter().copied().max().unwrap_or(U256::ZERO)
}

fn send_back(funds: U256, weights: &[U256]) -> FundingAllocation {
    let max = max_of(weights);
    if max.is_zero() {
        return FundingAllocation(vec![U256::ZERO; weights.len()]);
    }
    FundingAllocation(
        weights
            .iter()
            .map(|w| funds - funds * *w / max)
            .collect(),
    )
}

/// Pool tokens minted for `funds_added`.
///
/// The first deposit mints one pool token per unit of collateral; later
/// deposits scale by the existing supply over the largest holding.
#[must_use]
pub fn calc_pool_tokens(funds_added: U256, holdings: &[U256], pool_supply: U256) -> U256 {
    if pool_supply.is_zero() {
        return funds_added;
    }
    let max = max_of(holdings);
    if max.is_zero() {
        return funds_added;
    }
    funds_added * pool_supply / max
}

/// Outcome shares returned per outcome when burning `shares_to_burn` pool tokens.
#[must_use]
pub fn calc_remove_funding_send_amounts(
    shares_to_burn: U256,
    holdings: &[U256],
    pool_supply: U256,
) -> Vec<U256> {
    holdings
        .iter()
        .map(|h| {
            if pool_supply.is_zero() {
                U256::ZERO
            } else {
                *h * shares_to_burn / pool_supply
            }
        })
        .collect()
}

/// Collateral recoverable by merging the outcome shares returned for
/// `shares_to_burn` pool tokens: the smallest per-outcome amount.
#[must_use]
pub fn calc_deposited_tokens(shares_to_burn: U256, holdings: &[U256], pool_supply: U256) -> U256 {
    calc_remove_funding_send_amounts(shares_to_burn, holdings, pool_supply)
        .into_iter()
        .min()
        .unwrap_or(U256::ZERO)
}

/// Outcome shares sent back when adding `funds_added` to an existing pool.
///
/// Returns `None` when the pool has no supply or no holdings yet, in which
/// case adding funding needs a distribution hint instead.
#[must_use]
pub fn calc_add_funding_send_amounts(
    funds_added: U256,
    holdings: &[U256],
    pool_supply: U256,
) -> Option<FundingAllocation> {
    if pool_supply.is_zero() || max_of(holdings).is_zero() {
        return None;
    }
    Some(send_back(funds_added, holdings))
}

/// Outcome shares sent back when seeding a new pool with `funds_added`
/// according to `distribution_hint`.
#[must_use]
pub fn calc_initial_funding_send_amounts(
    funds_added: U256,
    distribution_hint: &[U256],
) -> FundingAllocation {
    send_back(funds_added, distribution_hint)
}
