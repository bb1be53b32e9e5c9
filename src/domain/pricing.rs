//! Outcome prices, trade costs and initial distribution hints.
//!
//! Prices are derived from the market maker's outcome holdings: the scarcer
//! an outcome is in the pool, the more expensive it is. These functions are
//! pure and never touch the chain.

use alloy_primitives::U256;

use super::error::DomainError;
use super::fixed::to_f64;

/// Scale applied to distribution hints before rounding to integers.
pub const DISTRIBUTION_HINT_SCALE: f64 = 1_000_000.0;

/// Compute the marginal price of every outcome from the pool holdings.
///
/// The price of outcome `i` is `(1 / h_i) / Σ_j (1 / h_j)`, so prices always
/// sum to one. For two outcomes this is the other outcome's holding over the
/// total holding.
///
/// All-zero holdings yield all-zero prices. When only some holdings are
/// zero, those outcomes share the whole price mass.
#[must_use]
pub fn calc_price(holdings: &[U256]) -> Vec<f64> {
    if holdings.iter().all(|h| h.is_zero()) {
        return vec![0.0; holdings.len()];
    }

    let empty = holdings.iter().filter(|h| h.is_zero()).count();
    if empty > 0 {
        let share = 1.0 / empty as f64;
        return holdings
            .iter()
            .map(|h| if h.is_zero() { share } else { 0.0 })
            .collect();
    }

    // Normalise by the largest holding so the reciprocals stay well scaled.
    let max = holdings.iter().copied().max().map(to_f64).unwrap_or(1.0);
    let inverses: Vec<f64> = holdings.iter().map(|h| max / to_f64(*h)).collect();
    let total: f64 = inverses.iter().sum();

    inverses.into_iter().map(|inv| inv / total).collect()
}

/// Cost in collateral of trading `trade_a` and `trade_b` shares of a two
/// outcome market funded with `funding` at prices `price_a` and `price_b`.
///
/// Uses the logarithmic market scoring rule with liquidity
/// `b = funding / ln 2`. The result is floored.
#[must_use]
pub fn calc_net_cost(
    funding: U256,
    price_a: f64,
    trade_a: U256,
    price_b: f64,
    trade_b: U256,
) -> U256 {
    let funding = to_f64(funding);
    if funding <= 0.0 {
        return U256::ZERO;
    }
    let liquidity = funding / std::f64::consts::LN_2;

    let exp_a = to_f64(trade_a) / liquidity;
    let exp_b = to_f64(trade_b) / liquidity;
    let max = exp_a.max(exp_b);

    let sum = price_a * (exp_a - max).exp() + price_b * (exp_b - max).exp();
    let cost = liquidity * (max + sum.ln());

    if !cost.is_finite() || cost <= 0.0 {
        return U256::ZERO;
    }
    float_to_u256(cost.floor())
}

/// Convert desired initial odds (percentages) into a funding distribution hint.
///
/// `hint_i = round(1e6 * sqrt(Π odds) / odds_i)`, evaluated in log space so
/// many outcomes do not overflow. Returns an empty vector when every outcome
/// has the same odds, meaning a uniform distribution needs no hint.
///
/// # Errors
///
/// Returns [`DomainError::EmptyOutcomes`] for fewer than two odds and
/// [`DomainError::InvalidOdds`] for non-positive or non-finite odds.
pub fn calc_distribution_hint(odds: &[f64]) -> Result<Vec<U256>, DomainError> {
    if odds.len() < 2 {
        return Err(DomainError::EmptyOutcomes { count: odds.len() });
    }
    if let Some(bad) = odds.iter().find(|o| !o.is_finite() || **o <= 0.0) {
        return Err(DomainError::InvalidOdds {
            reason: format!("odds must be positive, got {bad}"),
        });
    }

    let first = odds[0];
    if odds.iter().all(|o| *o == first) {
        return Ok(Vec::new());
    }

    let half_log_product: f64 = odds.iter().map(|o| o.ln()).sum::<f64>() / 2.0;

    Ok(odds
        .iter()
        .map(|o| {
            let hint = DISTRIBUTION_HINT_SCALE * (half_log_product - o.ln()).exp();
            float_to_u256(hint.round())
        })
        .collect())
}

/// Derive categorical odds for a scalar market from its starting point.
///
/// The first outcome is the lower bound, the second the upper bound; the
/// closer the starting point sits to a bound, the more likely that bound.
#[must_use]
pub fn scalar_odds(lower: U256, upper: U256, starting_point: U256) -> [f64; 2] {
    let range = to_f64(upper - lower);
    let upper_weight = to_f64(starting_point - lower) / range * 100.0;
    [100.0 - upper_weight, upper_weight]
}

fn float_to_u256(value: f64) -> U256 {
    if value <= 0.0 || !value.is_finite() {
        return U256::ZERO;
    }
    if value < u128::MAX as f64 {
        return U256::from(value as u128);
    }
    // Beyond u128: split into high and low halves.
    let high = (value / 2f64.powi(128)).floor();
    let low = value - high * 2f64.powi(128);
    (U256::from(high as u128) << 128) + U256::from(low.max(0.0) as u128)
}
