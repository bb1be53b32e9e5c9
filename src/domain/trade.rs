//! Fixed product market maker trade math and quotes.
//!
//! The market maker keeps one balance per outcome. Buying with collateral
//! splits it into a full set of outcome shares, returning the chosen
//! outcome's shares to the buyer; selling does the reverse. The product of
//! the balances (net of fees) stays constant.

use alloy_primitives::U256;
use serde::Serialize;

use super::error::DomainError;
use super::fixed::{ceil_div, ONE};
use super::pricing::calc_price;

/// Cost breakdown of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    /// Collateral sent (buy) or received before fees (sell).
    pub gross: U256,
    /// Liquidity provider fee.
    pub fee: U256,
    /// Collateral actually exchanged against the pool.
    pub net: U256,
}

/// Ephemeral quote for a candidate trade. Recomputed whenever the amount changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeQuote {
    /// Outcome shares bought or sold.
    pub traded_shares: U256,
    /// Outcome prices once the trade settles.
    pub prices_after_trade: Vec<f64>,
    /// Where the collateral goes.
    pub cost: CostBreakdown,
}

fn check_fee(fee_wad: U256) -> Result<(), DomainError> {
    if fee_wad >= ONE {
        return Err(DomainError::FeeOutOfRange { fee_wad });
    }
    Ok(())
}

fn check_index(holdings: &[U256], outcome_index: usize) -> Result<(), DomainError> {
    if outcome_index >= holdings.len() {
        return Err(DomainError::IndexOutOfRange {
            index: outcome_index,
            len: holdings.len(),
        });
    }
    Ok(())
}

/// Pool holdings after a buy of `shares_out` for `collateral_in`.
///
/// Every outcome gains `collateral_in` (the collateral is split into a full
/// set) and the traded outcome gives `shares_out` to the buyer.
///
/// # Errors
///
/// [`DomainError::IndexOutOfRange`] if `outcome_index >= holdings.len()` and
/// [`DomainError::Underflow`] if the traded outcome would go negative.
pub fn compute_balance_after_trade(
    holdings: &[U256],
    outcome_index: usize,
    collateral_in: U256,
    shares_out: U256,
) -> Result<Vec<U256>, DomainError> {
    check_index(holdings, outcome_index)?;

    holdings
        .iter()
        .enumerate()
        .map(|(index, holding)| {
            let credited = *holding + collateral_in;
            if index != outcome_index {
                return Ok(credited);
            }
            credited
                .checked_sub(shares_out)
                .ok_or(DomainError::Underflow {
                    index,
                    balance: credited,
                    debit: shares_out,
                })
        })
        .collect()
}

/// Pool holdings after a sell of `shares_in` for `collateral_out`.
///
/// The seller's shares enter the pool, then a full set worth
/// `collateral_out` is merged back into collateral.
///
/// # Errors
///
/// [`DomainError::IndexOutOfRange`] for a bad index and
/// [`DomainError::Underflow`] if any outcome cannot cover the merge.
pub fn compute_balance_after_sell(
    holdings: &[U256],
    outcome_index: usize,
    collateral_out: U256,
    shares_in: U256,
) -> Result<Vec<U256>, DomainError> {
    check_index(holdings, outcome_index)?;

    holdings
        .iter()
        .enumerate()
        .map(|(index, holding)| {
            let balance = if index == outcome_index {
                *holding + shares_in
            } else {
                *holding
            };
            balance
                .checked_sub(collateral_out)
                .ok_or(DomainError::Underflow {
                    index,
                    balance,
                    debit: collateral_out,
                })
        })
        .collect()
}

/// Outcome shares received for `investment` collateral, after the LP fee.
///
/// Mirrors the market maker contract rounding so quotes match on-chain
/// `calcBuyAmount`. Nothing invested buys nothing, even from an empty pool.
///
/// # Errors
///
/// [`DomainError::IndexOutOfRange`] for a bad index and
/// [`DomainError::FeeOutOfRange`] unless `fee_wad < 1e18`.
pub fn calc_buy_amount(
    investment: U256,
    outcome_index: usize,
    holdings: &[U256],
    fee_wad: U256,
) -> Result<U256, DomainError> {
    check_index(holdings, outcome_index)?;
    check_fee(fee_wad)?;

    let net = investment - investment * fee_wad / ONE;
    if net.is_zero() {
        return Ok(U256::ZERO);
    }
    let buy_balance = holdings[outcome_index];
    let mut ending = buy_balance * ONE;

    for (index, balance) in holdings.iter().enumerate() {
        if index != outcome_index {
            ending = ceil_div(ending * *balance, *balance + net);
        }
    }

    Ok((buy_balance + net).saturating_sub(ceil_div(ending, ONE)))
}

/// Outcome shares that must be sold to receive `return_amount` collateral.
///
/// Returns `None` when the pool cannot pay `return_amount` plus fees.
///
/// # Errors
///
/// [`DomainError::IndexOutOfRange`] for a bad index and
/// [`DomainError::FeeOutOfRange`] unless `fee_wad < 1e18`.
pub fn calc_sell_amount(
    return_amount: U256,
    outcome_index: usize,
    holdings: &[U256],
    fee_wad: U256,
) -> Result<Option<U256>, DomainError> {
    check_index(holdings, outcome_index)?;
    check_fee(fee_wad)?;
    let with_fees = return_amount * ONE / (ONE - fee_wad);
    Ok(shares_for_gross_return(with_fees, outcome_index, holdings))
}

fn shares_for_gross_return(
    gross: U256,
    outcome_index: usize,
    holdings: &[U256],
) -> Option<U256> {
    let sell_balance = holdings[outcome_index];
    let mut ending = sell_balance * ONE;

    for (index, balance) in holdings.iter().enumerate() {
        if index == outcome_index {
            continue;
        }
        if *balance <= gross {
            return None;
        }
        ending = ceil_div(ending * *balance, *balance - gross);
    }

    Some((gross + ceil_div(ending, ONE)).saturating_sub(sell_balance))
}

/// Collateral returned for selling `shares` of an outcome.
///
/// Solves the market maker's sell rule for the fee-inclusive return by
/// integer binary search, then deducts the fee. Returns `None` when there
/// are no other outcomes or the pool is empty.
#[must_use]
pub fn calc_sell_amount_in_collateral(
    shares: U256,
    holding: U256,
    other_holdings: &[U256],
    fee_wad: U256,
) -> Option<U256> {
    let min_other = other_holdings.iter().copied().min()?;
    if min_other.is_zero() || fee_wad >= ONE {
        return None;
    }

    let mut holdings = Vec::with_capacity(other_holdings.len() + 1);
    holdings.push(holding);
    holdings.extend_from_slice(other_holdings);

    let mut low = U256::ZERO;
    let mut high = min_other - U256::from(1);
    while low < high {
        let mid = (low + high + U256::from(1)) >> 1;
        match shares_for_gross_return(mid, 0, &holdings) {
            Some(needed) if needed <= shares => low = mid,
            _ => high = mid - U256::from(1),
        }
    }

    Some(low * (ONE - fee_wad) / ONE)
}

/// Quote a buy of `investment` collateral on `outcome_index`.
///
/// # Errors
///
/// [`DomainError::IndexOutOfRange`] for a bad index and
/// [`DomainError::FeeOutOfRange`] unless `fee_wad < 1e18`.
pub fn quote_buy(
    holdings: &[U256],
    outcome_index: usize,
    investment: U256,
    fee_wad: U256,
) -> Result<TradeQuote, DomainError> {
    let shares = calc_buy_amount(investment, outcome_index, holdings, fee_wad)?;
    let fee = investment * fee_wad / ONE;
    let net = investment - fee;
    let after = compute_balance_after_trade(holdings, outcome_index, net, shares)?;

    Ok(TradeQuote {
        traded_shares: shares,
        prices_after_trade: calc_price(&after),
        cost: CostBreakdown {
            gross: investment,
            fee,
            net,
        },
    })
}

/// Quote a sell of `shares` of `outcome_index`.
///
/// Returns `Ok(None)` when the pool cannot absorb the sell.
///
/// # Errors
///
/// [`DomainError::IndexOutOfRange`] for a bad index.
pub fn quote_sell(
    holdings: &[U256],
    outcome_index: usize,
    shares: U256,
    fee_wad: U256,
) -> Result<Option<TradeQuote>, DomainError> {
    check_index(holdings, outcome_index)?;

    let others: Vec<U256> = holdings
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != outcome_index)
        .map(|(_, h)| *h)
        .collect();

    let Some(received) =
        calc_sell_amount_in_collateral(shares, holdings[outcome_index], &others, fee_wad)
    else {
        return Ok(None);
    };

    let gross = received * ONE / (ONE - fee_wad);
    let after = compute_balance_after_sell(holdings, outcome_index, gross, shares)?;

    Ok(Some(TradeQuote {
        traded_shares: shares,
        prices_after_trade: calc_price(&after),
        cost: CostBreakdown {
            gross,
            fee: gross - received,
            net: received,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixed::div_u256;

    fn u(values: &[u64]) -> Vec<U256> {
        values.iter().map(|v| U256::from(*v)).collect()
    }

    fn big(value: &str) -> U256 {
        value.parse().unwrap()
    }

    const ONE_PERCENT: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

    #[test]
    fn balance_after_trade_matches_reference() {
        let cases: [(&[u64], usize, u64, u64, &[u64]); 3] = [
            (&[100, 100], 0, 50, 100, &[50, 150]),
            (&[100, 100], 1, 50, 100, &[150, 50]),
            (&[100, 100, 100], 2, 50, 100, &[150, 150, 50]),
        ];

        for (holdings, index, collateral, shares, expected) in cases {
            let result = compute_balance_after_trade(
                &u(holdings),
                index,
                U256::from(collateral),
                U256::from(shares),
            )
            .unwrap();
            assert_eq!(result, u(expected));
        }
    }

    #[test]
    fn balance_after_trade_rejects_out_of_range_index() {
        let holdings = u(&[100, 100, 100]);
        for index in [3, 10] {
            let result =
                compute_balance_after_trade(&holdings, index, U256::from(50), U256::from(100));
            assert_eq!(
                result,
                Err(DomainError::IndexOutOfRange { index, len: 3 })
            );
        }
    }

    #[test]
    fn balance_after_trade_reports_underflow() {
        let result = compute_balance_after_trade(&u(&[10, 10]), 0, U256::from(5), U256::from(100));
        assert!(matches!(result, Err(DomainError::Underflow { index: 0, .. })));
    }

    #[test]
    fn balance_after_sell_merges_collateral() {
        let result =
            compute_balance_after_sell(&u(&[100, 100]), 0, U256::from(40), U256::from(90)).unwrap();
        assert_eq!(result, u(&[150, 60]));
    }

    #[test]
    fn sell_amount_in_collateral_matches_reference() {
        let cases: [(&str, &str, &[&str], &str); 6] = [
            (
                "669745046301742827",
                "502512562814070351",
                &["2000000000000000000"],
                "496532989893612286",
            ),
            (
                "365128583991411574",
                "1502512562814070351",
                &["673378000740715800"],
                "100000000000000000",
            ),
            (
                "148526984259244846",
                "673378000740715800",
                &["1502512562814070351"],
                "99336468831519624",
            ),
            (
                "169611024591650211",
                "299279122636316870",
                &["1500000000000000000", "1500000000000000000", "1500000000000000000"],
                "99437054864518193",
            ),
            (
                "18399816000000000000",
                "139733493703807763",
                &["11009048601975904608", "17551468438676294710"],
                "10381992534881175324",
            ),
            ("200000", "100000", &["100000", "100000"], "37815"),
        ];

        for (shares, holding, others, expected) in cases {
            let others: Vec<U256> = others.iter().map(|o| big(o)).collect();
            let result =
                calc_sell_amount_in_collateral(big(shares), big(holding), &others, ONE_PERCENT)
                    .expect("a solution exists");
            let ratio = div_u256(result, big(expected));
            assert!((ratio - 1.0).abs() < 0.01, "ratio {ratio} for {expected}");
        }
    }

    #[test]
    fn sell_amount_in_collateral_needs_other_outcomes() {
        assert_eq!(
            calc_sell_amount_in_collateral(U256::from(10), U256::from(10), &[], ONE_PERCENT),
            None
        );
        assert_eq!(
            calc_sell_amount_in_collateral(U256::from(10), U256::from(10), &[U256::ZERO], ONE_PERCENT),
            None
        );
    }

    #[test]
    fn buy_then_sell_round_trips_through_the_pool() {
        let holdings = vec![big("1000000000000000000"), big("1000000000000000000")];
        let investment = big("100000000000000000");
        let shares = calc_buy_amount(investment, 0, &holdings, ONE_PERCENT).unwrap();
        assert!(shares > investment);

        let quote = quote_buy(&holdings, 0, investment, ONE_PERCENT).unwrap();
        assert_eq!(quote.traded_shares, shares);
        assert!(quote.prices_after_trade[0] > 0.5);
        assert_eq!(quote.cost.fee, big("1000000000000000"));

        let needed = calc_sell_amount(quote.cost.net / U256::from(2), 1, &holdings, ONE_PERCENT)
            .unwrap()
            .unwrap();
        assert!(needed > U256::ZERO);
    }

    #[test]
    fn sell_quote_lowers_the_sold_outcome_price() {
        let holdings = vec![big("1000000000000000000"), big("1000000000000000000")];
        let quote = quote_sell(&holdings, 0, big("200000000000000000"), ONE_PERCENT)
            .unwrap()
            .unwrap();
        assert!(quote.prices_after_trade[0] < 0.5);
        assert_eq!(quote.cost.gross - quote.cost.fee, quote.cost.net);
    }

    #[test]
    fn empty_investment_buys_nothing_from_an_empty_pool() {
        assert_eq!(calc_buy_amount(U256::ZERO, 0, &u(&[0, 0]), U256::ZERO), Ok(U256::ZERO));
        assert_eq!(calc_buy_amount(U256::ZERO, 1, &u(&[100, 0, 50]), ONE_PERCENT), Ok(U256::ZERO));

        let quote = quote_buy(&u(&[0, 0]), 0, U256::ZERO, U256::ZERO).unwrap();
        assert_eq!(quote.traded_shares, U256::ZERO);
        assert_eq!(quote.cost.net, U256::ZERO);
    }

    #[test]
    fn investment_into_a_drained_outcome_still_quotes() {
        let shares = calc_buy_amount(U256::from(10), 0, &u(&[100, 0]), U256::ZERO).unwrap();
        assert_eq!(shares, U256::from(110));
    }

    #[test]
    fn whole_or_larger_fee_is_rejected() {
        let holdings = u(&[100, 100]);
        for fee_wad in [ONE, ONE + U256::from(1)] {
            assert_eq!(
                calc_buy_amount(U256::from(10), 0, &holdings, fee_wad),
                Err(DomainError::FeeOutOfRange { fee_wad })
            );
            assert_eq!(
                calc_sell_amount(U256::from(10), 0, &holdings, fee_wad),
                Err(DomainError::FeeOutOfRange { fee_wad })
            );
        }
    }

    #[test]
    fn sell_amount_fails_when_pool_cannot_pay() {
        let result = calc_sell_amount(U256::from(500), 0, &u(&[100, 100]), U256::ZERO).unwrap();
        assert_eq!(result, None);
    }
}
