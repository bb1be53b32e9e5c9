//! Handlers for the offline trading math commands.

use alloy_primitives::U256;
use serde_json::json;

use super::command::{
    FundingAddArgs, FundingInitialArgs, FundingRemoveArgs, HintArgs, NetCostArgs, PriceArgs,
    QuoteArgs,
};
use super::output;
use crate::domain::fixed::fee_to_wad;
use crate::domain::funding::{
    calc_add_funding_send_amounts, calc_deposited_tokens, calc_initial_funding_send_amounts,
    calc_pool_tokens, calc_remove_funding_send_amounts,
};
use crate::domain::pricing::{calc_distribution_hint, calc_net_cost, calc_price};
use crate::domain::trade::{quote_buy, quote_sell, TradeQuote};
use crate::error::Result;

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn percentages(prices: &[f64]) -> String {
    prices
        .iter()
        .map(|p| format!("{:.2}%", p * 100.0))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn price(args: &PriceArgs) -> Result<()> {
    let prices = calc_price(&args.holdings);
    if output::is_json() {
        output::result("price", &json!({ "holdings": args.holdings, "prices": prices }));
        return Ok(());
    }

    output::section("Outcome Prices");
    for (index, p) in prices.iter().enumerate() {
        output::field(&format!("Outcome {index}"), format!("{p:.6}"));
    }
    Ok(())
}

pub fn net_cost(args: &NetCostArgs) -> Result<()> {
    let cost = calc_net_cost(args.funding, args.price_a, args.trade_a, args.price_b, args.trade_b);
    if output::is_json() {
        output::result("net_cost", &json!({ "cost": cost }));
        return Ok(());
    }

    output::section("Net Cost");
    output::field("Funding", args.funding);
    output::field("Cost", output::highlight(cost));
    Ok(())
}

pub fn hint(args: &HintArgs) -> Result<()> {
    let hint = calc_distribution_hint(&args.odds)?;
    if output::is_json() {
        output::result("hint", &json!({ "odds": args.odds, "hint": hint }));
        return Ok(());
    }

    output::section("Distribution Hint");
    if hint.is_empty() {
        output::note("Equal odds: no hint needed");
    } else {
        output::field("Hint", join(&hint));
    }
    Ok(())
}

fn print_quote(title: &str, quote: &TradeQuote, shares_label: &str) {
    if output::is_json() {
        output::result("quote", quote);
        return;
    }

    output::section(title);
    output::field(shares_label, output::highlight(quote.traded_shares));
    output::field("Gross", quote.cost.gross);
    output::field("Fee", output::negative(quote.cost.fee));
    output::field("Net", quote.cost.net);
    output::field("Prices after", percentages(&quote.prices_after_trade));
}

pub fn buy_quote(args: &QuoteArgs) -> Result<()> {
    let fee = fee_to_wad(args.fee)?;
    let quote = quote_buy(&args.holdings, args.outcome, args.amount, fee)?;
    print_quote("Buy Quote", &quote, "Shares");
    Ok(())
}

pub fn sell_quote(args: &QuoteArgs) -> Result<()> {
    let fee = fee_to_wad(args.fee)?;
    match quote_sell(&args.holdings, args.outcome, args.amount, fee)? {
        Some(quote) => print_quote("Sell Quote", &quote, "Shares sold"),
        None => output::warning("The pool cannot absorb this sell"),
    }
    Ok(())
}

pub fn funding_add(args: &FundingAddArgs) -> Result<()> {
    let pool_tokens = calc_pool_tokens(args.amount, &args.holdings, args.supply);
    let send_back = calc_add_funding_send_amounts(args.amount, &args.holdings, args.supply)
        .map(|allocation| allocation.into_inner());

    if output::is_json() {
        output::result(
            "funding_add",
            &json!({ "pool_tokens": pool_tokens, "send_back": send_back }),
        );
        return Ok(());
    }

    output::section("Add Funding");
    output::field("Pool tokens", output::highlight(pool_tokens));
    match send_back {
        Some(amounts) => output::field("Shares back", join(&amounts)),
        None => output::note("Pool is empty: seed it with `funding initial`"),
    }
    Ok(())
}

pub fn funding_initial(args: &FundingInitialArgs) -> Result<()> {
    let hint = calc_distribution_hint(&args.odds)?;
    let send_back = if hint.is_empty() {
        vec![U256::ZERO; args.odds.len()]
    } else {
        calc_initial_funding_send_amounts(args.amount, &hint).into_inner()
    };

    if output::is_json() {
        output::result("funding_initial", &json!({ "hint": hint, "send_back": send_back }));
        return Ok(());
    }

    output::section("Initial Funding");
    if !hint.is_empty() {
        output::field("Hint", join(&hint));
    }
    output::field("Shares back", join(&send_back));
    Ok(())
}

pub fn funding_remove(args: &FundingRemoveArgs) -> Result<()> {
    let amounts = calc_remove_funding_send_amounts(args.shares, &args.holdings, args.supply);
    let deposited = calc_deposited_tokens(args.shares, &args.holdings, args.supply);

    if output::is_json() {
        output::result(
            "funding_remove",
            &json!({ "send_amounts": amounts, "collateral": deposited }),
        );
        return Ok(());
    }

    output::section("Remove Funding");
    output::field("Shares out", join(&amounts));
    output::field("Collateral", output::positive(deposited));
    Ok(())
}
