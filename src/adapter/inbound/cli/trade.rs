//! Handlers for the live `buy`, `sell` and `add-funding` commands.

use alloy_primitives::Address;
use tracing::info;

use super::batch::{show_outcome, show_plan};
use super::command::{AddFundingArgs, BuyArgs, SellArgs};
use super::{config, output};
use crate::application::service::{AddFundingParams, BuyParams, SellParams, TransactionService};
use crate::domain::fixed::to_base_units;
use crate::domain::token::Token;
use crate::error::Result;
use crate::infrastructure::bootstrap::build_service;

async fn collateral(
    service: &TransactionService,
    market: Address,
    native: bool,
    decimals: u8,
) -> Result<Token> {
    if native {
        return Ok(Token::native("native"));
    }
    let address = service.env().chain.market_collateral(market).await?;
    Ok(Token::new(address, "collateral", decimals))
}

pub async fn execute_buy(args: &BuyArgs) -> Result<()> {
    let config = config::load(&args.tx.config)?;
    let service = build_service(&config)?;
    let params = BuyParams {
        amount: to_base_units(args.amount, args.decimals),
        collateral: collateral(&service, args.market, args.native, args.decimals).await?,
        outcome_index: args.outcome,
        market_maker: args.market,
    };
    info!(market = %args.market, outcome = args.outcome, amount = %params.amount, "Buying outcome shares");

    if args.tx.dry_run {
        show_plan("Buy", &service.plan_buy_outcomes(&params).await?);
        return Ok(());
    }
    output::section("Buy");
    let outcome = service.buy_outcomes(&params).await?;
    show_outcome(&outcome);
    Ok(())
}

pub async fn execute_sell(args: &SellArgs) -> Result<()> {
    let config = config::load(&args.tx.config)?;
    let service = build_service(&config)?;
    let params = SellParams {
        amount: to_base_units(args.amount, args.decimals),
        outcome_index: args.outcome,
        market_maker: args.market,
    };
    info!(market = %args.market, outcome = args.outcome, amount = %params.amount, "Selling outcome shares");

    if args.tx.dry_run {
        show_plan("Sell", &service.plan_sell_outcomes(&params).await?);
        return Ok(());
    }
    output::section("Sell");
    let outcome = service.sell_outcomes(&params).await?;
    show_outcome(&outcome);
    Ok(())
}

pub async fn execute_add_funding(args: &AddFundingArgs) -> Result<()> {
    let config = config::load(&args.tx.config)?;
    let service = build_service(&config)?;
    let params = AddFundingParams {
        amount: to_base_units(args.amount, args.decimals),
        collateral: collateral(&service, args.market, args.native, args.decimals).await?,
        market_maker: args.market,
    };
    info!(market = %args.market, amount = %params.amount, "Adding funding");

    if args.tx.dry_run {
        show_plan("Add Funding", &service.plan_add_funding(&params).await?);
        return Ok(());
    }
    output::section("Add Funding");
    let outcome = service.add_funding(&params).await?;
    show_outcome(&outcome);
    Ok(())
}
