//! Command-line interface definitions.
//!
//! Offline commands expose the trading math; live commands load the
//! configuration, build the transaction service and run one pipeline.

use std::path::PathBuf;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// Default configuration path, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Conditional-token market transactions from the command line
#[derive(Parser, Debug)]
#[command(name = "ctfpipe")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Marginal outcome prices for pool holdings
    Price(PriceArgs),

    /// LMSR cost of a two-outcome trade
    NetCost(NetCostArgs),

    /// Funding distribution hint for initial odds
    Hint(HintArgs),

    /// Quote a trade against pool holdings
    #[command(subcommand)]
    Quote(QuoteCommand),

    /// Liquidity math
    #[command(subcommand)]
    Funding(FundingCommand),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Inspect or upgrade the proxy account
    #[command(subcommand)]
    Proxy(ProxyCommand),

    /// Buy outcome shares through the proxy
    Buy(BuyArgs),

    /// Sell outcome shares through the proxy
    Sell(SellArgs),

    /// Add liquidity to a market through the proxy
    AddFunding(AddFundingArgs),
}

/// Subcommands for `ctfpipe quote`.
#[derive(Subcommand, Debug)]
pub enum QuoteCommand {
    /// Shares received for an investment, after fees.
    Buy(QuoteArgs),
    /// Collateral received for selling shares, after fees.
    Sell(QuoteArgs),
}

/// Subcommands for `ctfpipe funding`.
#[derive(Subcommand, Debug)]
pub enum FundingCommand {
    /// Pool tokens and returned shares when adding to an existing pool.
    Add(FundingAddArgs),
    /// Returned shares when seeding a new pool with initial odds.
    Initial(FundingInitialArgs),
    /// Shares and mergeable collateral when burning pool tokens.
    Remove(FundingRemoveArgs),
}

/// Subcommands for `ctfpipe config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file.
    Validate(ConfigPathArg),
}

/// Subcommands for `ctfpipe proxy`.
#[derive(Subcommand, Debug)]
pub enum ProxyCommand {
    /// Show deployment, threshold and implementation of the proxy.
    Status(ConfigPathArg),
    /// Point the proxy at the configured implementation.
    Upgrade(TxArgs),
}

#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Options shared by every command that submits a batch.
#[derive(Args, Debug)]
pub struct TxArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Compose and print the batch without submitting it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Pool holdings per outcome, comma separated.
    #[arg(long, value_delimiter = ',', value_parser = parse_u256, required = true)]
    pub holdings: Vec<U256>,
}

#[derive(Args, Debug)]
pub struct NetCostArgs {
    /// Market funding.
    #[arg(long, value_parser = parse_u256)]
    pub funding: U256,
    #[arg(long)]
    pub price_a: f64,
    #[arg(long, value_parser = parse_u256)]
    pub trade_a: U256,
    #[arg(long)]
    pub price_b: f64,
    #[arg(long, value_parser = parse_u256)]
    pub trade_b: U256,
}

#[derive(Args, Debug)]
pub struct HintArgs {
    /// Odds in percent per outcome, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub odds: Vec<f64>,
}

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Pool holdings per outcome, comma separated.
    #[arg(long, value_delimiter = ',', value_parser = parse_u256, required = true)]
    pub holdings: Vec<U256>,

    /// Outcome index being traded.
    #[arg(long)]
    pub outcome: usize,

    /// Investment (buy) or shares (sell) in base units.
    #[arg(long, value_parser = parse_u256)]
    pub amount: U256,

    /// Liquidity provider fee as a fraction.
    #[arg(long, default_value = "0.02")]
    pub fee: Decimal,
}

#[derive(Args, Debug)]
pub struct FundingAddArgs {
    /// Collateral added, in base units.
    #[arg(long, value_parser = parse_u256)]
    pub amount: U256,
    #[arg(long, value_delimiter = ',', value_parser = parse_u256, required = true)]
    pub holdings: Vec<U256>,
    /// Current pool token supply.
    #[arg(long, value_parser = parse_u256)]
    pub supply: U256,
}

#[derive(Args, Debug)]
pub struct FundingInitialArgs {
    #[arg(long, value_parser = parse_u256)]
    pub amount: U256,
    /// Initial odds in percent, comma separated.
    #[arg(long, value_delimiter = ',', required = true)]
    pub odds: Vec<f64>,
}

#[derive(Args, Debug)]
pub struct FundingRemoveArgs {
    /// Pool tokens to burn.
    #[arg(long, value_parser = parse_u256)]
    pub shares: U256,
    #[arg(long, value_delimiter = ',', value_parser = parse_u256, required = true)]
    pub holdings: Vec<U256>,
    #[arg(long, value_parser = parse_u256)]
    pub supply: U256,
}

#[derive(Args, Debug)]
pub struct BuyArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    /// Market maker address.
    #[arg(long, value_parser = parse_address)]
    pub market: Address,

    #[arg(long)]
    pub outcome: usize,

    /// Collateral to invest, in token units.
    #[arg(long)]
    pub amount: Decimal,

    /// Pay with the native asset; it is wrapped inside the batch.
    #[arg(long)]
    pub native: bool,

    /// Collateral decimals.
    #[arg(long, default_value = "18")]
    pub decimals: u8,
}

#[derive(Args, Debug)]
pub struct SellArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    #[arg(long, value_parser = parse_address)]
    pub market: Address,

    #[arg(long)]
    pub outcome: usize,

    /// Collateral to receive, in token units.
    #[arg(long)]
    pub amount: Decimal,

    #[arg(long, default_value = "18")]
    pub decimals: u8,
}

#[derive(Args, Debug)]
pub struct AddFundingArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    #[arg(long, value_parser = parse_address)]
    pub market: Address,

    /// Collateral to add, in token units.
    #[arg(long)]
    pub amount: Decimal,

    #[arg(long)]
    pub native: bool,

    #[arg(long, default_value = "18")]
    pub decimals: u8,
}

fn parse_u256(value: &str) -> Result<U256, String> {
    U256::from_str(value.trim()).map_err(|e| format!("invalid amount '{value}': {e}"))
}

fn parse_address(value: &str) -> Result<Address, String> {
    Address::from_str(value.trim()).map_err(|e| format!("invalid address '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags() {
        let cli = Cli::try_parse_from(["ctfpipe", "--json", "-vv", "hint", "--odds", "60,40"]).unwrap();
        assert!(cli.json);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Hint(HintArgs { ref odds }) if odds == &[60.0, 40.0]));
    }

    #[test]
    fn parses_holdings_list() {
        let cli = Cli::try_parse_from(["ctfpipe", "price", "--holdings", "150,50"]).unwrap();
        let Commands::Price(args) = cli.command else {
            panic!("expected price command");
        };
        assert_eq!(args.holdings, vec![U256::from(150), U256::from(50)]);
    }

    #[test]
    fn quote_fee_defaults_to_two_percent() {
        let cli = Cli::try_parse_from([
            "ctfpipe", "quote", "buy", "--holdings", "100,100", "--outcome", "0", "--amount", "10",
        ])
        .unwrap();
        let Commands::Quote(QuoteCommand::Buy(args)) = cli.command else {
            panic!("expected quote buy");
        };
        assert_eq!(args.fee, Decimal::new(2, 2));
    }

    #[test]
    fn buy_uses_default_config_path() {
        let cli = Cli::try_parse_from([
            "ctfpipe",
            "buy",
            "--market",
            "0x3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a",
            "--outcome",
            "1",
            "--amount",
            "2.5",
            "--native",
            "--dry-run",
        ])
        .unwrap();
        let Commands::Buy(args) = cli.command else {
            panic!("expected buy command");
        };
        assert_eq!(args.tx.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(args.tx.dry_run);
        assert!(args.native);
        assert_eq!(args.market, Address::repeat_byte(0x3a));
    }

    #[test]
    fn rejects_bad_amount() {
        assert!(Cli::try_parse_from(["ctfpipe", "price", "--holdings", "10,abc"]).is_err());
    }
}
