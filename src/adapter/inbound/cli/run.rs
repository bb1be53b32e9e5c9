//! Command dispatch.

use super::command::{
    Cli, ColorChoice, Commands, ConfigCommand, FundingCommand, ProxyCommand, QuoteCommand,
};
use super::output::{self, OutputConfig};
use super::{config, math, proxy, trade};
use crate::error::Result;

fn apply_color(choice: &ColorChoice) {
    match choice {
        ColorChoice::Auto => owo_colors::unset_override(),
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Apply global flags and run the selected command.
///
/// # Errors
///
/// Returns the command's error; the caller prints it and sets the exit code.
pub async fn run(cli: Cli) -> Result<()> {
    apply_color(&cli.color);
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    match &cli.command {
        Commands::Price(args) => math::price(args),
        Commands::NetCost(args) => math::net_cost(args),
        Commands::Hint(args) => math::hint(args),
        Commands::Quote(QuoteCommand::Buy(args)) => math::buy_quote(args),
        Commands::Quote(QuoteCommand::Sell(args)) => math::sell_quote(args),
        Commands::Funding(FundingCommand::Add(args)) => math::funding_add(args),
        Commands::Funding(FundingCommand::Initial(args)) => math::funding_initial(args),
        Commands::Funding(FundingCommand::Remove(args)) => math::funding_remove(args),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
        Commands::Proxy(ProxyCommand::Status(args)) => proxy::execute_status(&args.config).await,
        Commands::Proxy(ProxyCommand::Upgrade(args)) => proxy::execute_upgrade(args).await,
        Commands::Buy(args) => trade::execute_buy(args).await,
        Commands::Sell(args) => trade::execute_sell(args).await,
        Commands::AddFunding(args) => trade::execute_add_funding(args).await,
    }
}
