use clap::Parser;

use ctfpipe::adapter::inbound::cli::command::Cli;
use ctfpipe::adapter::inbound::cli::output;
use ctfpipe::adapter::inbound::cli::run::run;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
