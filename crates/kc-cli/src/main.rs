//! `kc`: command-line client for the Kafka Connect REST API.
//!
//! Every command prints JSON on stdout. Commands that take a connector name
//! also accept `--all-connectors`, `--connector-pattern` and `--state` to act
//! on every matching connector, printing one result per connector.
//!
//! Exit codes: 0 on success, 1 when the operation failed (including a 409 on
//! create/update and any failed connector in a bulk command), 2 on usage errors.

#![forbid(unsafe_code)]

mod args;
mod commands;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use kc_client::ConnectClient;

/// A command-line client for the Kafka Connect REST API.
#[derive(Parser)]
#[command(name = "kc")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: args::GlobalArgs,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(&cli.global.log_level);

    match execute(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<bool> {
    let client = ConnectClient::from_config(&cli.global.connect_config())?;
    let output = commands::run(cli.command, &client).await?;
    output::print(&output)?;
    Ok(output.is_success())
}
