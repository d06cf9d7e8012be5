// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! folio: follow manuscript jobs until they finish

mod color;
mod commands;
mod exit_error;
mod logging;
mod output;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use commands::status::StatusArgs;
use commands::watch::WatchArgs;
use commands::Context;
use exit_error::ExitError;
use folio_engine::EngineConfig;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "folio", version, about = "Follow manuscript jobs until they finish")]
#[command(styles = color::styles())]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    /// Backend base URL (overrides FOLIO_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Directory holding the job record and log (overrides FOLIO_STATE_DIR)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the remembered job and report the decision
    Check,
    /// Follow a job until it completes or fails
    Watch(WatchArgs),
    /// Fetch the current status of a job once
    Status(StatusArgs),
    /// Forget the remembered job
    Abandon,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |e| e.code);
        eprintln!("error: {e:#}");
        std::process::exit(code);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = EngineConfig::from_env_in(cli.state_dir)
        .map_err(|e| ExitError::usage(e.to_string()))?;
    if let Some(server) = cli.server {
        config = config.server_url(server);
    }
    let _log_guard = logging::init(&config);
    tracing::debug!(server = %config.server_url, state_dir = %config.state_dir.display(), "folio starting");

    let ctx = Context::new(config, cli.output);
    match command {
        Command::Check => commands::check::handle(&ctx).await,
        Command::Watch(args) => commands::watch::handle(args, &ctx).await,
        Command::Status(args) => commands::status::handle(args, &ctx).await,
        Command::Abandon => commands::abandon::handle(&ctx).await,
    }
}
