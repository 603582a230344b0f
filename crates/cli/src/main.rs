// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! mgmt - management command line for the controller

mod client;
mod env;
mod exit_error;
mod output;
mod session;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use mgmt_shell::split_top_level;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::client::ControllerClient;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;
use crate::session::{OnError, Session};

#[derive(Parser)]
#[command(
    name = "mgmt",
    version,
    about = "Management command line for the controller"
)]
struct Cli {
    /// Controller socket path [env: MGMT_CONTROLLER]
    #[arg(long, value_name = "SOCKET")]
    controller: Option<PathBuf>,

    /// Run a single command line and exit
    #[arg(long, value_name = "LINE", conflicts_with_all = ["commands", "file"])]
    command: Option<String>,

    /// Run comma-separated command lines in order and exit
    #[arg(long, value_name = "L1,L2,...", conflicts_with = "file")]
    commands: Option<String>,

    /// Run the command lines in a file and exit
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    output: OutputFormat,

    /// Request timeout in milliseconds [env: MGMT_TIMEOUT_IPC_MS]
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Ask the controller to shut down
    #[arg(long)]
    shutdown: bool,
}

fn cli_command() -> clap::Command {
    Cli::command()
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let code = e.downcast_ref::<ExitError>().map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, the
/// "Caused by" chain is skipped. Otherwise the full chain is rendered.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

fn init_logging() {
    let filter = env::log_filter().unwrap_or_else(|| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

/// Lines given on the command line or in `--file`; `None` means read stdin.
fn batch_input(cli: &Cli) -> Result<Option<Vec<String>>> {
    if let Some(line) = &cli.command {
        return Ok(Some(vec![line.clone()]));
    }
    if let Some(commands) = &cli.commands {
        let lines = split_top_level(commands, ',')
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        return Ok(Some(lines));
    }
    if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok(Some(text.lines().map(str::to_string).collect()));
    }
    Ok(None)
}

async fn run() -> Result<()> {
    let cli = Cli::from_arg_matches(&cli_command().get_matches())?;
    init_logging();

    let timeout = cli.timeout.map(Duration::from_millis);
    let client = ControllerClient::resolve(cli.controller.clone(), timeout)?;
    debug!(socket = %client.socket_path().display(), "resolved controller socket");
    let input = batch_input(&cli)?;

    if cli.shutdown && input.is_none() {
        client.shutdown().await?;
        return Ok(());
    }

    let mut session = Session::new(client.clone(), cli.output);
    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    let summary = match input {
        Some(lines) => {
            session
                .run_lines(lines, OnError::Stop, &mut out, &mut err)
                .await?
        }
        None => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session
                .run_reader(stdin, OnError::Continue, &mut out, &mut err)
                .await?
        }
    };
    drop(out);
    drop(err);

    if cli.shutdown {
        client.shutdown().await?;
    }
    if !summary.is_success() {
        return Err(ExitError::new(1, String::new()).into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
