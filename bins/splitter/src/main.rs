//! SplitLedger command-line splitter.
//!
//! Reads an allocation request as JSON and prints the resulting shares.
//!
//! Without an input file the request is read from stdin. Example request:
//! `{"total":{"subunits":10000},"method":"equal","participants":["c","a","b"]}`

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use splitledger_core::split::{Allocation, AllocationRequest, SplitService};
use splitledger_shared::config::LoggingConfig;
use splitledger_shared::{AppConfig, AppError, AppResult, CurrencyFormat};

/// Split an expense total between participants.
#[derive(Debug, PartialEq, Eq, Parser)]
#[command(name = "splitter", version, about)]
struct Args {
    /// Print a display-format table instead of JSON
    #[arg(long)]
    table: bool,

    /// JSON allocation request; read from stdin when omitted
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    match run(&args, &config) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!(code = err.error_code(), "{err}");
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

fn run(args: &Args, config: &AppConfig) -> AppResult<()> {
    let format = config.currency_format()?;

    let input = read_input(args.input.as_deref())?;
    let request: AllocationRequest = serde_json::from_str(&input)
        .map_err(|e| AppError::Validation(format!("Invalid allocation request: {e}")))?;
    info!(
        method = %request.method(),
        total = %format.format_full(request.total),
        "Allocating"
    );

    let allocation = SplitService::allocate(&request)?;
    let output = if args.table {
        render_table(&allocation, &format)
    } else {
        serde_json::to_string_pretty(&allocation).map_err(|e| AppError::Internal(e.to_string()))?
    };
    println!("{output}");
    Ok(())
}

fn read_input(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("{}: {e}", path.display()))),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// One line per participant, then the total, in display format.
fn render_table(allocation: &Allocation, format: &CurrencyFormat) -> String {
    const TOTAL: &str = "total";

    let width = allocation
        .iter()
        .map(|(participant, _)| participant.chars().count())
        .max()
        .unwrap_or(0)
        .max(TOTAL.len());

    let mut lines: Vec<String> = allocation
        .iter()
        .map(|(participant, share)| {
            format!("{participant:<width$}  {}", format.format_display(share))
        })
        .collect();
    lines.push(format!(
        "{TOTAL:<width$}  {}",
        format.format_display(allocation.total())
    ));
    lines.join("\n")
}
