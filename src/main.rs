//! # Echo Client
//!
//! Demonstration client for the on-chain echo program. One run creates a
//! buffer account, writes a string into it through the echo program, waits
//! for confirmation and reads the buffer back.
//!
//! ## Architecture
//! - `config`: environment configuration with command-line overrides
//! - `onchain_instance`: instruction encoding and transaction assembly
//! - `services`: the `Ledger` trait and its JSON-RPC implementation
//! - `runner`: the round trip itself
//!
//! ## Running
//! ```bash
//! cargo run -- <PROGRAM_ID> "hello"
//! ```
//!
//! Defaults to devnet; set `ECHO_RPC_URL` (or pass `--rpc-url`) to target
//! another cluster.

mod config;
mod error;
mod onchain_instance;
mod runner;
mod services;
mod state_structs;

use anyhow::{ Context, Result };
use clap::Parser;
use tracing_subscriber::{ EnvFilter, layer::SubscriberExt, util::SubscriberInitExt };

use crate::config::Config;
use crate::services::RpcLedger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program ID (base58 encoded string) of the deployed echo program
    program_id: String,

    /// The string to copy on-chain
    echo: String,

    /// JSON-RPC endpoint, overrides ECHO_RPC_URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Cluster name used in the explorer link, overrides ECHO_CLUSTER
    #[arg(long)]
    cluster: Option<String>,

    /// Lamports to airdrop to the fee payer, overrides ECHO_AIRDROP_LAMPORTS
    #[arg(long)]
    airdrop: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Application entry point.
///
/// Initializes tracing, loads configuration and runs one echo round trip.
///
/// # Logging Configuration
/// - Compact console output on stderr, without module targets
/// - Level from `RUST_LOG` when set, otherwise `--log-level` (default INFO)
///
/// # Output
/// stdout carries only the result: the explorer URL and the echoed text, or
/// the full report as JSON with `--json`.
///
/// # Error Handling
/// Any failure (bad program id, RPC error, missing buffer account) ends the
/// process with the error message and a non-zero exit code.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    tracing::debug!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?
        .with_overrides(args.rpc_url, args.cluster, args.airdrop)?;
    let program_id = runner::parse_program_id(&args.program_id)?;

    let ledger = RpcLedger::new(&config.rpc_url);
    tracing::info!("Using RPC endpoint {}", ledger.url());

    let report = runner::run(&ledger, &config, program_id, &args.echo).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", report.explorer_url);
        println!("Echo Buffer Text: {}", report.text);
    }

    Ok(())
}
