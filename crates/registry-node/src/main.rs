//! # Parcel Registry Node
//!
//! Runs the registry over an in-memory ledger and serves JSON-line
//! invocations from a file or stdin.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (flags, then env)
//! 2. Initialize telemetry
//! 3. Build ledger and service
//! 4. Seed the ledger unless `--no-seed`
//! 5. Serve invocations until EOF

mod session;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use parcel_registry::prelude::*;
use registry_telemetry::{init_telemetry, TelemetryConfig};

/// Parcel Registry node
#[derive(Parser, Debug)]
#[command(name = "registry-node")]
#[command(about = "Serve Parcel Registry invocations as JSON lines")]
struct Args {
    /// Read invocations from this file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Start with an empty ledger
    #[arg(long)]
    no_seed: bool,

    /// Log level filter (overrides REGISTRY_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = args.log_level.as_deref() {
        telemetry = telemetry.with_log_level(level);
    }
    if args.json_logs {
        telemetry = telemetry.with_json_logs(true);
    }
    init_telemetry(&telemetry).context("Failed to initialize telemetry")?;

    let service =
        ParcelRegistryService::new(Arc::new(InMemoryLedger::new()), RegistryConfig::from_env());
    let config = service.config();
    info!(
        version = parcel_registry::VERSION,
        range_start = %config.range_start_key,
        range_end = %config.range_end_key,
        "Starting Parcel Registry node"
    );

    if args.no_seed {
        info!("Seeding skipped");
    } else {
        service.instantiate().context("Failed to seed ledger")?;
        info!(records = SEED_PARCELS.len(), "Ledger seeded");
    }
    let handler = RegistryHandler::new(service);

    let stdout = io::stdout();
    let summary = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            session::run(&handler, BufReader::new(file), stdout.lock())?
        }
        None => session::run(&handler, io::stdin().lock(), stdout.lock())?,
    };

    let stats = handler.api().stats();
    info!(
        handled = summary.handled,
        rejected_lines = summary.rejected_lines,
        successes = stats.successes,
        failures = stats.failures,
        "Input exhausted, shutting down"
    );
    Ok(())
}
