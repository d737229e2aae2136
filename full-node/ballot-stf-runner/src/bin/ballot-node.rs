//! This binary runs an election over a batch of transactions and prints the tallies.

use std::path::PathBuf;

use anyhow::Context;
use ballot_election::ElectionConfig;
use ballot_stf_runner::{from_toml_path, load_transactions, run_election, RunnerConfig};
use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to the node config.
    #[arg(long, default_value = "ballot_config.toml")]
    config: PathBuf,

    /// The path to a JSON array of transactions to apply.
    #[arg(long)]
    txs: Option<PathBuf>,
}

fn main() -> Result<(), anyhow::Error> {
    // Initializing logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    info!("Reading node config from {:?}", args.config);
    let config: RunnerConfig<ElectionConfig> =
        from_toml_path(&args.config).context("Failed to read node configuration")?;
    let txs = load_transactions(args.txs.as_deref())?;

    let report = run_election(config, txs)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
