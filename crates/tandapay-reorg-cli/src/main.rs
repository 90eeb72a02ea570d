//! subgroup-reorg CLI tool
//!
//! Computes the subgroup reorganization for a community snapshot and prints
//! the resulting assignment, move report and transaction plan as JSON.
//!
//! Usage:
//!   subgroup-reorg [snapshot.json]
//!
//! Reads the snapshot from stdin when no path is given.

use std::path::PathBuf;
use tandapay_reorg_cli::{load_snapshot, run, DEFAULT_LOG_FILTER};
use tandapay_subgroups::ReorgConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("subgroup-reorg - Plan a TandaPay subgroup reorganization");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  subgroup-reorg [snapshot.json]   Read snapshot from file (default: stdin)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TANDAPAY_MIN_MEMBERS  Minimum community size (default: 12)");
    eprintln!("  RUST_LOG              Log filter (default: subgroup_reorg=info,tandapay_reorg_cli=info,tandapay_subgroups=info)");
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let path = match args.get(1).map(String::as_str) {
        Some("-h" | "--help" | "help") => {
            print_usage();
            std::process::exit(0);
        }
        Some(path) => Some(PathBuf::from(path)),
        None => None,
    };

    if let Err(e) = execute(path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReorgConfig::from_env()?;
    let snapshot = load_snapshot(path.as_deref())?;
    let outcome = run(&snapshot, &config)?;

    if outcome.plan.is_empty() {
        eprintln!("no transactions needed");
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
