//! Snapshot handling for the `subgroup-reorg` tool.
//!
//! A snapshot is the member and subgroup data a client has already fetched
//! from the contract:
//!
//! ```json
//! {
//!   "members": [{ "walletAddress": "0xabc", "subgroupId": "2" }],
//!   "subgroups": [{ "id": 2, "members": ["0xabc"] }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tandapay_subgroups::{reorganize, MemberRecord, ReorgConfig, ReorgOutcome, SubgroupRecord};
use thiserror::Error;

/// Log filter used when `RUST_LOG` is unset: the binary, this crate and the engine.
pub const DEFAULT_LOG_FILTER: &str = "subgroup_reorg=info,tandapay_reorg_cli=info,tandapay_subgroups=info";

/// Result type for the CLI.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the tool.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON or has the wrong shape
    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Reorganization refused the input
    #[error(transparent)]
    Reorg(#[from] tandapay_subgroups::Error),
}

/// Member and subgroup records as fetched from the contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    #[serde(default)]
    pub subgroups: Vec<SubgroupRecord>,
}

/// Parse a snapshot from any reader.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load a snapshot from `path`, or from stdin when no path is given.
pub fn load_snapshot(path: Option<&Path>) -> Result<Snapshot> {
    match path {
        Some(path) => {
            tracing::debug!("Reading snapshot from {:?}", path);
            let file = std::fs::File::open(path)?;
            read_snapshot(std::io::BufReader::new(file))
        }
        None => {
            tracing::debug!("Reading snapshot from stdin");
            read_snapshot(std::io::stdin().lock())
        }
    }
}

/// Compute the reorganization for a snapshot.
pub fn run(snapshot: &Snapshot, config: &ReorgConfig) -> Result<ReorgOutcome> {
    tracing::info!(
        "Reorganizing {} members across {} subgroup records",
        snapshot.members.len(),
        snapshot.subgroups.len()
    );
    Ok(reorganize(&snapshot.members, &snapshot.subgroups, config)?)
}
