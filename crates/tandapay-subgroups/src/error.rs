//! Error types for tandapay-subgroups.

use thiserror::Error;

/// Result type for reorganization operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a reorganization run.
///
/// Every variant is fatal: the inputs are already-fetched data, so retrying
/// the same computation cannot succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A subgroup id could not be read as a non-negative integer.
    #[error("invalid subgroup id {value:?} for {wallet}")]
    InvalidSubgroupId { wallet: String, value: String },

    /// The community is below the minimum size needed to operate.
    #[error("not enough members to reorganize: found {found}, need at least {required}")]
    InsufficientMembers { found: usize, required: usize },

    /// The engine cannot produce an all-valid partition.
    #[error("cannot reorganize {total} members: {reason}")]
    UnsolvableInput { total: usize, reason: String },

    /// The same wallet appears in more than one member record.
    #[error("duplicate member record for {wallet}")]
    DuplicateMember { wallet: String },

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True when the caller should surface "not enough members" rather than a data error.
    pub fn is_insufficient_members(&self) -> bool {
        matches!(self, Error::InsufficientMembers { .. })
    }
}
