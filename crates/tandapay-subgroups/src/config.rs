//! Reorganization configuration.

use crate::error::{Error, Result};

/// Community size below which a reorganization is refused.
///
/// Mirrors the contract's initialization-exit member count.
pub const DEFAULT_MIN_MEMBERS: usize = 12;

/// Environment variable overriding [`ReorgConfig::min_members`].
pub const MIN_MEMBERS_ENV: &str = "TANDAPAY_MIN_MEMBERS";

/// Configuration for a reorganization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorgConfig {
    /// Minimum total member count the preprocessor will accept.
    pub min_members: usize,
}

impl Default for ReorgConfig {
    fn default() -> Self {
        Self {
            min_members: DEFAULT_MIN_MEMBERS,
        }
    }
}

impl ReorgConfig {
    pub fn new(min_members: usize) -> Self {
        Self { min_members }
    }

    /// Create config from environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_members = match lookup(MIN_MEMBERS_ENV) {
            Some(value) => value.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("{} must be a non-negative integer, got {:?}", MIN_MEMBERS_ENV, value))
            })?,
            None => DEFAULT_MIN_MEMBERS,
        };

        Ok(Self { min_members })
    }
}
