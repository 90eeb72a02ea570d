//! Raw member and subgroup records as supplied by the data-fetch layer.
//!
//! Subgroup ids arrive as integers or decimal strings (contract reads are
//! stringified big numbers). Conversion is deliberately narrow: anything that
//! is not a plain non-negative decimal integer is rejected, never coerced to 0.

use crate::error::{Error, Result};
use crate::types::{Member, Subgroup, SubgroupId, WalletAddress};
use std::fmt;

/// A subgroup id before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawSubgroupId {
    Unsigned(u64),
    Signed(i64),
    Text(String),
}

impl fmt::Display for RawSubgroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawSubgroupId::Unsigned(v) => write!(f, "{}", v),
            RawSubgroupId::Signed(v) => write!(f, "{}", v),
            RawSubgroupId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RawSubgroupId {
    fn from(value: u64) -> Self {
        RawSubgroupId::Unsigned(value)
    }
}

impl From<i64> for RawSubgroupId {
    fn from(value: i64) -> Self {
        RawSubgroupId::Signed(value)
    }
}

impl From<&str> for RawSubgroupId {
    fn from(value: &str) -> Self {
        RawSubgroupId::Text(value.to_string())
    }
}

impl From<String> for RawSubgroupId {
    fn from(value: String) -> Self {
        RawSubgroupId::Text(value)
    }
}

/// Convert a raw id to a [`SubgroupId`].
///
/// Accepts non-negative integers and non-empty strings of ASCII decimal digits
/// that fit in a `u64`. Signs, whitespace, hex prefixes and fractions are all
/// rejected. `wallet` only labels the error.
pub fn parse_subgroup_id(raw: &RawSubgroupId, wallet: &str) -> Result<SubgroupId> {
    let invalid = || Error::InvalidSubgroupId {
        wallet: wallet.to_string(),
        value: raw.to_string(),
    };

    match raw {
        RawSubgroupId::Unsigned(v) => Ok(SubgroupId(*v)),
        RawSubgroupId::Signed(v) => u64::try_from(*v).map(SubgroupId).map_err(|_| invalid()),
        RawSubgroupId::Text(s) => {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            s.parse::<u64>().map(SubgroupId).map_err(|_| invalid())
        }
    }
}

/// A member as read from the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MemberRecord {
    pub wallet_address: String,
    pub subgroup_id: RawSubgroupId,
}

impl MemberRecord {
    pub fn new(wallet_address: impl Into<String>, subgroup_id: impl Into<RawSubgroupId>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            subgroup_id: subgroup_id.into(),
        }
    }

    /// Parse into a typed [`Member`].
    pub fn parse(&self) -> Result<Member> {
        let subgroup = parse_subgroup_id(&self.subgroup_id, &self.wallet_address)?;
        Ok(Member {
            wallet: WalletAddress(self.wallet_address.clone()),
            subgroup,
        })
    }
}

/// A subgroup as read from the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubgroupRecord {
    pub id: RawSubgroupId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub members: Vec<String>,
}

impl SubgroupRecord {
    pub fn new<I, S>(id: impl Into<RawSubgroupId>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse into a typed [`Subgroup`].
    pub fn parse(&self) -> Result<Subgroup> {
        let label = format!("subgroup record {}", self.id);
        let id = parse_subgroup_id(&self.id, &label)?;
        Ok(Subgroup {
            id,
            members: self.members.iter().cloned().map(WalletAddress).collect(),
        })
    }
}

/// Parse a batch of member records, failing on the first bad id.
pub fn parse_members(records: &[MemberRecord]) -> Result<Vec<Member>> {
    records.iter().map(MemberRecord::parse).collect()
}

/// Parse a batch of subgroup records, failing on the first bad id.
pub fn parse_subgroups(records: &[SubgroupRecord]) -> Result<Vec<Subgroup>> {
    records.iter().map(SubgroupRecord::parse).collect()
}
