//! Core domain types: subgroup ids, wallet addresses and partitions.

use std::collections::BTreeMap;
use std::fmt;

/// Smallest member count a subgroup may hold while valid.
pub const MIN_SUBGROUP_SIZE: usize = 4;

/// Largest member count a subgroup may hold.
pub const MAX_SUBGROUP_SIZE: usize = 7;

const _: () = assert!(MIN_SUBGROUP_SIZE <= MAX_SUBGROUP_SIZE);

/// Check whether a member count is a legal subgroup size.
#[inline]
pub const fn is_valid_size(size: usize) -> bool {
    size >= MIN_SUBGROUP_SIZE && size <= MAX_SUBGROUP_SIZE
}

/// An on-chain subgroup identifier. Zero means "not in any subgroup".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SubgroupId(pub u64);

impl SubgroupId {
    /// The id carried by members that have not been placed yet.
    pub const UNASSIGNED: Self = Self(0);

    /// Create from a raw id.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// True for id 0.
    #[inline]
    pub const fn is_unassigned(&self) -> bool {
        self.0 == 0
    }

    /// The id that follows this one in sequential allocation, or `None` at `u64::MAX`.
    #[inline]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl From<u64> for SubgroupId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SubgroupId> for u64 {
    fn from(value: SubgroupId) -> Self {
        value.0
    }
}

impl fmt::Display for SubgroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member's wallet address, compared exactly as given (no case folding).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A member with a parsed subgroup id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    pub wallet: WalletAddress,
    pub subgroup: SubgroupId,
}

impl Member {
    pub fn new(wallet: impl Into<WalletAddress>, subgroup: impl Into<SubgroupId>) -> Self {
        Self {
            wallet: wallet.into(),
            subgroup: subgroup.into(),
        }
    }
}

/// A subgroup with a parsed id and its member list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subgroup {
    pub id: SubgroupId,
    pub members: Vec<WalletAddress>,
}

/// Subgroup id to ordered member list.
///
/// A `BTreeMap` so every scan runs in ascending id order regardless of
/// insertion history.
pub type Partition = BTreeMap<SubgroupId, Vec<WalletAddress>>;

/// Total number of members across all subgroups of a partition.
pub fn member_count(partition: &Partition) -> usize {
    partition.values().map(Vec::len).sum()
}

/// Largest subgroup id present in a partition, if any.
pub fn max_subgroup_id(partition: &Partition) -> Option<SubgroupId> {
    partition.keys().next_back().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bounds() {
        assert!(!is_valid_size(3));
        assert!(is_valid_size(4));
        assert!(is_valid_size(7));
        assert!(!is_valid_size(8));
    }

    #[test]
    fn subgroup_id_sequence() {
        assert!(SubgroupId::UNASSIGNED.is_unassigned());
        assert_eq!(SubgroupId::UNASSIGNED.next(), Some(SubgroupId::new(1)));
        assert_eq!(SubgroupId::new(41).next().map(|id| id.value()), Some(42));
        assert_eq!(SubgroupId::new(u64::MAX).next(), None);
    }

    #[test]
    fn wallet_addresses_are_case_sensitive() {
        assert_ne!(WalletAddress::from("0xAbC"), WalletAddress::from("0xabc"));
    }

    #[test]
    fn partition_scans_ascending() {
        let mut partition = Partition::new();
        partition.insert(SubgroupId(5), vec!["a".into()]);
        partition.insert(SubgroupId(2), vec!["b".into(), "c".into()]);
        assert_eq!(max_subgroup_id(&partition), Some(SubgroupId(5)));
        assert_eq!(member_count(&partition), 3);
        let ids: Vec<_> = partition.keys().map(SubgroupId::value).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(max_subgroup_id(&Partition::new()), None);
    }
}
