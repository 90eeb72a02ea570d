//! Preprocessor: raw member records to engine input.
//!
//! Members with id 0 and members of undersized subgroups are collected into
//! `needs_assigned`; every subgroup already at a valid size is passed through
//! untouched.
//!
//! # Ordering
//!
//! `needs_assigned` lists the originally-unassigned members first, in input
//! order, followed by members of dissolved subgroups. Dissolved subgroups are
//! visited in ascending id order and keep input order internally.

use crate::config::ReorgConfig;
use crate::error::{Error, Result};
use crate::record::{parse_members, MemberRecord};
use crate::types::{max_subgroup_id, member_count, Member, Partition, SubgroupId, WalletAddress, MIN_SUBGROUP_SIZE};
use std::collections::{BTreeMap, HashSet};

/// Engine input: preserved subgroups plus everyone that needs a new home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmInput {
    /// Existing subgroups with at least [`MIN_SUBGROUP_SIZE`] members.
    pub subgroups: Partition,
    /// Members to place, in placement order.
    pub needs_assigned: Vec<WalletAddress>,
    /// Highest id seen on any member, including dissolved subgroups.
    /// New subgroups are allocated above it.
    pub highest_subgroup_id: SubgroupId,
}

impl AlgorithmInput {
    /// Build an input by hand. The highest id is taken from `subgroups`.
    pub fn new(subgroups: Partition, needs_assigned: Vec<WalletAddress>) -> Self {
        let highest_subgroup_id = max_subgroup_id(&subgroups).unwrap_or(SubgroupId::UNASSIGNED);
        Self {
            subgroups,
            needs_assigned,
            highest_subgroup_id,
        }
    }

    /// Raise the id floor for new subgroups (e.g. to the on-chain subgroup count).
    pub fn with_highest_subgroup_id(mut self, id: SubgroupId) -> Self {
        self.highest_subgroup_id = self.highest_subgroup_id.max(id);
        self
    }

    /// Members in preserved subgroups plus members awaiting placement.
    pub fn total_members(&self) -> usize {
        member_count(&self.subgroups) + self.needs_assigned.len()
    }
}

/// Convert raw member records into engine input.
///
/// Fails with [`Error::InsufficientMembers`] below `config.min_members`, and
/// with [`Error::InvalidSubgroupId`] on the first id that does not parse.
pub fn preprocess(records: &[MemberRecord], config: &ReorgConfig) -> Result<AlgorithmInput> {
    ensure_min_members(records.len(), config)?;
    let members = parse_members(records)?;
    preprocess_members(&members)
}

/// Refuse communities smaller than `config.min_members`.
pub(crate) fn ensure_min_members(found: usize, config: &ReorgConfig) -> Result<()> {
    if found < config.min_members {
        return Err(Error::InsufficientMembers {
            found,
            required: config.min_members,
        });
    }
    Ok(())
}

/// Group already-parsed members. Does not apply the minimum-members check.
pub fn preprocess_members(members: &[Member]) -> Result<AlgorithmInput> {
    let mut seen = HashSet::with_capacity(members.len());
    let mut unassigned = Vec::new();
    let mut groups: BTreeMap<SubgroupId, Vec<WalletAddress>> = BTreeMap::new();
    let mut highest = SubgroupId::UNASSIGNED;

    for member in members {
        if !seen.insert(&member.wallet) {
            return Err(Error::DuplicateMember {
                wallet: member.wallet.to_string(),
            });
        }

        highest = highest.max(member.subgroup);
        if member.subgroup.is_unassigned() {
            unassigned.push(member.wallet.clone());
        } else {
            groups.entry(member.subgroup).or_default().push(member.wallet.clone());
        }
    }

    let mut subgroups = Partition::new();
    let mut needs_assigned = unassigned;

    for (id, wallets) in groups {
        if wallets.len() >= MIN_SUBGROUP_SIZE {
            subgroups.insert(id, wallets);
        } else {
            tracing::debug!(subgroup = %id, size = wallets.len(), "dissolving undersized subgroup");
            needs_assigned.extend(wallets);
        }
    }

    tracing::debug!(
        preserved = subgroups.len(),
        needs_assigned = needs_assigned.len(),
        highest = %highest,
        "preprocessed members"
    );

    Ok(AlgorithmInput {
        subgroups,
        needs_assigned,
        highest_subgroup_id: highest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(wallet: &str, id: u64) -> MemberRecord {
        MemberRecord::new(wallet, id)
    }

    fn wallets(names: &[&str]) -> Vec<WalletAddress> {
        names.iter().map(|n| WalletAddress::from(*n)).collect()
    }

    /// Twelve members: subgroup 1 of 5, subgroup 2 of 3, subgroup 3 of 2, two unassigned.
    fn mixed_records() -> Vec<MemberRecord> {
        vec![
            record("a1", 1),
            record("c1", 3),
            record("b1", 2),
            record("u1", 0),
            record("a2", 1),
            record("b2", 2),
            record("a3", 1),
            record("c2", 3),
            record("a4", 1),
            record("u2", 0),
            record("b3", 2),
            record("a5", 1),
        ]
    }

    #[test]
    fn keeps_valid_subgroups_verbatim() {
        let input = preprocess(&mixed_records(), &ReorgConfig::default()).unwrap();
        assert_eq!(input.subgroups.len(), 1);
        assert_eq!(input.subgroups[&SubgroupId(1)], wallets(&["a1", "a2", "a3", "a4", "a5"]));
    }

    #[test]
    fn unassigned_first_then_dissolved_by_ascending_id() {
        let input = preprocess(&mixed_records(), &ReorgConfig::default()).unwrap();
        assert_eq!(
            input.needs_assigned,
            wallets(&["u1", "u2", "b1", "b2", "b3", "c1", "c2"])
        );
        assert_eq!(input.highest_subgroup_id, SubgroupId(3));
        assert_eq!(input.total_members(), 12);
    }

    #[test]
    fn rejects_small_communities() {
        let records: Vec<_> = mixed_records().into_iter().take(11).collect();
        let err = preprocess(&records, &ReorgConfig::default()).unwrap_err();
        assert_eq!(err, Error::InsufficientMembers { found: 11, required: 12 });
        assert!(err.is_insufficient_members());
    }

    #[test]
    fn threshold_comes_from_config() {
        let records: Vec<_> = mixed_records().into_iter().take(5).collect();
        assert!(preprocess(&records, &ReorgConfig::new(5)).is_ok());
    }

    #[test]
    fn malformed_id_aborts() {
        let mut records = mixed_records();
        records[4] = MemberRecord::new("a2", "abc");
        let err = preprocess(&records, &ReorgConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidSubgroupId { .. }));
    }

    #[test]
    fn duplicate_wallet_rejected() {
        let mut records = mixed_records();
        records[11] = record("a1", 1);
        let err = preprocess(&records, &ReorgConfig::default()).unwrap_err();
        assert_eq!(err, Error::DuplicateMember { wallet: "a1".into() });
    }

    #[test]
    fn hand_built_input_tracks_highest_id() {
        let mut subgroups = Partition::new();
        subgroups.insert(SubgroupId(4), wallets(&["a", "b", "c", "d"]));
        let input = AlgorithmInput::new(subgroups, vec![]);
        assert_eq!(input.highest_subgroup_id, SubgroupId(4));
        assert_eq!(input.clone().with_highest_subgroup_id(SubgroupId(2)).highest_subgroup_id, SubgroupId(4));
        assert_eq!(input.with_highest_subgroup_id(SubgroupId(9)).highest_subgroup_id, SubgroupId(9));
    }
}
