//! Postprocessor: diff original assignments against the engine's partition.

use crate::types::{Member, Partition, Subgroup, SubgroupId, WalletAddress};
use std::collections::HashMap;

/// A single member changing subgroup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MoveInstruction {
    pub wallet_address: WalletAddress,
    pub from_subgroup_id: SubgroupId,
    pub to_subgroup_id: SubgroupId,
}

/// Outcome of comparing old and new assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ReorgReport {
    /// Members whose subgroup changes, in original member order.
    pub members_to_reassign: Vec<MoveInstruction>,
    /// Members that were compared.
    pub total_members: usize,
    /// Members that keep their subgroup.
    pub members_unchanged: usize,
}

impl ReorgReport {
    /// No member moves, so no transactions are needed.
    pub fn is_noop(&self) -> bool {
        self.members_to_reassign.is_empty()
    }
}

/// Compare original assignments with `new_assignment`.
///
/// Original subgroup ids come from `original_members`; `original_subgroups`
/// only fills in wallets the member list does not mention. Wallets missing
/// from either side are skipped.
pub fn postprocess(
    original_members: &[Member],
    original_subgroups: &[Subgroup],
    new_assignment: &Partition,
) -> ReorgReport {
    let mut order: Vec<&WalletAddress> = Vec::with_capacity(original_members.len());
    let mut before: HashMap<&WalletAddress, SubgroupId> = HashMap::with_capacity(original_members.len());

    for member in original_members {
        if before.insert(&member.wallet, member.subgroup).is_none() {
            order.push(&member.wallet);
        }
    }

    for subgroup in original_subgroups {
        for wallet in &subgroup.members {
            match before.get(wallet) {
                Some(&id) if id != subgroup.id => {
                    tracing::warn!(
                        wallet = %wallet,
                        member_record = %id,
                        subgroup_record = %subgroup.id,
                        "subgroup record disagrees with member record; keeping member record"
                    );
                }
                Some(_) => {}
                None => {
                    before.insert(wallet, subgroup.id);
                    order.push(wallet);
                }
            }
        }
    }

    let after = invert(new_assignment);

    let mut report = ReorgReport::default();

    for wallet in order {
        let (Some(&from), Some(&to)) = (before.get(wallet), after.get(wallet)) else {
            tracing::debug!(wallet = %wallet, "member missing from new assignment; skipping");
            continue;
        };
        report.total_members += 1;
        if from == to {
            report.members_unchanged += 1;
        } else {
            report.members_to_reassign.push(MoveInstruction {
                wallet_address: wallet.clone(),
                from_subgroup_id: from,
                to_subgroup_id: to,
            });
        }
    }

    tracing::debug!(
        total = report.total_members,
        moves = report.members_to_reassign.len(),
        unchanged = report.members_unchanged,
        "diffed assignments"
    );

    report
}

/// Wallet to subgroup id for a partition.
fn invert(partition: &Partition) -> HashMap<&WalletAddress, SubgroupId> {
    partition
        .iter()
        .flat_map(|(&id, wallets)| wallets.iter().map(move |wallet| (wallet, id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(groups: &[(u64, &[&str])]) -> Partition {
        groups
            .iter()
            .map(|(id, names)| (SubgroupId(*id), names.iter().map(|n| WalletAddress::from(*n)).collect()))
            .collect()
    }

    #[test]
    fn unchanged_assignment_has_no_moves() {
        let members: Vec<_> = ["a", "b", "c", "d"].iter().map(|w| Member::new(*w, 1)).collect();
        let report = postprocess(&members, &[], &partition(&[(1, &["a", "b", "c", "d"])]));
        assert!(report.is_noop());
        assert_eq!(report.members_unchanged, 4);
        assert_eq!(report.total_members, 4);
    }

    #[test]
    fn moves_follow_original_member_order() {
        let members = vec![
            Member::new("x", 0),
            Member::new("a", 1),
            Member::new("y", 2),
        ];
        let report = postprocess(&members, &[], &partition(&[(1, &["a", "y", "x"])]));
        assert_eq!(
            report.members_to_reassign,
            vec![
                MoveInstruction {
                    wallet_address: "x".into(),
                    from_subgroup_id: SubgroupId(0),
                    to_subgroup_id: SubgroupId(1),
                },
                MoveInstruction {
                    wallet_address: "y".into(),
                    from_subgroup_id: SubgroupId(2),
                    to_subgroup_id: SubgroupId(1),
                },
            ]
        );
        assert_eq!(report.members_unchanged, 1);
    }

    #[test]
    fn missing_members_are_skipped() {
        let members = vec![Member::new("a", 1), Member::new("ghost", 1)];
        let report = postprocess(&members, &[], &partition(&[(1, &["a", "stranger"])]));
        assert_eq!(report.total_members, 1);
        assert!(report.is_noop());
    }

    #[test]
    fn subgroup_records_fill_gaps_but_never_override() {
        let members = vec![Member::new("a", 1)];
        let subgroups = vec![Subgroup {
            id: SubgroupId(2),
            members: vec!["a".into(), "b".into()],
        }];
        let report = postprocess(&members, &subgroups, &partition(&[(1, &["a"]), (3, &["b"])]));
        assert_eq!(report.total_members, 2);
        assert_eq!(report.members_unchanged, 1);
        assert_eq!(report.members_to_reassign[0].wallet_address, WalletAddress::from("b"));
        assert_eq!(report.members_to_reassign[0].from_subgroup_id, SubgroupId(2));
    }
}
