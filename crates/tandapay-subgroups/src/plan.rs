//! Transaction planning.
//!
//! The contract hands out subgroup ids sequentially on creation, so every id
//! above the current on-chain count must be created before members can be
//! assigned to it. Creations come first, then one assignment per move.

use crate::postprocess::ReorgReport;
use crate::types::{max_subgroup_id, Partition, SubgroupId, WalletAddress};

/// An "assign member to subgroup" call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AssignMember {
    pub member_wallet_address: WalletAddress,
    pub subgroup_id: SubgroupId,
    /// Always true here: these are re-assignments of known members.
    pub is_reorging: bool,
}

/// One write transaction, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TransactionRequest {
    CreateSubgroup,
    AssignMember(AssignMember),
}

/// The data an external transaction builder needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TransactionPlan {
    /// Number of "create subgroup" calls to issue first.
    pub create_subgroups: u64,
    /// Assignment calls, in move order.
    pub assignments: Vec<AssignMember>,
}

impl TransactionPlan {
    /// True when nothing needs to be sent.
    pub fn is_empty(&self) -> bool {
        self.create_subgroups == 0 && self.assignments.is_empty()
    }

    /// Total number of transactions.
    pub fn len(&self) -> usize {
        self.create_subgroups as usize + self.assignments.len()
    }

    /// All requests in strict order: creations, then assignments.
    pub fn requests(&self) -> impl Iterator<Item = TransactionRequest> + '_ {
        (0..self.create_subgroups)
            .map(|_| TransactionRequest::CreateSubgroup)
            .chain(self.assignments.iter().cloned().map(TransactionRequest::AssignMember))
    }
}

/// Build the transaction plan for a report.
///
/// `onchain_subgroup_count` is the number of subgroups the contract already
/// holds (ids `1..=count`).
pub fn plan_transactions(report: &ReorgReport, new_assignment: &Partition, onchain_subgroup_count: u64) -> TransactionPlan {
    let highest = max_subgroup_id(new_assignment).map_or(0, |id| id.value());
    let create_subgroups = highest.saturating_sub(onchain_subgroup_count);

    let assignments = report
        .members_to_reassign
        .iter()
        .map(|mv| AssignMember {
            member_wallet_address: mv.wallet_address.clone(),
            subgroup_id: mv.to_subgroup_id,
            is_reorging: true,
        })
        .collect();

    let plan = TransactionPlan {
        create_subgroups,
        assignments,
    };
    tracing::debug!(
        create_subgroups = plan.create_subgroups,
        assignments = plan.assignments.len(),
        "planned transactions"
    );
    plan
}
