//! End-to-end run: records in, assignment, report and plan out.

use crate::config::ReorgConfig;
use crate::engine::auto_reorg;
use crate::error::Result;
use crate::plan::{plan_transactions, TransactionPlan};
use crate::postprocess::{postprocess, ReorgReport};
use crate::preprocess::{ensure_min_members, preprocess_members};
use crate::record::{parse_members, parse_subgroups, MemberRecord, SubgroupRecord};
use crate::types::{Partition, SubgroupId};

/// Everything one reorganization run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReorgOutcome {
    pub assignment: Partition,
    pub report: ReorgReport,
    pub plan: TransactionPlan,
}

/// Run the preprocessor, engine, postprocessor and planner in order.
///
/// The on-chain subgroup count is taken as the largest id among the subgroup
/// records and member records.
pub fn reorganize(members: &[MemberRecord], subgroups: &[SubgroupRecord], config: &ReorgConfig) -> Result<ReorgOutcome> {
    ensure_min_members(members.len(), config)?;
    let parsed_members = parse_members(members)?;
    let input = preprocess_members(&parsed_members)?;
    let parsed_subgroups = parse_subgroups(subgroups)?;

    let onchain = parsed_subgroups
        .iter()
        .map(|s| s.id)
        .max()
        .unwrap_or(SubgroupId::UNASSIGNED)
        .max(input.highest_subgroup_id);

    let input = input.with_highest_subgroup_id(onchain);
    let assignment = auto_reorg(&input)?;
    let report = postprocess(&parsed_members, &parsed_subgroups, &assignment);
    let plan = plan_transactions(&report, &assignment, onchain.value());

    tracing::info!(
        members = report.total_members,
        moves = report.members_to_reassign.len(),
        new_subgroups = plan.create_subgroups,
        "reorganization planned"
    );

    Ok(ReorgOutcome {
        assignment,
        report,
        plan,
    })
}
