//! TandaPay Subgroup Reorganization
//!
//! A TandaPay community is split into subgroups: shared risk pools of 4 to 7
//! members, each a first-class on-chain entity with a positive integer id.
//! When members join, leave or are removed, some subgroups drop below 4 and
//! some members end up unassigned. This crate computes a new partition that
//! restores the all-subgroups-valid invariant and the minimal list of
//! reassignments needed to reach it.
//!
//! # Pipeline
//!
//! 1. [`preprocess`]: group raw member records; keep valid subgroups, queue
//!    unassigned members and members of undersized subgroups.
//! 2. [`auto_reorg`]: first-fit the queue into existing subgroups, open new
//!    ids only when everything is full, then repair a short trailing subgroup.
//! 3. [`postprocess`]: diff old and new assignments into [`MoveInstruction`]s.
//! 4. [`plan_transactions`]: "create subgroup" calls followed by
//!    "assign member" calls for an external transaction builder.
//!
//! [`reorganize`] runs all four.
//!
//! # Stability over balance
//!
//! Every reassignment is an on-chain transaction that the affected member has
//! to approve, so members already in a valid subgroup stay put. At most
//! `MIN_SUBGROUP_SIZE - 1` of them move, and only when a new trailing subgroup
//! cannot be filled from members that are moving anyway.
//!
//! Every step is a pure, deterministic function of its inputs.

mod config;
mod engine;
mod error;
mod pipeline;
mod plan;
mod postprocess;
mod preprocess;
mod record;
mod types;

pub use config::{ReorgConfig, DEFAULT_MIN_MEMBERS, MIN_MEMBERS_ENV};
pub use engine::auto_reorg;
pub use error::{Error, Result};
pub use pipeline::{reorganize, ReorgOutcome};
pub use plan::{plan_transactions, AssignMember, TransactionPlan, TransactionRequest};
pub use postprocess::{postprocess, MoveInstruction, ReorgReport};
pub use preprocess::{preprocess, preprocess_members, AlgorithmInput};
pub use record::{parse_members, parse_subgroup_id, parse_subgroups, MemberRecord, RawSubgroupId, SubgroupRecord};
pub use types::{
    is_valid_size, max_subgroup_id, member_count, Member, Partition, Subgroup, SubgroupId, WalletAddress,
    MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE,
};
