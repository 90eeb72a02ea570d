//! Reorganization engine: first-fit placement with a final sweep.
//!
//! # Placement
//!
//! Preserved subgroups are copied as-is. Each member awaiting placement goes
//! into the lowest-id subgroup with fewer than [`MAX_SUBGROUP_SIZE`] members;
//! when every subgroup is full a new one is opened above the highest id in use.
//!
//! # Sweep
//!
//! Only the last opened subgroup can end up below [`MIN_SUBGROUP_SIZE`], and
//! it is only opened once every other subgroup holds [`MAX_SUBGROUP_SIZE`].
//! Its members can therefore never be absorbed by the others, so the single
//! repair is a top-up from donors holding more than the minimum:
//!
//! 1. Members placed during this run are pulled first (they are moving anyway).
//! 2. Then original members.
//!
//! Donors are scanned from the highest id down and give up their most
//! recently added member first. At most `MIN_SUBGROUP_SIZE - 1` members are
//! pulled. A subgroup still short afterwards is [`Error::UnsolvableInput`].
//!
//! Exhausting the id space while opening a subgroup is also
//! [`Error::UnsolvableInput`].

use crate::error::{Error, Result};
use crate::preprocess::AlgorithmInput;
use crate::types::{max_subgroup_id, member_count, Partition, SubgroupId, WalletAddress, MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE};
use std::collections::HashSet;

/// Which members a top-up pass may pull from a donor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pull {
    /// Members placed earlier in this run.
    Placed,
    /// Members that were already in the donor.
    Original,
}

/// Compute a complete repartition of every member into valid subgroups.
pub fn auto_reorg(input: &AlgorithmInput) -> Result<Partition> {
    let total = input.total_members();
    if total < MIN_SUBGROUP_SIZE {
        return Err(Error::UnsolvableInput {
            total,
            reason: format!("at least {} members are needed to form a subgroup", MIN_SUBGROUP_SIZE),
        });
    }

    let mut layout = Layout::new(input);
    let queue = layout.seed(input);

    tracing::debug!(
        preserved = layout.groups.len(),
        queued = queue.len(),
        "placing members"
    );

    for wallet in queue {
        layout.place(wallet, total)?;
    }

    layout.sweep(total)?;

    debug_assert_eq!(member_count(&layout.groups), total);
    Ok(layout.groups)
}

/// Working state for one run.
struct Layout {
    groups: Partition,
    /// Members whose subgroup changes in this run.
    placed: HashSet<WalletAddress>,
    /// Highest id ever in use; new subgroups open above it.
    floor: SubgroupId,
}

impl Layout {
    fn new(input: &AlgorithmInput) -> Self {
        let floor = max_subgroup_id(&input.subgroups)
            .unwrap_or(SubgroupId::UNASSIGNED)
            .max(input.highest_subgroup_id);

        Self {
            groups: Partition::new(),
            placed: HashSet::new(),
            floor,
        }
    }

    /// Copy preserved subgroups and return the placement queue.
    ///
    /// The queue is `needs_assigned` followed by whatever the preserved
    /// subgroups cannot keep: all members of an undersized subgroup and the
    /// tail of an oversized one, in ascending id order.
    fn seed(&mut self, input: &AlgorithmInput) -> Vec<WalletAddress> {
        let mut queue = input.needs_assigned.clone();

        for (&id, wallets) in &input.subgroups {
            if wallets.len() < MIN_SUBGROUP_SIZE {
                if !wallets.is_empty() {
                    tracing::debug!(subgroup = %id, size = wallets.len(), "requeueing undersized input subgroup");
                }
                queue.extend(wallets.iter().cloned());
                continue;
            }

            let keep = wallets.len().min(MAX_SUBGROUP_SIZE);
            if keep < wallets.len() {
                tracing::debug!(subgroup = %id, size = wallets.len(), "trimming oversized input subgroup");
                queue.extend(wallets[keep..].iter().cloned());
            }
            self.groups.insert(id, wallets[..keep].to_vec());
        }

        queue
    }

    /// First-fit a member, opening a new subgroup when all are full.
    fn place(&mut self, wallet: WalletAddress, total: usize) -> Result<()> {
        let target = self
            .groups
            .iter()
            .find(|(_, members)| members.len() < MAX_SUBGROUP_SIZE)
            .map(|(&id, _)| id);

        let id = match target {
            Some(id) => id,
            None => self.open(total)?,
        };

        tracing::trace!(wallet = %wallet, subgroup = %id, "placed member");
        self.placed.insert(wallet.clone());
        self.groups.entry(id).or_default().push(wallet);
        Ok(())
    }

    /// Allocate the next sequential id above everything seen so far.
    fn open(&mut self, total: usize) -> Result<SubgroupId> {
        let highest = max_subgroup_id(&self.groups)
            .unwrap_or(SubgroupId::UNASSIGNED)
            .max(self.floor);
        let id = highest.next().ok_or_else(|| Error::UnsolvableInput {
            total,
            reason: format!("no subgroup id left above {}", highest),
        })?;
        self.floor = id;
        self.groups.insert(id, Vec::new());
        tracing::debug!(subgroup = %id, "opened subgroup");
        Ok(id)
    }

    fn sweep(&mut self, total: usize) -> Result<()> {
        let undersized: Vec<SubgroupId> = self
            .groups
            .iter()
            .filter(|(_, members)| members.len() < MIN_SUBGROUP_SIZE)
            .map(|(&id, _)| id)
            .collect();
        debug_assert!(undersized.len() <= 1, "only the last opened subgroup can be short");

        for id in undersized {
            debug_assert_eq!(self.spare_capacity(id), 0, "a short subgroup is only opened when the rest are full");
            self.top_up(id, total)?;
        }

        Ok(())
    }

    /// Room left in every subgroup except `id`.
    fn spare_capacity(&self, id: SubgroupId) -> usize {
        self.groups
            .iter()
            .filter(|(other, _)| **other != id)
            .map(|(_, members)| MAX_SUBGROUP_SIZE.saturating_sub(members.len()))
            .sum()
    }

    /// Pull members from larger subgroups until `id` reaches the minimum.
    fn top_up(&mut self, id: SubgroupId, total: usize) -> Result<()> {
        let donors: Vec<SubgroupId> = self.groups.keys().rev().copied().filter(|&d| d != id).collect();

        for pass in [Pull::Placed, Pull::Original] {
            for &donor in &donors {
                while self.size_of(id) < MIN_SUBGROUP_SIZE && self.size_of(donor) > MIN_SUBGROUP_SIZE {
                    let Some(wallet) = self.pull(donor, pass) else {
                        break;
                    };
                    tracing::debug!(wallet = %wallet, from = %donor, to = %id, ?pass, "topping up subgroup");
                    self.placed.insert(wallet.clone());
                    self.groups.entry(id).or_default().push(wallet);
                }
            }
        }

        let size = self.size_of(id);
        if size < MIN_SUBGROUP_SIZE {
            return Err(Error::UnsolvableInput {
                total,
                reason: format!("subgroup {} stuck at {} members with no donors left", id, size),
            });
        }

        Ok(())
    }

    /// Take the most recently added member of the requested kind from `donor`.
    fn pull(&mut self, donor: SubgroupId, pass: Pull) -> Option<WalletAddress> {
        let placed = &self.placed;
        let members = self.groups.get_mut(&donor)?;
        let pos = members.iter().rposition(|wallet| match pass {
            Pull::Placed => placed.contains(wallet),
            Pull::Original => !placed.contains(wallet),
        })?;
        Some(members.remove(pos))
    }

    fn size_of(&self, id: SubgroupId) -> usize {
        self.groups.get(&id).map_or(0, Vec::len)
    }
}
