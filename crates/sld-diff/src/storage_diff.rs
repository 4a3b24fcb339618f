//! Positional storage diff for one contract.
//!
//! Slots are paired by index, never by label. Each pair is compared field by
//! field and then its types are walked recursively through struct members,
//! mapping values and array bases. Records land in a caller-owned
//! [`CompareInfo`], so one accumulator can collect many contracts.

use sld_types::{
    ChangeRecord, CompareInfo, ContractLayout, Delta, SlotChange, StorageLayout, StorageSlot,
    TypeRef,
};
use tracing::debug;

use crate::error::DiffResult;
use crate::type_diff::{descriptor_change, TypeGraph};

/// Which bucket slot-level records of a list belong to.
#[derive(Clone, Copy)]
enum Scope<'s> {
    /// Top-level slots: each record goes to the slot's declaring contract.
    Contract,
    /// Struct members: records go to the contract that owns the outer slot.
    Struct(&'s str),
}

/// Walks one pair of layouts and writes what differs into an accumulator.
pub struct StorageDiffEngine<'g, 'i> {
    graph: TypeGraph<'g>,
    info: &'i mut CompareInfo,
}

impl<'g, 'i> StorageDiffEngine<'g, 'i> {
    /// Engine over the two layouts' type dictionaries, writing into `info`.
    pub fn new(old: &'g StorageLayout, latest: &'g StorageLayout, info: &'i mut CompareInfo) -> Self {
        Self {
            graph: TypeGraph::new(&old.types, &latest.types),
            info,
        }
    }

    /// Compare the top-level slot lists.
    pub fn run(&mut self, old: &[StorageSlot], latest: &[StorageSlot]) -> DiffResult<()> {
        self.diff_slot_lists(Scope::Contract, old, latest)
    }

    fn diff_slot_lists(
        &mut self,
        scope: Scope<'_>,
        old: &[StorageSlot],
        latest: &[StorageSlot],
    ) -> DiffResult<()> {
        for (index, old_slot) in old.iter().enumerate() {
            let Some(latest_slot) = latest.get(index) else {
                self.info.record(
                    &old_slot.declaring_contract,
                    ChangeRecord::MissedStorageEntry {
                        label: old_slot.label.clone(),
                        type_ref: old_slot.type_ref.clone(),
                    },
                );
                continue;
            };

            let owner = match scope {
                Scope::Contract => old_slot.declaring_contract.as_str(),
                Scope::Struct(owner) => owner,
            };
            self.diff_pair(owner, old_slot, latest_slot)?;
        }

        for new_slot in latest.iter().skip(old.len()) {
            self.info.record(
                &new_slot.declaring_contract,
                ChangeRecord::NewStorageEntry {
                    label: new_slot.label.clone(),
                    type_ref: new_slot.type_ref.clone(),
                },
            );
        }

        Ok(())
    }

    fn diff_pair(&mut self, owner: &str, old: &StorageSlot, latest: &StorageSlot) -> DiffResult<()> {
        self.info.touch(owner);

        let mut change = SlotChange {
            slot: Delta::between(old.slot.clone(), latest.slot.clone()),
            offset: Delta::between(old.offset, latest.offset),
            label: Delta::between(old.label.clone(), latest.label.clone()),
            type_ref: None,
        };

        // Refs embed AST ids, so a differing ref only counts when the types
        // behind it differ too.
        if old.type_ref != latest.type_ref && !self.graph.types_equal(&old.type_ref, &latest.type_ref)? {
            change.type_ref = Some(Delta::new(old.type_ref.clone(), latest.type_ref.clone()));
        }

        if !change.is_empty() {
            self.info.record(owner, ChangeRecord::StorageChange(change));
        }

        self.diff_types(owner, &old.type_ref, &latest.type_ref)
    }

    fn diff_types(&mut self, owner: &str, old: &TypeRef, latest: &TypeRef) -> DiffResult<()> {
        let old_ty = self.graph.resolve_old(old)?;
        let latest_ty = self.graph.resolve_latest(latest)?;

        let change = descriptor_change(old_ty, latest_ty);
        if !change.is_empty() {
            self.info.record(owner, ChangeRecord::TypeChange(change));
        }

        if let (Some(old_members), Some(latest_members)) = (&old_ty.members, &latest_ty.members) {
            self.diff_slot_lists(Scope::Struct(owner), old_members, latest_members)?;
        }

        if let (Some(o), Some(l)) = (&old_ty.value, &latest_ty.value) {
            self.diff_types(owner, o, l)?;
        }

        if let (Some(o), Some(l)) = (&old_ty.base, &latest_ty.base) {
            self.diff_types(owner, o, l)?;
        }

        Ok(())
    }
}

/// Diff two layouts of what is believed to be the same contract.
///
/// `owner` always gets a bucket, so an empty bucket afterwards means the
/// layouts are equivalent.
pub fn diff_contract_storage(
    owner: &str,
    old: &StorageLayout,
    latest: &StorageLayout,
    info: &mut CompareInfo,
) -> DiffResult<()> {
    info.touch(owner);
    StorageDiffEngine::new(old, latest, info).run(&old.slots, &latest.slots)
}

/// Diff two contract layouts, bucketing under the old contract's full name.
pub fn diff_contracts(old: &ContractLayout, latest: &ContractLayout, info: &mut CompareInfo) -> DiffResult<()> {
    let owner = old.full_name();
    debug!(old = %owner, latest = %latest.full_name(), "comparing contract storage");
    diff_contract_storage(&owner, &old.layout, &latest.layout, info)
}

/// `true` when diffing the two layouts produces no records at all.
pub fn layouts_match(old: &StorageLayout, latest: &StorageLayout) -> DiffResult<bool> {
    let mut scratch = CompareInfo::new();
    StorageDiffEngine::new(old, latest, &mut scratch).run(&old.slots, &latest.slots)?;
    Ok(scratch.is_clean())
}
