//! Type graph comparison: resolve handles in their own dictionaries and
//! compare the descriptors they point at.
//!
//! The old side is always resolved through the old dictionary and the latest
//! side through the latest one. Handles are never looked up across snapshots.

use sld_types::{Delta, StorageSlot, TypeChange, TypeDescriptor, TypeDictionary, TypeRef};

use crate::error::{DiffError, DiffResult, Side};

/// A pair of type dictionaries being compared against each other.
#[derive(Clone, Copy, Debug)]
pub struct TypeGraph<'a> {
    old: &'a TypeDictionary,
    latest: &'a TypeDictionary,
}

impl<'a> TypeGraph<'a> {
    pub fn new(old: &'a TypeDictionary, latest: &'a TypeDictionary) -> Self {
        Self { old, latest }
    }

    /// Look up a ref in the old snapshot's dictionary.
    pub fn resolve_old(&self, type_ref: &TypeRef) -> DiffResult<&'a TypeDescriptor> {
        resolve(self.old, type_ref, Side::Old)
    }

    /// Look up a ref in the latest snapshot's dictionary.
    pub fn resolve_latest(&self, type_ref: &TypeRef) -> DiffResult<&'a TypeDescriptor> {
        resolve(self.latest, type_ref, Side::Latest)
    }

    /// Structural equality of two types, one from each dictionary.
    ///
    /// Only `label`, `encoding` and `numberOfBytes` are compared directly;
    /// members, value and base types are compared recursively when both sides
    /// have them. The mapping key is metadata and is ignored.
    pub fn types_equal(&self, old: &TypeRef, latest: &TypeRef) -> DiffResult<bool> {
        let old_ty = self.resolve_old(old)?;
        let latest_ty = self.resolve_latest(latest)?;

        if !descriptor_change(old_ty, latest_ty).is_empty() {
            return Ok(false);
        }

        if let (Some(old_members), Some(latest_members)) = (&old_ty.members, &latest_ty.members) {
            if old_members.len() != latest_members.len() {
                return Ok(false);
            }
            for (o, l) in old_members.iter().zip(latest_members) {
                if !self.entries_equal(o, l)? {
                    return Ok(false);
                }
            }
        }

        if let (Some(o), Some(l)) = (&old_ty.value, &latest_ty.value) {
            if !self.types_equal(o, l)? {
                return Ok(false);
            }
        }

        if let (Some(o), Some(l)) = (&old_ty.base, &latest_ty.base) {
            if !self.types_equal(o, l)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Two entries are equal when their position, label and type all match.
    pub fn entries_equal(&self, old: &StorageSlot, latest: &StorageSlot) -> DiffResult<bool> {
        if old.slot != latest.slot || old.offset != latest.offset || old.label != latest.label {
            return Ok(false);
        }
        self.types_equal(&old.type_ref, &latest.type_ref)
    }
}

fn resolve<'a>(
    types: &'a TypeDictionary,
    type_ref: &TypeRef,
    side: Side,
) -> DiffResult<&'a TypeDescriptor> {
    types.resolve(type_ref).ok_or_else(|| DiffError::UnresolvedType {
        type_ref: type_ref.clone(),
        side,
    })
}

/// The scalar differences between two descriptors.
pub fn descriptor_change(old: &TypeDescriptor, latest: &TypeDescriptor) -> TypeChange {
    TypeChange {
        label: Delta::between(old.label.clone(), latest.label.clone()),
        encoding: Delta::between(old.encoding, latest.encoding),
        number_of_bytes: Delta::between(old.number_of_bytes.clone(), latest.number_of_bytes.clone()),
    }
}
