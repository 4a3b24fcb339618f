//! Change records produced by a layout comparison, and the per-contract
//! buckets that collect them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::layout::{Encoding, TypeRef};

/// An `[old, new]` pair for one changed field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Delta<T>(pub T, pub T);

impl<T> Delta<T> {
    /// Pair an old value with its replacement.
    pub fn new(old: T, new: T) -> Self {
        Self(old, new)
    }

    pub fn old(&self) -> &T {
        &self.0
    }

    pub fn new_value(&self) -> &T {
        &self.1
    }
}

impl<T: PartialEq> Delta<T> {
    /// `Some` only when the two sides differ.
    pub fn between(old: T, new: T) -> Option<Self> {
        (old != new).then_some(Self(old, new))
    }
}

/// Slot-level differences between two positionally paired entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Delta<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Delta<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Delta<String>>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<Delta<TypeRef>>,
}

impl SlotChange {
    pub fn is_empty(&self) -> bool {
        self.slot.is_none() && self.offset.is_none() && self.label.is_none() && self.type_ref.is_none()
    }
}

/// Type-level differences between two paired type descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Delta<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Delta<Encoding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_bytes: Option<Delta<String>>,
}

impl TypeChange {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.encoding.is_none() && self.number_of_bytes.is_none()
    }
}

/// A single fact about how two layouts differ.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "changeType")]
pub enum ChangeRecord {
    /// A contract present only in the old snapshot.
    RemovedContract { contract: String },
    /// A contract present only in the latest snapshot.
    NewContract { contract: String },
    /// An old contract whose layout matches a differently named latest one.
    RenamedContract { from: String, to: String },
    /// An entry appended past the end of the old slot (or member) list.
    NewStorageEntry {
        label: String,
        #[serde(rename = "type")]
        type_ref: TypeRef,
    },
    /// An old entry with no positional counterpart in the latest list.
    MissedStorageEntry {
        label: String,
        #[serde(rename = "type")]
        type_ref: TypeRef,
    },
    StorageChange(SlotChange),
    TypeChange(TypeChange),
}

/// Ordered, deduplicated set of records for one bucket.
pub type ChangeSet = BTreeSet<ChangeRecord>;

/// Result of comparing two snapshots.
///
/// `informational` holds contract-level facts (added, removed, renamed);
/// `contracts` holds per-contract storage facts keyed by full name. A present
/// but empty bucket means the contract was compared and nothing changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareInfo {
    pub informational: ChangeSet,
    pub contracts: BTreeMap<String, ChangeSet>,
}

impl CompareInfo {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `contract` has a bucket, even if it stays empty.
    pub fn touch(&mut self, contract: &str) {
        if !self.contracts.contains_key(contract) {
            self.contracts.insert(contract.to_owned(), ChangeSet::new());
        }
    }

    /// Add a record to `contract`'s bucket. Returns `false` for duplicates.
    pub fn record(&mut self, contract: &str, record: ChangeRecord) -> bool {
        self.touch(contract);
        self.contracts
            .get_mut(contract)
            .map(|set| set.insert(record))
            .unwrap_or(false)
    }

    /// Add a record to the informational bucket.
    pub fn record_info(&mut self, record: ChangeRecord) -> bool {
        self.informational.insert(record)
    }

    /// Records for `contract`, if it was compared.
    pub fn records_for(&self, contract: &str) -> Option<&ChangeSet> {
        self.contracts.get(contract)
    }

    /// `true` when no bucket carries a record.
    pub fn is_clean(&self) -> bool {
        self.informational.is_empty() && self.contracts.values().all(BTreeSet::is_empty)
    }

    /// Total number of records across all buckets.
    pub fn record_count(&self) -> usize {
        self.informational.len() + self.contracts.values().map(BTreeSet::len).sum::<usize>()
    }

    /// Buckets that actually carry records.
    pub fn changed_contracts(&self) -> impl Iterator<Item = (&String, &ChangeSet)> {
        self.contracts.iter().filter(|(_, records)| !records.is_empty())
    }
}
