//! # sld-diff
//!
//! Storage layout diff engine.
//!
//! Given two build snapshots of the same project, this crate pairs up their
//! contracts (detecting renames along the way), walks each pair's slots
//! positionally and compares the type graphs behind them. The outcome is a
//! [`CompareInfo`](sld_types::CompareInfo): deduplicated change records per
//! contract plus contract-level informational records.
//!
//! The engine only reports facts. Whether a given set of records is
//! acceptable is left to the caller.

pub mod compare;
pub mod error;
pub mod normalize;
pub mod storage_diff;
pub mod type_diff;

pub use compare::{compare_contracts, compare_snapshots};
pub use error::{DiffError, DiffResult, Side};
pub use normalize::{normalize_contracts, resolve_pools, Normalized};
pub use storage_diff::{diff_contract_storage, diff_contracts, layouts_match, StorageDiffEngine};
pub use type_diff::{descriptor_change, TypeGraph};
