//! Foundation types for storage layout diffing.
//!
//! This crate models what a Solidity compiler reports about a contract's
//! persistent storage, and what a comparison of two such reports produces.
//! Every other `sld` crate depends on `sld-types`.
//!
//! # Key Types
//!
//! - [`StorageSlot`] — one state variable: declaring contract, label, slot, offset, type
//! - [`TypeRef`] / [`TypeDictionary`] — per-snapshot type table and its handles
//! - [`TypeDescriptor`] — encoding, size and composite structure of one type
//! - [`ContractLayout`] — a contract's ordered slots plus its type table
//! - [`BuildSnapshot`] / [`BuildUnit`] — layouts of a whole build, with the [`ImpactMap`]
//! - [`ChangeRecord`] / [`CompareInfo`] — facts produced by a comparison

pub mod change;
pub mod layout;
pub mod snapshot;

pub use change::{ChangeRecord, ChangeSet, CompareInfo, Delta, SlotChange, TypeChange};
pub use layout::{
    full_name, ContractLayout, Encoding, StorageLayout, StorageSlot,
    TypeDescriptor, TypeDictionary, TypeRef,
};
pub use snapshot::{BuildSnapshot, BuildUnit, ImpactMap};
