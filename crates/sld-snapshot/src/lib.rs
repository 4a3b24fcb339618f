//! Build-info extraction and snapshot persistence.
//!
//! [`assemble_snapshot`] reads a directory of hardhat build-info files into a
//! [`BuildSnapshot`](sld_types::BuildSnapshot) with its inheritance impact
//! attached. A [`SnapshotStore`] keeps snapshots between runs: the
//! filesystem store writes JSON files, the in-memory one serves tests and
//! embedders.

pub mod assemble;
pub mod build_info;
pub mod error;
pub mod fs;
pub mod memory;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use assemble::{assemble_snapshot, build_info_files};
pub use build_info::{BuildInfo, CompilerOutput, ContractOutput};
pub use error::{SnapshotError, SnapshotResult};
pub use fs::FsSnapshotStore;
pub use memory::InMemorySnapshotStore;
pub use store::SnapshotStore;
