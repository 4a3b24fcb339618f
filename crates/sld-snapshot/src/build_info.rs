//! Hardhat build-info files.
//!
//! A build-info file records one compiler run: its version, input and
//! output. Only the output's `contracts[source][name].storageLayout` and
//! `sources` sections are read here.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use sld_inherit::{parse_sources, SourceUnit};
use sld_types::{full_name, BuildUnit, ContractLayout, StorageLayout};

use crate::error::{SnapshotError, SnapshotResult};

/// The parts of a build-info file that snapshots need.
#[derive(Clone, Debug, Deserialize)]
pub struct BuildInfo {
    #[serde(rename = "_format", default)]
    pub format: String,
    #[serde(rename = "solcVersion", default)]
    pub solc_version: String,
    #[serde(rename = "solcLongVersion", default)]
    pub solc_long_version: String,
    pub output: CompilerOutput,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct CompilerOutput {
    /// Source path -> contract name -> per-contract output.
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, ContractOutput>>,
    /// Kept raw; decoded by the inheritance analyzer.
    #[serde(default)]
    pub sources: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContractOutput {
    /// Present only when the `storageLayout` output selection is enabled.
    #[serde(rename = "storageLayout", default)]
    pub storage_layout: Option<StorageLayout>,
}

impl BuildInfo {
    /// Read and decode one build-info file.
    pub fn read(path: &Path) -> SnapshotResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
        let info: Self = serde_json::from_slice(&bytes).map_err(|e| SnapshotError::json(path, e))?;
        debug!(path = %path.display(), solc = %info.solc_long_version, "read build-info");
        Ok(info)
    }

    /// Split into the layout unit and the decoded source ASTs.
    ///
    /// Contracts come out sorted by full name. A contract without a storage
    /// layout fails the whole unit.
    pub fn into_parts(self) -> SnapshotResult<(BuildUnit, Vec<SourceUnit>)> {
        let mut contracts = Vec::new();
        for (source, outputs) in self.output.contracts {
            for (name, output) in outputs {
                let layout = output.storage_layout.ok_or_else(|| SnapshotError::MissingStorageLayout {
                    contract: full_name(&source, &name),
                })?;
                contracts.push(ContractLayout::new(source.clone(), name, layout));
            }
        }
        contracts.sort_by_cached_key(ContractLayout::full_name);

        let sources = parse_sources(&self.output.sources)?;

        let unit = BuildUnit {
            contracts,
            format: self.format,
            solc_version: self.solc_version,
            solc_long_version: self.solc_long_version,
        };
        Ok((unit, sources))
    }
}
