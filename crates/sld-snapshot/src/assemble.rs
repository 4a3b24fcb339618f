//! Turn a directory of build-info files into one [`BuildSnapshot`].

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use sld_inherit::InheritanceAnalyzer;
use sld_types::BuildSnapshot;

use crate::build_info::BuildInfo;
use crate::error::{SnapshotError, SnapshotResult};

/// Every `*.json` file directly inside `dir`, sorted by path.
pub fn build_info_files(dir: &Path) -> SnapshotResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SnapshotError::MissingBuildInfoDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Snapshot the current build: one unit per build-info file, plus the
/// inheritance impact accumulated over all of them.
pub fn assemble_snapshot(dir: &Path) -> SnapshotResult<BuildSnapshot> {
    let files = build_info_files(dir)?;
    let mut analyzer = InheritanceAnalyzer::new();
    let mut units = Vec::with_capacity(files.len());

    for path in &files {
        let (unit, sources) = BuildInfo::read(path)?.into_parts()?;
        debug!(path = %path.display(), contracts = unit.contracts.len(), "extracted build unit");
        analyzer.add_build(&sources);
        units.push(unit);
    }

    let snapshot = BuildSnapshot::new(units, analyzer.into_impact());
    info!(
        dir = %dir.display(),
        units = snapshot.build_infos.len(),
        contracts = snapshot.contract_count(),
        "assembled snapshot"
    );
    Ok(snapshot)
}
