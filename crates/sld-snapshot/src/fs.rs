//! Snapshots stored as pretty-printed JSON files in one directory.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use sld_types::BuildSnapshot;

use crate::error::{SnapshotError, SnapshotResult};
use crate::store::{validate_name, SnapshotStore};

/// Filesystem-backed snapshot store.
///
/// `save` creates the directory on demand and replaces files atomically by
/// writing to a temporary file in the same directory first.
#[derive(Clone, Debug)]
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the snapshot called `name` lives.
    pub fn path_for(&self, name: &str) -> SnapshotResult<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(name))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self, name: &str) -> SnapshotResult<BuildSnapshot> {
        let path = self.path_for(name)?;
        if !self.dir.is_dir() {
            return Err(SnapshotError::MissingSnapshotDir(self.dir.clone()));
        }
        if !path.is_file() {
            return Err(SnapshotError::SnapshotNotFound(path));
        }

        let bytes = std::fs::read(&path).map_err(|e| SnapshotError::io(&path, e))?;
        let snapshot = serde_json::from_slice(&bytes).map_err(|e| SnapshotError::json(&path, e))?;
        debug!(path = %path.display(), "loaded snapshot");
        Ok(snapshot)
    }

    fn save(&self, name: &str, snapshot: &BuildSnapshot) -> SnapshotResult<()> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| SnapshotError::io(&self.dir, e))?;

        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| SnapshotError::json(&path, e))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| SnapshotError::io(&self.dir, e))?;
        tmp.write_all(&json).map_err(|e| SnapshotError::io(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| SnapshotError::io(&path, e.error))?;

        info!(path = %path.display(), contracts = snapshot.contract_count(), "saved snapshot");
        Ok(())
    }

    fn exists(&self, name: &str) -> SnapshotResult<bool> {
        Ok(self.path_for(name)?.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_types::{BuildUnit, ContractLayout, ImpactMap, StorageLayout};

    fn snapshot() -> BuildSnapshot {
        let mut impact = ImpactMap::new();
        impact.add_descendant("contracts/A.sol:A", "contracts/B.sol:B");
        BuildSnapshot::new(
            vec![BuildUnit {
                contracts: vec![ContractLayout::new("contracts/A.sol", "A", StorageLayout::default())],
                format: "hh-sol-build-info-1".into(),
                solc_version: "0.8.17".into(),
                solc_long_version: "0.8.17+commit.8df45f5f".into(),
            }],
            impact,
        )
    }

    #[test]
    fn save_creates_directory_and_load_reads_back() {
        let root = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(root.path().join("storage_snapshots"));

        assert!(!store.exists("storage_snapshot.json").unwrap());
        store.save("storage_snapshot.json", &snapshot()).unwrap();
        assert!(store.exists("storage_snapshot.json").unwrap());
        assert_eq!(store.load("storage_snapshot.json").unwrap(), snapshot());
    }

    #[test]
    fn save_replaces_existing_snapshot() {
        let root = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(root.path());
        store.save("s.json", &BuildSnapshot::default()).unwrap();
        store.save("s.json", &snapshot()).unwrap();
        assert_eq!(store.load("s.json").unwrap(), snapshot());
    }

    #[test]
    fn written_json_uses_camel_case_keys() {
        let root = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(root.path());
        store.save("s.json", &snapshot()).unwrap();

        let text = std::fs::read_to_string(root.path().join("s.json")).unwrap();
        assert!(text.contains("\"buildInfos\""));
        assert!(text.contains("\"inheritanceImpact\""));
        assert!(text.contains("\"solcLongVersion\""));
    }

    #[test]
    fn missing_directory_and_file_are_distinct_errors() {
        let root = tempfile::tempdir().unwrap();
        let missing_dir = FsSnapshotStore::new(root.path().join("nope"));
        assert!(matches!(
            missing_dir.load("s.json"),
            Err(SnapshotError::MissingSnapshotDir(_))
        ));

        let store = FsSnapshotStore::new(root.path());
        assert!(matches!(
            store.load("s.json"),
            Err(SnapshotError::SnapshotNotFound(p)) if p == root.path().join("s.json")
        ));
    }

    #[test]
    fn corrupt_snapshot_is_a_json_error() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("s.json"), "[]").unwrap();
        let store = FsSnapshotStore::new(root.path());
        assert!(matches!(store.load("s.json"), Err(SnapshotError::Json { .. })));
    }

    #[test]
    fn names_with_separators_are_rejected() {
        let root = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(root.path());
        assert!(matches!(
            store.save("../s.json", &snapshot()),
            Err(SnapshotError::InvalidName(_))
        ));
    }
}
