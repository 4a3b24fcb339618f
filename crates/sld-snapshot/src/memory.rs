use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use sld_types::BuildSnapshot;

use crate::error::{SnapshotError, SnapshotResult};
use crate::store::{validate_name, SnapshotStore};

/// In-memory snapshot store.
///
/// Intended for tests and embedding. Snapshots are cloned on save and load.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<BTreeMap<String, BuildSnapshot>>,
}

impl InMemorySnapshotStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self, name: &str) -> SnapshotResult<BuildSnapshot> {
        validate_name(name)?;
        let map = self.snapshots.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name)
            .cloned()
            .ok_or_else(|| SnapshotError::SnapshotNotFound(name.into()))
    }

    fn save(&self, name: &str, snapshot: &BuildSnapshot) -> SnapshotResult<()> {
        validate_name(name)?;
        let mut map = self.snapshots.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(name.to_owned(), snapshot.clone());
        Ok(())
    }

    fn exists(&self, name: &str) -> SnapshotResult<bool> {
        validate_name(name)?;
        let map = self.snapshots.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_types::{BuildUnit, ImpactMap};

    #[test]
    fn save_then_load() {
        let store = InMemorySnapshotStore::new();
        assert!(store.is_empty());

        let snapshot = BuildSnapshot::new(vec![BuildUnit::default()], ImpactMap::new());
        store.save("before.json", &snapshot).unwrap();
        store.save("after.json", &BuildSnapshot::default()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.load("before.json").unwrap(), snapshot);
        assert!(store.exists("after.json").unwrap());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let store = InMemorySnapshotStore::new();
        assert!(matches!(
            store.load("missing.json"),
            Err(SnapshotError::SnapshotNotFound(_))
        ));
        assert!(!store.exists("missing.json").unwrap());
    }

    #[test]
    fn usable_as_trait_object() {
        let store: Box<dyn SnapshotStore> = Box::new(InMemorySnapshotStore::new());
        store.save("s.json", &BuildSnapshot::default()).unwrap();
        assert_eq!(store.load("s.json").unwrap(), BuildSnapshot::default());
    }
}
