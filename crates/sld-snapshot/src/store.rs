use sld_types::BuildSnapshot;

use crate::error::{SnapshotError, SnapshotResult};

/// Named snapshot storage.
///
/// Implementations must satisfy:
/// - `load` after `save` under the same name returns an equal snapshot.
/// - Saving under an existing name replaces the previous snapshot.
/// - Loading a name that was never saved is an error, not an empty snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot saved under `name`.
    fn load(&self, name: &str) -> SnapshotResult<BuildSnapshot>;

    /// Save `snapshot` under `name`, replacing any previous one.
    fn save(&self, name: &str, snapshot: &BuildSnapshot) -> SnapshotResult<()>;

    /// Whether a snapshot exists under `name`.
    fn exists(&self, name: &str) -> SnapshotResult<bool>;
}

/// Snapshot names are single path components.
pub(crate) fn validate_name(name: &str) -> SnapshotResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if bad {
        return Err(SnapshotError::InvalidName(name.to_owned()));
    }
    Ok(())
}
