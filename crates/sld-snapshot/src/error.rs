//! Error types for snapshot extraction and persistence.

use std::path::PathBuf;

use sld_inherit::InheritError;

/// Errors from reading build artifacts or reading/writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// A compiled contract carries no `storageLayout` output.
    #[error(
        "could not extract the storage layout of {contract}; \
         enable the `storageLayout` output selection in the compiler settings"
    )]
    MissingStorageLayout { contract: String },

    /// The build-info directory does not exist.
    #[error("build-info directory not found: {0}")]
    MissingBuildInfoDir(PathBuf),

    /// The snapshot directory does not exist.
    #[error("snapshot directory not found: {0}")]
    MissingSnapshotDir(PathBuf),

    /// No saved snapshot under the requested name.
    #[error("could not find saved snapshot of the storage layout: {0}")]
    SnapshotNotFound(PathBuf),

    /// Snapshot names are plain file names.
    #[error("invalid snapshot name: {0:?}")]
    InvalidName(String),

    /// JSON decoding or encoding failed.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The AST section of a build-info file is malformed.
    #[error(transparent)]
    Inherit(#[from] InheritError),

    /// Directory traversal failed.
    #[error("failed to scan build-info directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// I/O error from the underlying filesystem.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
