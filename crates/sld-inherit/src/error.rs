//! Error types for inheritance analysis.

/// Errors that can occur while reading compiler ASTs.
#[derive(Debug, thiserror::Error)]
pub enum InheritError {
    /// The `sources` section of the compiler output is not an object.
    #[error("compiler sources must be an object keyed by source path")]
    NotAnObject,

    /// A source entry could not be decoded.
    #[error("failed to decode AST of {path}: {source}")]
    Decode {
        /// Source path whose entry is malformed.
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for inheritance results.
pub type InheritResult<T> = Result<T, InheritError>;
