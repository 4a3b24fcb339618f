//! Error types for the diff crate.
//!
//! Everything here is a consistency violation: the two inputs were not
//! produced by a compatible pipeline. Layout differences are never errors.

use std::fmt;

use sld_types::TypeRef;

/// Which of the two compared snapshots a value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Old,
    Latest,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => f.write_str("old"),
            Self::Latest => f.write_str("latest"),
        }
    }
}

/// Errors that abort a comparison.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A type reference does not resolve in its own dictionary.
    #[error("unresolved type {type_ref} in the {side} snapshot")]
    UnresolvedType { type_ref: TypeRef, side: Side },

    /// Two contracts in one snapshot share a full name but not a layout.
    #[error("conflicting layouts for contract {contract} in the {side} snapshot")]
    DuplicateContract { contract: String, side: Side },

    /// Normalization produced matched lists of different lengths.
    #[error("matched contract lists differ in length: {old} old vs {latest} latest")]
    MatchedCountMismatch { old: usize, latest: usize },

    /// A positional pair of matched contracts does not share a full name.
    #[error("matched contracts out of step: {old} paired with {latest}")]
    UnpairedContracts { old: String, latest: String },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
