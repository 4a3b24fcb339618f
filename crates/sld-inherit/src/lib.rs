//! Inheritance impact analysis for Solidity builds.
//!
//! Reads the top-level nodes of the compiler's ASTs and answers one question:
//! if the storage of contract `X` changes, which other contracts inherit that
//! change? The answer is an [`ImpactMap`](sld_types::ImpactMap) that is stored
//! alongside each snapshot for reporting. The diff engine never consumes it.

pub mod analyzer;
pub mod ast;
pub mod error;

pub use analyzer::{
    analyze_inheritance_impact, extract_inheritance_tree, InheritanceAnalyzer, InheritanceNode,
    InheritanceTree,
};
pub use ast::{parse_sources, AstNode, SourceAst, SourceOutput, SourceUnit};
pub use error::{InheritError, InheritResult};
