//! The slice of the solc AST that inheritance analysis needs.
//!
//! Only top-level nodes are read. Every other AST field is ignored, so the
//! same types decode output from any solc release that emits
//! `linearizedBaseContracts`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{InheritError, InheritResult};

/// One entry of the compiler's `output.sources` object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOutput {
    /// Compiler-assigned source id.
    pub id: u32,
    pub ast: SourceAst,
}

/// Root `SourceUnit` node of one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAst {
    #[serde(default)]
    pub absolute_path: String,
    #[serde(default)]
    pub nodes: Vec<AstNode>,
}

/// A top-level AST node: a contract, library, interface, struct, pragma...
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstNode {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub node_type: String,
    /// Self first, then ancestors from most to least derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linearized_base_contracts: Option<Vec<i64>>,
}

impl AstNode {
    /// Name and linearization of a contract, library or interface definition.
    pub fn as_contract(&self) -> Option<(&str, &[i64])> {
        match (&self.name, &self.linearized_base_contracts) {
            (Some(name), Some(linearized)) => Some((name.as_str(), linearized.as_slice())),
            _ => None,
        }
    }
}

/// A compiled source file: its path as keyed by the compiler, plus its AST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: String,
    pub id: u32,
    pub nodes: Vec<AstNode>,
}

impl SourceUnit {
    pub fn new(path: impl Into<String>, output: SourceOutput) -> Self {
        Self {
            path: path.into(),
            id: output.id,
            nodes: output.ast.nodes,
        }
    }
}

/// Decode a compiler `output.sources` object into source units ordered by
/// source id.
///
/// `null` yields no units, matching builds compiled without AST output.
pub fn parse_sources(sources: &Value) -> InheritResult<Vec<SourceUnit>> {
    let entries: &Map<String, Value> = match sources {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        _ => return Err(InheritError::NotAnObject),
    };

    let mut units = entries
        .iter()
        .map(|(path, entry)| {
            SourceOutput::deserialize(entry)
                .map(|output| SourceUnit::new(path.clone(), output))
                .map_err(|source| InheritError::Decode {
                    path: path.clone(),
                    source,
                })
        })
        .collect::<InheritResult<Vec<_>>>()?;

    units.sort_by_key(|unit| unit.id);
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_contract_and_non_contract_nodes() {
        let sources = json!({
            "contracts/Globals.sol": {
                "id": 1,
                "ast": {
                    "absolutePath": "contracts/Globals.sol",
                    "nodeType": "SourceUnit",
                    "nodes": [
                        { "id": 1, "nodeType": "PragmaDirective", "literals": ["solidity", "^", "0.8", ".0"] },
                        { "id": 2, "nodeType": "VariableDeclaration", "name": "MAX", "constant": true }
                    ]
                }
            },
            "contracts/A.sol": {
                "id": 0,
                "ast": {
                    "absolutePath": "contracts/A.sol",
                    "nodes": [
                        { "id": 10, "nodeType": "ContractDefinition", "name": "A", "linearizedBaseContracts": [10] }
                    ]
                }
            }
        });

        let units = parse_sources(&sources).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].path, "contracts/A.sol");
        assert!(units[0].nodes[0].as_contract().is_some());

        let globals = &units[1];
        assert_eq!(globals.id, 1);
        assert!(globals.nodes[0].name.is_none());
        assert_eq!(globals.nodes[1].name.as_deref(), Some("MAX"));
        assert!(globals.nodes[1].as_contract().is_none());
    }

    #[test]
    fn null_sources_are_empty() {
        assert!(parse_sources(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn malformed_entry_names_its_path() {
        let sources = json!({ "contracts/Broken.sol": { "id": "zero", "ast": {} } });
        match parse_sources(&sources) {
            Err(InheritError::Decode { path, .. }) => assert_eq!(path, "contracts/Broken.sol"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn array_sources_are_rejected() {
        assert!(matches!(parse_sources(&json!([])), Err(InheritError::NotAnObject)));
    }
}
