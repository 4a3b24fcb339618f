//! Compiler output fixtures shared by the tests of this crate.

use serde_json::{json, Value};

/// A two-file build: `B is A`, plus an `IEmpty` interface with no storage.
pub fn sample_build_info() -> Value {
    json!({
        "_format": "hh-sol-build-info-1",
        "id": "9a3c0e1f",
        "solcVersion": "0.8.17",
        "solcLongVersion": "0.8.17+commit.8df45f5f",
        "input": { "language": "Solidity", "sources": {} },
        "output": {
            "contracts": {
                "contracts/B.sol": {
                    "B": {
                        "abi": [],
                        "storageLayout": {
                            "storage": [
                                { "astId": 3, "contract": "contracts/A.sol:A", "label": "a", "offset": 0, "slot": "0", "type": "t_uint256" },
                                { "astId": 12, "contract": "contracts/B.sol:B", "label": "b", "offset": 0, "slot": "1", "type": "t_address" }
                            ],
                            "types": {
                                "t_address": { "encoding": "inplace", "label": "address", "numberOfBytes": "20" },
                                "t_uint256": { "encoding": "inplace", "label": "uint256", "numberOfBytes": "32" }
                            }
                        }
                    }
                },
                "contracts/A.sol": {
                    "A": {
                        "storageLayout": {
                            "storage": [
                                { "astId": 3, "contract": "contracts/A.sol:A", "label": "a", "offset": 0, "slot": "0", "type": "t_uint256" }
                            ],
                            "types": {
                                "t_uint256": { "encoding": "inplace", "label": "uint256", "numberOfBytes": "32" }
                            }
                        }
                    },
                    "IEmpty": { "storageLayout": { "storage": [], "types": null } }
                }
            },
            "sources": {
                "contracts/A.sol": {
                    "id": 0,
                    "ast": { "absolutePath": "contracts/A.sol", "nodes": [
                        { "id": 1, "nodeType": "PragmaDirective" },
                        { "id": 4, "nodeType": "ContractDefinition", "name": "A", "linearizedBaseContracts": [4] },
                        { "id": 5, "nodeType": "ContractDefinition", "name": "IEmpty", "linearizedBaseContracts": [5] }
                    ] }
                },
                "contracts/B.sol": {
                    "id": 1,
                    "ast": { "absolutePath": "contracts/B.sol", "nodes": [
                        { "id": 13, "nodeType": "ContractDefinition", "name": "B", "linearizedBaseContracts": [13, 4] }
                    ] }
                }
            }
        }
    })
}
