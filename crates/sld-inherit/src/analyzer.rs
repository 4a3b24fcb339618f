//! Reverse inheritance: for every contract, who inherits from it.
//!
//! solc already linearizes each contract's bases, so no graph traversal is
//! needed. Each named top-level node is indexed by AST id, and each contract
//! definition's linearization is resolved against that index. Inverting the
//! result gives the [`ImpactMap`]: the contracts whose layout moves when a
//! given ancestor changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sld_types::{full_name, ImpactMap};

use crate::ast::SourceUnit;

/// One contract of the inheritance tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceNode {
    /// Full name (`source:Name`).
    pub name: String,
    /// AST id of the definition.
    pub id: i64,
    /// Resolved ancestors, most derived first. Excludes the contract itself.
    pub ancestors: Vec<String>,
}

/// Contracts of one build with their resolved ancestors, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InheritanceTree {
    nodes: Vec<InheritanceNode>,
}

impl InheritanceTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&InheritanceNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InheritanceNode> {
        self.nodes.iter()
    }

    /// Invert into ancestor -> descendants.
    pub fn impact(&self) -> ImpactMap {
        let mut impact = ImpactMap::new();
        for node in &self.nodes {
            for ancestor in &node.ancestors {
                impact.add_descendant(ancestor, &node.name);
            }
        }
        impact
    }
}

/// Resolve every contract definition's linearization to full names.
///
/// Units are visited in the order given (see
/// [`parse_sources`](crate::parse_sources), which sorts by source id) and
/// nodes in AST order. Nodes without a linearization contribute nothing.
pub fn extract_inheritance_tree(sources: &[SourceUnit]) -> InheritanceTree {
    let mut names_by_id: BTreeMap<i64, String> = BTreeMap::new();
    for unit in sources {
        for node in &unit.nodes {
            if let Some(name) = &node.name {
                names_by_id.insert(node.id, full_name(&unit.path, name));
            }
        }
    }

    let mut tree = InheritanceTree::default();
    for unit in sources {
        for node in &unit.nodes {
            let Some((name, linearized)) = node.as_contract() else {
                continue;
            };
            let contract = full_name(&unit.path, name);

            let ancestors = linearized
                .iter()
                .skip(1)
                .filter_map(|id| {
                    let resolved = names_by_id.get(id).cloned();
                    if resolved.is_none() {
                        warn!(contract = %contract, ancestor_id = id, "unresolved base contract id, skipping");
                    }
                    resolved
                })
                .collect();

            tree.nodes.push(InheritanceNode {
                name: contract,
                id: node.id,
                ancestors,
            });
        }
    }

    debug!(contracts = tree.len(), "extracted inheritance tree");
    tree
}

/// Impact map of a single build.
pub fn analyze_inheritance_impact(sources: &[SourceUnit]) -> ImpactMap {
    extract_inheritance_tree(sources).impact()
}

/// Accumulates the impact maps of several builds.
///
/// A descendant already listed under an ancestor is not listed twice, so
/// overlapping builds of the same project fold together cleanly.
#[derive(Clone, Debug, Default)]
pub struct InheritanceAnalyzer {
    impact: ImpactMap,
}

impl InheritanceAnalyzer {
    /// Create an analyzer with an empty impact map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one build's sources into the accumulated map.
    pub fn add_build(&mut self, sources: &[SourceUnit]) -> &mut Self {
        let build = analyze_inheritance_impact(sources);
        self.impact.merge(&build);
        self
    }

    pub fn impact(&self) -> &ImpactMap {
        &self.impact
    }

    pub fn into_impact(self) -> ImpactMap {
        self.impact
    }
}
