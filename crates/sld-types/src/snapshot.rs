//! Whole-build snapshots and the inheritance impact map attached to them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::ContractLayout;

/// Ancestor full name -> full names of every contract inheriting from it.
///
/// Keys iterate in sorted order. Each descendant list keeps the order in which
/// descendants were discovered and holds no duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpactMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ImpactMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `descendant` inherits from `ancestor`.
    ///
    /// Returns `false` if the pair was already present.
    pub fn add_descendant(&mut self, ancestor: &str, descendant: &str) -> bool {
        let list = self.entries.entry(ancestor.to_owned()).or_default();
        if list.iter().any(|d| d == descendant) {
            return false;
        }
        list.push(descendant.to_owned());
        true
    }

    /// Contracts affected by a change to `ancestor`.
    pub fn descendants(&self, ancestor: &str) -> &[String] {
        self.entries.get(ancestor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Fold another map into this one, keeping first-seen order.
    pub fn merge(&mut self, other: &ImpactMap) {
        for (ancestor, descendants) in &other.entries {
            for descendant in descendants {
                self.add_descendant(ancestor, descendant);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }
}

/// Layouts extracted from one compiled unit (one build-info file).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUnit {
    pub contracts: Vec<ContractLayout>,
    /// Build-info format tag, e.g. `hh-sol-build-info-1`.
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub solc_version: String,
    #[serde(default)]
    pub solc_long_version: String,
}

/// Everything needed to compare one compilation of a project with another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSnapshot {
    pub build_infos: Vec<BuildUnit>,
    #[serde(default)]
    pub inheritance_impact: ImpactMap,
}

impl BuildSnapshot {
    pub fn new(build_infos: Vec<BuildUnit>, inheritance_impact: ImpactMap) -> Self {
        Self {
            build_infos,
            inheritance_impact,
        }
    }

    /// All contracts of all units, in unit order then contract order.
    pub fn contracts(&self) -> impl Iterator<Item = &ContractLayout> {
        self.build_infos.iter().flat_map(|unit| unit.contracts.iter())
    }

    /// Flatten into an owned contract list.
    pub fn flatten(&self) -> Vec<ContractLayout> {
        self.contracts().cloned().collect()
    }

    pub fn contract_count(&self) -> usize {
        self.build_infos.iter().map(|u| u.contracts.len()).sum()
    }
}
