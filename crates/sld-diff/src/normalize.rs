//! Contract normalization: pair up contracts that exist in both snapshots and
//! explain the ones that do not.
//!
//! Contracts whose full name appears on both sides are "joint" and come back
//! sorted by full name so they can be diffed positionally. The rest go into
//! per-side pools. When both pools are non-empty, each old contract is tried
//! against the remaining latest contracts in pool order and the first one with
//! an identical layout is taken as a rename. The matching is greedy: with
//! several structurally identical candidates, collection order decides.
//!
//! A contract compiled by several build jobs shows up once per job. Copies
//! with equal layouts collapse into the first one seen.

use std::collections::{BTreeMap, BTreeSet};

use sld_types::{ChangeRecord, ChangeSet, ContractLayout};
use tracing::debug;

use crate::error::{DiffError, DiffResult, Side};
use crate::storage_diff::layouts_match;

/// Outcome of normalizing two contract collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Normalized {
    /// Joint old contracts, sorted by full name.
    pub old: Vec<ContractLayout>,
    /// Joint latest contracts, sorted by full name. Same length as `old`.
    pub latest: Vec<ContractLayout>,
    /// New, removed and renamed contracts.
    pub informational: ChangeSet,
}

impl Normalized {
    /// Iterate the matched pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&ContractLayout, &ContractLayout)> {
        self.old.iter().zip(&self.latest)
    }
}

/// Partition, sort and resolve the two collections.
pub fn normalize_contracts(
    old: Vec<ContractLayout>,
    latest: Vec<ContractLayout>,
) -> DiffResult<Normalized> {
    let (old, old_names) = dedup_contracts(old, Side::Old)?;
    let (latest, latest_names) = dedup_contracts(latest, Side::Latest)?;

    let (mut joint_old, old_pool) = partition(old, &latest_names);
    let (mut joint_latest, latest_pool) = partition(latest, &old_names);

    joint_old.sort_by_cached_key(ContractLayout::full_name);
    joint_latest.sort_by_cached_key(ContractLayout::full_name);

    let informational = resolve_pools(&old_pool, &latest_pool)?;

    Ok(Normalized {
        old: joint_old,
        latest: joint_latest,
        informational,
    })
}

/// Drop repeated copies of a contract, keeping the first. Copies whose layouts
/// disagree are a consistency violation.
fn dedup_contracts(
    contracts: Vec<ContractLayout>,
    side: Side,
) -> DiffResult<(Vec<ContractLayout>, BTreeSet<String>)> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut kept: Vec<ContractLayout> = Vec::with_capacity(contracts.len());

    for contract in contracts {
        let name = contract.full_name();
        match seen.get(&name) {
            Some(&index) if kept[index].layout == contract.layout => {
                debug!(contract = %name, %side, "skipping repeated contract");
            }
            Some(_) => return Err(DiffError::DuplicateContract { contract: name, side }),
            None => {
                seen.insert(name, kept.len());
                kept.push(contract);
            }
        }
    }

    Ok((kept, seen.into_keys().collect()))
}

/// Split into (joint, pool), preserving collection order in both.
fn partition(
    contracts: Vec<ContractLayout>,
    other_side: &BTreeSet<String>,
) -> (Vec<ContractLayout>, Vec<ContractLayout>) {
    contracts
        .into_iter()
        .partition(|c| other_side.contains(&c.full_name()))
}

/// Turn the unmatched pools into informational records.
pub fn resolve_pools(
    old_pool: &[ContractLayout],
    latest_pool: &[ContractLayout],
) -> DiffResult<ChangeSet> {
    let mut records = ChangeSet::new();

    if old_pool.is_empty() {
        records.extend(latest_pool.iter().map(new_contract));
        return Ok(records);
    }

    if latest_pool.is_empty() {
        records.extend(old_pool.iter().map(removed_contract));
        return Ok(records);
    }

    let mut remaining: Vec<&ContractLayout> = latest_pool.iter().collect();

    for old in old_pool {
        let mut matched = None;
        for (index, candidate) in remaining.iter().enumerate() {
            if layouts_match(&old.layout, &candidate.layout)? {
                matched = Some(index);
                break;
            }
        }

        match matched {
            Some(index) => {
                let candidate = remaining.remove(index);
                debug!(from = %old.full_name(), to = %candidate.full_name(), "contract renamed");
                records.insert(ChangeRecord::RenamedContract {
                    from: old.full_name(),
                    to: candidate.full_name(),
                });
            }
            None => {
                records.insert(removed_contract(old));
            }
        }
    }

    records.extend(remaining.into_iter().map(new_contract));
    Ok(records)
}

fn new_contract(contract: &ContractLayout) -> ChangeRecord {
    ChangeRecord::NewContract {
        contract: contract.full_name(),
    }
}

fn removed_contract(contract: &ContractLayout) -> ChangeRecord {
    ChangeRecord::RemovedContract {
        contract: contract.full_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_types::{StorageLayout, StorageSlot, TypeDescriptor, TypeDictionary};

    fn contract(source: &str, name: &str, labels: &[&str]) -> ContractLayout {
        let owner = format!("{source}:{name}");
        let mut types = TypeDictionary::new();
        types.insert("t_uint256", TypeDescriptor::inplace("uint256", "32"));
        let slots = labels
            .iter()
            .enumerate()
            .map(|(i, label)| StorageSlot::new(owner.clone(), *label, i.to_string(), 0, "t_uint256"))
            .collect();
        ContractLayout::new(source, name, StorageLayout::new(slots, types))
    }

    fn names(contracts: &[ContractLayout]) -> Vec<String> {
        contracts.iter().map(ContractLayout::full_name).collect()
    }

    #[test]
    fn identical_collections_pair_up() {
        let d = contract("contracts/D.sol", "D", &["a", "b"]);
        let n = normalize_contracts(vec![d.clone()], vec![d]).unwrap();
        assert_eq!(n.old, n.latest);
        assert!(n.informational.is_empty());
    }

    #[test]
    fn joint_contracts_are_sorted_by_full_name() {
        let old = vec![
            contract("b.sol", "B", &["x"]),
            contract("a.sol", "A", &["x"]),
            contract("c.sol", "C", &["x"]),
        ];
        let latest = vec![
            contract("c.sol", "C", &["x"]),
            contract("b.sol", "B", &["x"]),
            contract("a.sol", "A", &["x"]),
        ];
        let n = normalize_contracts(old, latest).unwrap();
        assert_eq!(names(&n.old), ["a.sol:A", "b.sol:B", "c.sol:C"]);
        assert_eq!(names(&n.latest), names(&n.old));
        assert_eq!(n.pairs().count(), 3);
    }

    #[test]
    fn only_new_contracts() {
        let a = contract("a.sol", "A", &["x"]);
        let n = normalize_contracts(vec![a.clone()], vec![a, contract("b.sol", "B", &["y"])]).unwrap();
        assert_eq!(n.old.len(), 1);
        assert_eq!(
            n.informational.into_iter().collect::<Vec<_>>(),
            [ChangeRecord::NewContract { contract: "b.sol:B".into() }]
        );
    }

    #[test]
    fn only_removed_contracts() {
        let a = contract("a.sol", "A", &["x"]);
        let n = normalize_contracts(vec![a.clone(), contract("b.sol", "B", &["y"])], vec![a]).unwrap();
        assert_eq!(
            n.informational.into_iter().collect::<Vec<_>>(),
            [ChangeRecord::RemovedContract { contract: "b.sol:B".into() }]
        );
    }

    #[test]
    fn identical_layout_under_new_name_is_a_rename() {
        let old = contract("contracts/Old.sol", "Token", &["supply", "owner"]);
        let latest = contract("contracts/New.sol", "TokenV2", &["supply", "owner"]);
        let n = normalize_contracts(vec![old], vec![latest]).unwrap();
        assert!(n.old.is_empty() && n.latest.is_empty());
        assert_eq!(
            n.informational.into_iter().collect::<Vec<_>>(),
            [ChangeRecord::RenamedContract {
                from: "contracts/Old.sol:Token".into(),
                to: "contracts/New.sol:TokenV2".into(),
            }]
        );
    }

    #[test]
    fn unmatched_pools_fall_back_to_new_and_removed() {
        let old = vec![
            contract("x.sol", "X", &["a"]),
            contract("y.sol", "Y", &["b", "c"]),
        ];
        let latest = vec![
            contract("y2.sol", "Y2", &["b", "c"]),
            contract("z.sol", "Z", &["q"]),
        ];
        let n = normalize_contracts(old, latest).unwrap();
        let expected: ChangeSet = [
            ChangeRecord::RemovedContract { contract: "x.sol:X".into() },
            ChangeRecord::RenamedContract { from: "y.sol:Y".into(), to: "y2.sol:Y2".into() },
            ChangeRecord::NewContract { contract: "z.sol:Z".into() },
        ]
        .into_iter()
        .collect();
        assert_eq!(n.informational, expected);
    }

    /// Two old and two latest contracts with the same layout: the first old
    /// contract takes the first latest candidate, whatever the names suggest.
    #[test]
    fn greedy_matching_pairs_in_collection_order() {
        let old = vec![
            contract("vault.sol", "Vault", &["balance"]),
            contract("pool.sol", "Pool", &["balance"]),
        ];
        let latest = vec![
            contract("pool_v2.sol", "PoolV2", &["balance"]),
            contract("vault_v2.sol", "VaultV2", &["balance"]),
        ];
        let n = normalize_contracts(old, latest).unwrap();
        let expected: ChangeSet = [
            ChangeRecord::RenamedContract { from: "vault.sol:Vault".into(), to: "pool_v2.sol:PoolV2".into() },
            ChangeRecord::RenamedContract { from: "pool.sol:Pool".into(), to: "vault_v2.sol:VaultV2".into() },
        ]
        .into_iter()
        .collect();
        assert_eq!(n.informational, expected);
    }

    #[test]
    fn matched_candidate_is_not_reused() {
        let old = vec![
            contract("a.sol", "A", &["v"]),
            contract("b.sol", "B", &["v"]),
        ];
        let latest = vec![contract("c.sol", "C", &["v"])];
        let n = normalize_contracts(old, latest).unwrap();
        assert!(n
            .informational
            .contains(&ChangeRecord::RenamedContract { from: "a.sol:A".into(), to: "c.sol:C".into() }));
        assert!(n
            .informational
            .contains(&ChangeRecord::RemovedContract { contract: "b.sol:B".into() }));
        assert_eq!(n.informational.len(), 2);
    }

    #[test]
    fn repeated_identical_contracts_collapse() {
        let a = contract("a.sol", "A", &["x"]);
        let n = normalize_contracts(vec![a.clone(), a.clone()], vec![a.clone(), a]).unwrap();
        assert_eq!(names(&n.old), ["a.sol:A"]);
        assert_eq!(names(&n.latest), ["a.sol:A"]);
        assert!(n.informational.is_empty());
    }

    #[test]
    fn conflicting_duplicates_are_rejected() {
        let a = contract("a.sol", "A", &["x"]);
        let other = contract("a.sol", "A", &["y"]);
        let err = normalize_contracts(vec![a.clone()], vec![a, other]).unwrap_err();
        assert_eq!(
            err,
            DiffError::DuplicateContract { contract: "a.sol:A".into(), side: Side::Latest }
        );
    }

    #[test]
    fn broken_candidate_aborts_rename_probing() {
        let old = contract("a.sol", "A", &["x"]);
        let mut latest = contract("b.sol", "B", &["x"]);
        latest.layout.types = TypeDictionary::new();
        let err = normalize_contracts(vec![old], vec![latest]).unwrap_err();
        assert!(matches!(err, DiffError::UnresolvedType { side: Side::Latest, .. }));
    }
}
