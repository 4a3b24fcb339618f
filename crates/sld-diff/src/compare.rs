//! Whole-snapshot comparison.

use sld_types::{BuildSnapshot, CompareInfo, ContractLayout};
use tracing::{debug, info};

use crate::error::{DiffError, DiffResult};
use crate::normalize::normalize_contracts;
use crate::storage_diff::diff_contracts;

/// Compare two build snapshots and collect every storage difference.
///
/// Identical snapshots short-circuit: every contract still gets its (empty)
/// bucket so callers can list what was checked.
pub fn compare_snapshots(old: &BuildSnapshot, latest: &BuildSnapshot) -> DiffResult<CompareInfo> {
    if old == latest {
        debug!(contracts = old.contract_count(), "snapshots are identical");
        let mut info = CompareInfo::new();
        for contract in old.contracts() {
            info.touch(&contract.full_name());
            for slot in &contract.layout.slots {
                info.touch(&slot.declaring_contract);
            }
        }
        return Ok(info);
    }

    compare_contracts(old.flatten(), latest.flatten())
}

/// Normalize two flat contract lists, diff each matched pair and merge the
/// results with the contract-level records.
pub fn compare_contracts(
    old: Vec<ContractLayout>,
    latest: Vec<ContractLayout>,
) -> DiffResult<CompareInfo> {
    let normalized = normalize_contracts(old, latest)?;

    if normalized.old.len() != normalized.latest.len() {
        return Err(DiffError::MatchedCountMismatch {
            old: normalized.old.len(),
            latest: normalized.latest.len(),
        });
    }

    let mut result = CompareInfo::new();
    for (old, latest) in normalized.pairs() {
        if old.full_name() != latest.full_name() {
            return Err(DiffError::UnpairedContracts {
                old: old.full_name(),
                latest: latest.full_name(),
            });
        }
        diff_contracts(old, latest, &mut result)?;
    }

    result.informational = normalized.informational;

    info!(
        compared = normalized.old.len(),
        informational = result.informational.len(),
        records = result.record_count(),
        "comparison finished"
    );
    Ok(result)
}
