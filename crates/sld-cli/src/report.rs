//! Human-readable and JSON rendering of comparison results.

use std::collections::BTreeMap;
use std::fmt::{Display, Write};

use colored::{ColoredString, Colorize};
use serde::Serialize;

use sld_types::{ChangeRecord, CompareInfo, Delta, ImpactMap, SlotChange, TypeChange};

pub const ATTENTION_BANNER: &str = "\
                            Attention!
    There have been changes in project variables!
    If you do not see errors below, it means that there have been changes in structures that are not related
    to the storage itself, for example, they are only used in functions as a memory type, etc!
    Pay extra attention to this, maybe the business logic has been changed!";

/// One-line, uncolored description of a record.
pub fn describe(record: &ChangeRecord) -> String {
    match record {
        ChangeRecord::RemovedContract { contract } => format!("Removed contract: {contract}"),
        ChangeRecord::NewContract { contract } => format!("New contract: {contract}"),
        ChangeRecord::RenamedContract { from, to } => format!("Renamed contract: {from} -> {to}"),
        ChangeRecord::NewStorageEntry { label, type_ref } => {
            format!("New storage layout entry: label {label} of {type_ref} type in the latest snapshot")
        }
        ChangeRecord::MissedStorageEntry { label, type_ref } => {
            format!("Missed storage layout entry: label {label} of {type_ref} type in the latest snapshot")
        }
        ChangeRecord::StorageChange(change) => format!("Storage change: {}", slot_fields(change)),
        ChangeRecord::TypeChange(change) => format!("Type change: {}", type_fields(change)),
    }
}

fn slot_fields(change: &SlotChange) -> String {
    let mut parts = Vec::new();
    push_delta(&mut parts, "slot", change.slot.as_ref());
    push_delta(&mut parts, "offset", change.offset.as_ref());
    push_delta(&mut parts, "label", change.label.as_ref());
    push_delta(&mut parts, "type", change.type_ref.as_ref());
    parts.join(", ")
}

fn type_fields(change: &TypeChange) -> String {
    let mut parts = Vec::new();
    push_delta(&mut parts, "label", change.label.as_ref());
    push_delta(&mut parts, "encoding", change.encoding.as_ref());
    push_delta(&mut parts, "numberOfBytes", change.number_of_bytes.as_ref());
    parts.join(", ")
}

fn push_delta<T: Display>(parts: &mut Vec<String>, field: &str, delta: Option<&Delta<T>>) {
    if let Some(delta) = delta {
        parts.push(format!("{field} {} -> {}", delta.old(), delta.new_value()));
    }
}

fn colorize(record: &ChangeRecord) -> ColoredString {
    let line = describe(record);
    match record {
        ChangeRecord::NewContract { .. } | ChangeRecord::RenamedContract { .. } => line.cyan(),
        ChangeRecord::NewStorageEntry { .. } => line.yellow(),
        ChangeRecord::RemovedContract { .. }
        | ChangeRecord::MissedStorageEntry { .. }
        | ChangeRecord::StorageChange(_)
        | ChangeRecord::TypeChange(_) => line.red(),
    }
}

/// A comparison together with the inheritance impact of both snapshots.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareReport<'a> {
    #[serde(flatten)]
    pub info: &'a CompareInfo,
    pub impact_old: &'a ImpactMap,
    pub impact_latest: &'a ImpactMap,
    /// Changed contract -> contracts inheriting from it in either snapshot.
    pub affected: BTreeMap<&'a str, Vec<&'a str>>,
}

impl<'a> CompareReport<'a> {
    /// Collect the descendants of every changed contract.
    pub fn new(info: &'a CompareInfo, impact_old: &'a ImpactMap, impact_latest: &'a ImpactMap) -> Self {
        let affected = info
            .changed_contracts()
            .map(|(contract, _)| (contract.as_str(), affected_by(contract, impact_old, impact_latest)))
            .filter(|(_, descendants)| !descendants.is_empty())
            .collect();
        Self {
            info,
            impact_old,
            impact_latest,
            affected,
        }
    }
}

/// Descendants of `contract` in the latest snapshot, then any only the old one
/// knew about.
fn affected_by<'a>(contract: &str, old: &'a ImpactMap, latest: &'a ImpactMap) -> Vec<&'a str> {
    let mut out: Vec<&str> = latest.descendants(contract).iter().map(String::as_str).collect();
    for descendant in old.descendants(contract) {
        if !out.contains(&descendant.as_str()) {
            out.push(descendant);
        }
    }
    out
}

/// Banner, informational section, then one section per changed contract.
pub fn render_compare(report: &CompareReport<'_>) -> String {
    let info = report.info;
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", ATTENTION_BANNER.yellow().bold());

    if !info.informational.is_empty() {
        let _ = writeln!(out, "{}", "Informational".bold());
        for record in &info.informational {
            let _ = writeln!(out, "  {}", colorize(record));
        }
    }

    for (contract, records) in info.changed_contracts() {
        let _ = writeln!(out, "{} {}", "Contract:".bold(), contract.bold());
        for record in records {
            let _ = writeln!(out, "  {}", colorize(record));
        }
        if let Some(descendants) = report.affected.get(contract.as_str()) {
            let _ = writeln!(out, "  {} {}", "affects:".dimmed(), descendants.join(", ").yellow());
        }
    }

    let _ = write!(
        out,
        "{} record(s) across {} contract(s)",
        info.record_count(),
        info.changed_contracts().count()
    );
    out
}

/// Each ancestor followed by the contracts inheriting from it.
pub fn render_impact(impact: &ImpactMap) -> String {
    if impact.is_empty() {
        return "No inheritance relationships found.".into();
    }

    let mut out = String::new();
    for (ancestor, descendants) in impact.iter() {
        let _ = writeln!(out, "{}", ancestor.bold());
        for descendant in descendants {
            let _ = writeln!(out, "  {} {}", "<-".dimmed(), descendant.yellow());
        }
    }
    out.trim_end().to_owned()
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
