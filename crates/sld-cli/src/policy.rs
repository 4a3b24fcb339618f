//! Pass/fail decision for a finished comparison.

use sld_types::CompareInfo;

use crate::config::CompareMode;

pub const EQUAL_MESSAGE: &str = "Current snapshot is equal to the current version of contracts!";
pub const STRICT_FAILURE: &str = "Strict mode! Logic changes or storage layout changes detected!";
pub const SOFT_FAILURE: &str = "Soft mode! Storage layout changes detected!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The saved and current snapshots are identical.
    Identical,
    /// Differences exist but the mode tolerates them.
    Passed,
    /// The mode rejects the differences; carries the failure message.
    Failed(&'static str),
}

/// `identical` is snapshot equality, which also covers metadata the diff
/// engine never reports on (compiler versions, inheritance impact).
pub fn evaluate(mode: CompareMode, identical: bool, info: &CompareInfo) -> Verdict {
    if identical {
        return Verdict::Identical;
    }
    match mode {
        CompareMode::Strict => Verdict::Failed(STRICT_FAILURE),
        CompareMode::Soft if !info.is_clean() => Verdict::Failed(SOFT_FAILURE),
        CompareMode::Soft | CompareMode::None => Verdict::Passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sld_types::ChangeRecord;

    fn dirty() -> CompareInfo {
        let mut info = CompareInfo::new();
        info.record(
            "contracts/A.sol:A",
            ChangeRecord::NewStorageEntry { label: "x".into(), type_ref: "t_bool".into() },
        );
        info
    }

    fn clean() -> CompareInfo {
        let mut info = CompareInfo::new();
        info.touch("contracts/A.sol:A");
        info
    }

    #[test]
    fn identical_snapshots_always_pass() {
        for mode in [CompareMode::Strict, CompareMode::Soft, CompareMode::None] {
            assert_eq!(evaluate(mode, true, &clean()), Verdict::Identical);
        }
    }

    #[test]
    fn strict_fails_on_any_difference() {
        assert_eq!(evaluate(CompareMode::Strict, false, &clean()), Verdict::Failed(STRICT_FAILURE));
        assert!(matches!(evaluate(CompareMode::Strict, false, &dirty()), Verdict::Failed(_)));
    }

    #[test]
    fn soft_fails_only_on_records() {
        assert_eq!(evaluate(CompareMode::Soft, false, &clean()), Verdict::Passed);
        assert_eq!(evaluate(CompareMode::Soft, false, &dirty()), Verdict::Failed(SOFT_FAILURE));

        let mut info = CompareInfo::new();
        info.record_info(ChangeRecord::RemovedContract { contract: "contracts/B.sol:B".into() });
        assert!(matches!(evaluate(CompareMode::Soft, false, &info), Verdict::Failed(_)));
    }

    #[test]
    fn none_never_fails() {
        assert_eq!(evaluate(CompareMode::None, false, &dirty()), Verdict::Passed);
    }
}
