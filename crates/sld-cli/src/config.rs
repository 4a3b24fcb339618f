use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sld.toml";

/// When a comparison fails the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Any difference between the snapshots fails.
    Strict,
    /// Only storage-relevant records fail.
    #[default]
    Soft,
    /// Report only.
    None,
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Soft => "soft",
            Self::None => "none",
        })
    }
}

/// Settings shared by `save` and `compare`.
///
/// Values come from the defaults, then the TOML file, then command-line
/// flags, each layer overriding the previous one field by field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    /// Directory snapshots are saved to and loaded from.
    pub snapshot_path: PathBuf,
    pub snapshot_file_name: String,
    /// Directory holding the compiler's build-info JSON files.
    pub build_info_path: PathBuf,
    pub mode: CompareMode,
    pub print_diff: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("./storage_snapshots"),
            snapshot_file_name: "storage_snapshot.json".into(),
            build_info_path: PathBuf::from("./artifacts/build-info"),
            mode: CompareMode::Soft,
            print_diff: true,
        }
    }
}

impl CompareConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load the explicit file if given, otherwise `sld.toml` in `cwd` if it
    /// exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Full path of the configured snapshot file.
    pub fn snapshot_file(&self) -> PathBuf {
        self.snapshot_path.join(&self.snapshot_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CompareConfig::default();
        assert_eq!(c.snapshot_path, PathBuf::from("./storage_snapshots"));
        assert_eq!(c.snapshot_file_name, "storage_snapshot.json");
        assert_eq!(c.build_info_path, PathBuf::from("./artifacts/build-info"));
        assert_eq!(c.mode, CompareMode::Soft);
        assert!(c.print_diff);
        assert_eq!(c.snapshot_file(), PathBuf::from("./storage_snapshots/storage_snapshot.json"));
    }

    #[test]
    fn file_values_override_defaults_field_by_field() {
        let c = CompareConfig::from_toml(
            r#"
            snapshot_path = "layouts"
            mode = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(c.snapshot_path, PathBuf::from("layouts"));
        assert_eq!(c.mode, CompareMode::Strict);
        assert_eq!(c.snapshot_file_name, "storage_snapshot.json");
        assert!(c.print_diff);
    }

    #[test]
    fn unknown_keys_and_modes_are_rejected() {
        assert!(CompareConfig::from_toml("snapshotPath = \"x\"").is_err());
        assert!(CompareConfig::from_toml("mode = \"lenient\"").is_err());
    }

    #[test]
    fn load_prefers_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "mode = \"none\"").unwrap();
        let explicit = dir.path().join("ci.toml");
        std::fs::write(&explicit, "mode = \"strict\"\nprint_diff = false").unwrap();

        let c = CompareConfig::load(Some(&explicit), dir.path()).unwrap();
        assert_eq!(c.mode, CompareMode::Strict);
        assert!(!c.print_diff);

        let c = CompareConfig::load(None, dir.path()).unwrap();
        assert_eq!(c.mode, CompareMode::None);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CompareConfig::load(None, dir.path()).unwrap(), CompareConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompareConfig::load(Some(&dir.path().join("absent.toml")), dir.path()).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
