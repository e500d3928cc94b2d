//! `vn.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vn_gate::GateConfig;
use vn_store::StoreBackend;

/// Config file picked up from the working directory when `--config` is
/// not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "vn.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub store: StoreBackend,
    pub gate: GateConfig,
}

impl LedgerConfig {
    /// Load from `path`, or from `./vn.toml` if it exists, or defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILENAME);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILENAME}; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply `--data-dir` / `--memory`.
    pub fn apply_overrides(&mut self, data_dir: Option<PathBuf>, memory: bool) {
        if memory {
            self.store = StoreBackend::Memory;
        } else if let Some(root) = data_dir {
            self.store = StoreBackend::File { root };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = LedgerConfig::from_toml_str("").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(
            config.store,
            StoreBackend::File {
                root: PathBuf::from(".vn")
            }
        );
        assert!(config.gate.enforce_quota);
    }

    #[test]
    fn full_file_parses() {
        let config = LedgerConfig::from_toml_str(
            r#"
            [store]
            backend = "file"
            root = "/var/lib/vn"

            [gate]
            enforce_commercial_use = false
            "#,
        )
        .unwrap();
        assert_eq!(
            config.store,
            StoreBackend::File {
                root: PathBuf::from("/var/lib/vn")
            }
        );
        assert!(!config.gate.enforce_commercial_use);
        assert!(config.gate.enforce_quota);
    }

    #[test]
    fn memory_backend_parses() {
        let config = LedgerConfig::from_toml_str("[store]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn unknown_backend_rejected() {
        assert!(LedgerConfig::from_toml_str("[store]\nbackend = \"s3\"\n").is_err());
    }

    #[test]
    fn overrides_replace_store() {
        let mut config = LedgerConfig::default();
        config.apply_overrides(Some(PathBuf::from("/tmp/data")), false);
        assert_eq!(
            config.store,
            StoreBackend::File {
                root: PathBuf::from("/tmp/data")
            }
        );

        config.apply_overrides(None, true);
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LedgerConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vn.toml");
        fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();
        let config = LedgerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
    }
}
