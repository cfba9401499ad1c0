//! Optional `surveyor.toml` configuration.
//!
//! ```toml
//! [log]
//! filter = "surveyor=debug"
//!
//! [output]
//! json = true
//! ```
//!
//! Command-line flags always override the file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "surveyor.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyorConfig {
    pub log: LogConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` env-filter directive.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit JSON payloads even without `--json`.
    pub json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl SurveyorConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist. Without one, `surveyor.toml` in the
    /// working directory is used when present, and defaults otherwise.
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(Path::new(path)),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SurveyorConfig::from_toml_str("", Path::new("surveyor.toml"))
            .expect("empty config should parse");
        assert_eq!(config, SurveyorConfig::default());
        assert!(!config.output.json);
    }

    #[test]
    fn sections_are_parsed() {
        let raw = "[log]\nfilter = \"surveyor=debug\"\n\n[output]\njson = true\n";
        let config = SurveyorConfig::from_toml_str(raw, Path::new("surveyor.toml"))
            .expect("config should parse");
        assert_eq!(config.log.filter.as_deref(), Some("surveyor=debug"));
        assert!(config.output.json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = SurveyorConfig::from_toml_str("[output]\npretty = true\n", Path::new("x.toml"))
            .expect_err("unknown key should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().contains("x.toml"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let error = SurveyorConfig::resolve(Some("/nonexistent/surveyor.toml"))
            .expect_err("missing explicit config should fail");
        assert!(matches!(error, ConfigError::NotFound(_)));
    }
}
