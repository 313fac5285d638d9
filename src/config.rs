//! Configuration management for sitecheck.
//!
//! Settings come from a TOML file, then environment variables, then CLI
//! flags. Every field has a default, so running without a config file works.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::MatchThresholds;
use crate::privacy::PrivacyConfig;
use crate::similarity::DEFAULT_MAX_CHARS;

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "sitecheck.toml";

/// Default corpus directory.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Similarity thresholds and scorer limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Score at or above which a corpus file is an exact match.
    #[serde(default = "default_exact_threshold")]
    pub exact_threshold: f64,

    /// Score strictly above which a corpus file is reported as suspicious.
    #[serde(default = "default_suspicious_threshold")]
    pub suspicious_threshold: f64,

    /// Characters compared per side when scoring.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_exact_threshold() -> f64 {
    1.0
}

fn default_suspicious_threshold() -> f64 {
    0.5
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            exact_threshold: default_exact_threshold(),
            suspicious_threshold: default_suspicious_threshold(),
            max_chars: default_max_chars(),
        }
    }
}

impl MatchingConfig {
    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            exact: self.exact_threshold,
            suspicious: self.suspicious_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |v: f64| (0.0..=1.0).contains(&v);
        if !in_range(self.exact_threshold) || !in_range(self.suspicious_threshold) {
            return Err(ConfigError::Invalid(
                "matching thresholds must lie between 0.0 and 1.0".to_string(),
            ));
        }
        if self.suspicious_threshold >= self.exact_threshold {
            return Err(ConfigError::Invalid(format!(
                "suspicious_threshold ({}) must be below exact_threshold ({})",
                self.suspicious_threshold, self.exact_threshold
            )));
        }
        if self.max_chars == 0 {
            return Err(ConfigError::Invalid(
                "max_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-format extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Encodings tried in order when decoding CSV files.
    #[serde(default = "default_csv_encodings")]
    pub csv_encodings: Vec<String>,

    /// Tesseract language code.
    #[serde(default = "default_tesseract_language")]
    pub tesseract_language: String,

    /// Fall back to `pdftotext` when the built-in PDF parser fails.
    #[serde(default = "default_true")]
    pub pdftotext_fallback: bool,
}

fn default_csv_encodings() -> Vec<String> {
    vec![
        "utf-8".to_string(),
        "latin1".to_string(),
        "iso-8859-1".to_string(),
    ]
}

fn default_tesseract_language() -> String {
    "eng".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            csv_encodings: default_csv_encodings(),
            tesseract_language: default_tesseract_language(),
            pdftotext_fallback: true,
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Corpus directory. Relative paths in a config file are resolved
    /// against the file's directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Proxy routing.
    #[serde(default)]
    pub privacy: PrivacyConfig,

    /// Similarity thresholds.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            privacy: PrivacyConfig::default(),
            matching: MatchingConfig::default(),
            extraction: ExtractionConfig::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `./sitecheck.toml` and then the
    /// platform config directory are searched, falling back to defaults.
    /// Environment overrides are applied and the result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => match Self::discover() {
                Some(path) => Self::load_from_path(&path)?,
                None => Self::default(),
            },
        };

        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Candidate config file locations, in priority order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sitecheck").join("config.toml"));
        }
        paths
    }

    fn discover() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.is_file())
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.data_dir = resolve_path(&config.data_dir.to_string_lossy(), &base_dir);
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text without resolving paths.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup("SITECHECK_DATA_DIR") {
            if !dir.is_empty() {
                self.data_dir = PathBuf::from(shellexpand::tilde(&dir).as_ref());
            }
        }
        self.privacy = self.privacy.with_overrides_from(lookup);
        self
    }

    /// Apply CLI flag overrides.
    pub fn with_cli_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        proxy: Option<String>,
        proxy_all: bool,
    ) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self.privacy = self.privacy.with_cli_overrides(proxy, proxy_all);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matching.validate()?;
        if self.privacy.proxy_address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "privacy.proxy_address must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve a path that may be relative or start with `~`.
/// - Absolute paths are returned as-is
/// - Paths starting with ~ are expanded
/// - Relative paths are resolved relative to `base_dir`
pub fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path_str);
    let path = Path::new(expanded.as_ref());

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
