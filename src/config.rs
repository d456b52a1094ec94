use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level sift configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SiftConfig {
    /// Decomposition settings.
    #[serde(default)]
    pub decompose: DecomposeToml,

    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,
}

impl SiftConfig {
    /// Loads a configuration file, or returns the defaults when `path` is
    /// `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

/// `[decompose]` table.
///
/// The stopping criteria stay signed and optional so that absent values can
/// be resolved to defaults and negative ones reported by the library.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecomposeToml {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub num_imfs: Option<usize>,
    #[serde(default = "default_ensemble_size")]
    pub ensemble_size: usize,
    #[serde(default = "default_noise_strength")]
    pub noise_strength: f64,
    #[serde(default)]
    pub s_number: Option<i64>,
    #[serde(default)]
    pub num_siftings: Option<i64>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for DecomposeToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            num_imfs: None,
            ensemble_size: default_ensemble_size(),
            noise_strength: default_noise_strength(),
            s_number: None,
            num_siftings: None,
            seed: 0,
            parallel: true,
        }
    }
}

fn default_method() -> String {
    "eemd".to_string()
}
fn default_ensemble_size() -> usize {
    250
}
fn default_noise_strength() -> f64 {
    0.2
}
fn default_true() -> bool {
    true
}

/// `[io]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default = "default_column")]
    pub column: String,
    #[serde(default = "default_true")]
    pub has_header: bool,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            column: default_column(),
            has_header: true,
            delimiter: default_delimiter(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_column() -> String {
    "0".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}
