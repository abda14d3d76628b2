//! Configuration handling for the plasmid CLI
//!
//! Supports loading configuration from plasmid.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use clap::ValueEnum;
use plasmid_core::{AlignmentParams, SlidingWindowParams, TrimParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "plasmid.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub trim: TrimConfig,
    #[serde(default)]
    pub align: AlignmentParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default number of threads to use
    #[serde(default = "default_threads")]
    pub threads: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TrimMethod {
    /// Mott's maximum-scoring subsequence over error probabilities
    ErrorProbability,
    /// Cut at the first window whose mean quality is too low
    SlidingWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Trimming strategy
    #[serde(default = "default_method")]
    pub method: TrimMethod,

    /// Trimmed reads shorter than this are left out of the FASTQ output
    #[serde(default)]
    pub min_length: usize,

    /// Fail on reads without any base better than the cutoff
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub error_probability: TrimParams,

    #[serde(default)]
    pub sliding_window: SlidingWindowParams,
}

// Default value functions
fn default_threads() -> usize { num_cpus::get() }
fn default_method() -> TrimMethod { TrimMethod::ErrorProbability }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
        }
    }
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            min_length: 0,
            strict: false,
            error_probability: TrimParams::default(),
            sliding_window: SlidingWindowParams::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Render configuration as TOML, as written by [`Config::save_to_file`]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
