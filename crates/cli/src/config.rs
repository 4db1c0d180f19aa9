use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use folio_core::PipelineConfig;

/// CLI configuration loaded from TOML file.
///
/// ```toml
/// compact = false
///
/// [pipeline]
/// chunk_size = 1000
/// chunk_overlap = 200
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Pipeline settings; missing keys keep their defaults.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Default output directory for `folio process`
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Single-line JSON by default
    #[serde(default)]
    pub compact: bool,
}

impl CliConfig {
    /// Return the default config directory path: ~/.config/folio/
    pub fn default_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("could not determine user config directory")?
            .join("folio");
        Ok(config_dir)
    }

    /// Return the default config file path.
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.toml"))
    }

    /// Load config from the given path, or the default path.
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => match Self::default_config_path() {
                Ok(p) => p,
                Err(e) => {
                    debug!(error = %e, "No config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if config_path.exists() {
            debug!(?config_path, "Loading config");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config: {}", config_path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("failed to parse config: {}", config_path.display()))
        } else if path.is_some() {
            anyhow::bail!("config file not found: {}", config_path.display())
        } else {
            debug!(?config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// File settings with environment overrides applied on top.
    pub fn pipeline_with_env(&self) -> Result<PipelineConfig> {
        self.pipeline
            .clone()
            .overlay_env()
            .context("invalid configuration in environment")
    }
}
