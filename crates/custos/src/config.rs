use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use custos_policy::RuntimeConfig;

use crate::error::{RootError, RootResult};

/// Top-level configuration for the Custos root binary.
///
/// Loaded from a TOML file (typically `~/.custos/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    /// General data directory for Custos state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Engine runtime options passed through to the policy loader.
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

fn default_data_dir() -> PathBuf {
    dirs_or_default(".custos")
}

/// Returns `$HOME/<suffix>` if HOME is available, otherwise `./<suffix>`.
fn dirs_or_default(suffix: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(suffix))
        .unwrap_or_else(|_| PathBuf::from(suffix))
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl RootConfig {
    /// Load configuration from a TOML file. If the file does not exist,
    /// returns a default configuration.
    pub fn load(path: &Path) -> RootResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(RootError::Io)?;
        let config: RootConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> RootResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RootError::Config(format!("TOML serialize error: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(RootError::Io)?;
        }
        std::fs::write(path, contents).map_err(RootError::Io)?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> RootResult<()> {
        if let Some(region) = &self.runtime.region {
            if region.is_empty() {
                return Err(RootError::Config("region must not be empty".into()));
            }
        }
        if let Some(account_id) = &self.runtime.account_id {
            if account_id.is_empty() {
                return Err(RootError::Config("account_id must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Return the path to the default config file location.
    pub fn default_config_path() -> PathBuf {
        dirs_or_default(".custos/config.toml")
    }
}
