//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::HarnessConfig;

/// `ConfigStore` backed by a YAML file on disk.
///
/// An explicit path (from `--config` or `FUNNELWATCH_CONFIG`) wins; otherwise
/// `~/.funnelwatch/config.yaml` is used. A missing file means defaults.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// Resolved location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if no explicit path is set and the home directory
    /// cannot be determined.
    pub fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".funnelwatch").join("config.yaml"))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<HarnessConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(HarnessConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config: HarnessConfig = if content.trim().is_empty() {
            HarnessConfig::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", path.display()))?
        };
        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}
