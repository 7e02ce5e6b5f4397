use crate::error::{Result, SatchelError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level satchel configuration stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatchelConfig {
    pub satchel: SatchelSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatchelSettings {
    /// Root directory of the record store the CLI talks to.
    pub store_root: String,
    /// Default tracing filter directive installed by the CLI.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "satchel=info".to_string()
}

impl SatchelConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SatchelError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SatchelError::TomlDe(e.to_string()))
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SatchelError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config for `satchel init`.
    pub fn default_config(base_dir: &Path) -> Self {
        Self {
            satchel: SatchelSettings {
                store_root: base_dir.join("store").display().to_string(),
                log_filter: default_log_filter(),
            },
        }
    }

    /// Resolve the config file path: `<base_dir>/satchel.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("satchel.toml")
    }

    /// Resolve the default satchel home directory: `~/.satchel`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".satchel"))
            .ok_or_else(|| SatchelError::Config("Cannot determine home directory".to_string()))
    }
}
