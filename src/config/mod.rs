pub mod schema;

pub use schema::{KnowledgeBaseConfig, SupportConfig};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default supportdesk home directory (~/.supportdesk).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".supportdesk"))
        .unwrap_or_else(|| PathBuf::from(".supportdesk"))
}

/// Config file inside a home directory.
pub fn config_path(home_dir: &Path) -> PathBuf {
    home_dir.join("supportdesk.toml")
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<SupportConfig> {
    if path.exists() {
        let contents =
            std::fs::read_to_string(path).context("Failed to read supportdesk config file")?;
        let config: SupportConfig =
            toml::from_str(&contents).context("Failed to parse supportdesk config (TOML)")?;
        for data_map in &config.data_maps {
            data_map
                .validate()
                .with_context(|| format!("Invalid data map in {}", path.display()))?;
        }
        Ok(config)
    } else {
        Ok(SupportConfig::default())
    }
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &SupportConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents).context("Failed to write config file")?;
    Ok(())
}
