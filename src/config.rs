use anyhow::{anyhow, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::controller::{Features, PageConfig};
use crate::simulator::SimulatorConfig;
use crate::storage::StorageKeys;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MOCKCHAT_DATA_DIR";

const APP_DIR: &str = "mockchat";
const CONFIG_FILE: &str = "config.json";
pub const STORAGE_FILE: &str = "storage.json";
pub const LOG_FILE: &str = "mockchat.log";

/// Settings read from `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub storage_keys: StorageKeys,
    pub simulator: SimulatorConfig,
    pub features: Features,
}

impl AppConfig {
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            features: self.features,
            simulator: self.simulator.clone(),
            ..PageConfig::default()
        }
    }

    /// Data directory: CLI flag, then environment, then config file, then platform default
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Ok(dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?
            .join(APP_DIR))
    }
}

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join(APP_DIR);
    Ok(config_dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load the config file, or defaults if it does not exist
pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let file = File::open(path)?;
    let config: AppConfig = serde_json::from_reader(file)
        .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
    info!("Loaded config from {}", path.display());

    Ok(config)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;

    info!("Config saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::ReplyRouting;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"simulator": {"routing": "follow_selection"}, "storage_keys": {"contacts": "people"}}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.simulator.routing, ReplyRouting::FollowSelection);
        assert_eq!(config.simulator.pending_delay_ms, 1000..3000);
        assert_eq!(config.storage_keys.contacts, "people");
        assert_eq!(config.storage_keys.history, "chatHistory");
        assert!(config.features.auto_reply);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");
        let mut config = AppConfig::default();
        config.features.attachments = false;
        config.data_dir = Some(PathBuf::from("/tmp/mockchat-data"));

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_cli_data_dir_wins() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/from/config")),
            ..AppConfig::default()
        };
        let resolved = config.resolve_data_dir(Some(Path::new("/from/cli"))).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }
}
