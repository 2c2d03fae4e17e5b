//! Tauri commands for configuration management

use tauri::command;
use tokio::sync::RwLock;

use crate::config::MetrorecConfig;

lazy_static::lazy_static! {
    static ref CONFIG: RwLock<MetrorecConfig> = RwLock::new(MetrorecConfig::load_or_default());
}

/// Snapshot of the shared configuration, used by other command groups
pub(crate) async fn current() -> MetrorecConfig {
    CONFIG.read().await.clone()
}

/// Get the current configuration
#[command]
pub async fn get_config() -> Result<MetrorecConfig, String> {
    Ok(CONFIG.read().await.clone())
}

/// Replace the configuration; validated and persisted to the default path
#[command]
pub async fn update_config(config: MetrorecConfig) -> Result<(), String> {
    config.validate()?;
    if let Err(e) = config.save_to_file(MetrorecConfig::default_path()) {
        log::warn!("Failed to persist config: {}", e);
    }
    *CONFIG.write().await = config;
    log::info!("Configuration updated");
    Ok(())
}

/// Reset the configuration to defaults
#[command]
pub async fn reset_config() -> Result<MetrorecConfig, String> {
    let config = MetrorecConfig::default();
    if let Err(e) = config.save_to_file(MetrorecConfig::default_path()) {
        log::warn!("Failed to persist config: {}", e);
    }
    *CONFIG.write().await = config.clone();
    log::info!("Configuration reset to defaults");
    Ok(config)
}
