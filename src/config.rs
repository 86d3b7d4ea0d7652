use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoint_url: String,
    pub jpeg_quality: u8,
    pub request_timeout_secs: u64,
    pub keep_temp_copy: bool,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            jpeg_quality: 100,
            request_timeout_secs: 30,
            keep_temp_copy: true,
            log_level: "info".to_string(),
        }
    }
}

fn get_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not find config directory".to_string()))?
        .join("prediction-uploader");

    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("config.json"))
}

pub fn load_config() -> AppResult<Config> {
    let config_path = get_config_path()?;

    if config_path.exists() {
        let config_str = fs::read_to_string(&config_path)?;
        let config = parse_config_str(&config_str);

        // Validate config before returning
        validate_config(&config)?;

        Ok(config)
    } else {
        // Create default config
        let default_config = Config::default();
        save_config_internal(&default_config)?;
        Ok(default_config)
    }
}

fn save_config_internal(config: &Config) -> AppResult<()> {
    let config_path = get_config_path()?;

    // Create backup of existing config
    if config_path.exists() {
        let backup_path = config_path.with_extension("json.bak");
        if let Err(e) = fs::copy(&config_path, &backup_path) {
            log::warn!("Failed to create config backup: {}", e);
        }
    }

    let config_str = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, config_str)?;

    log::info!("Configuration saved successfully");
    Ok(())
}

/// Parse a config file body, falling back to defaults on bad JSON.
/// Runs before logging is initialized, so the warning goes to stderr.
fn parse_config_str(config_str: &str) -> Config {
    serde_json::from_str(config_str).unwrap_or_else(|e| {
        eprintln!("Warning: failed to parse config file: {}. Using defaults.", e);
        Config::default()
    })
}

pub fn get_temp_directory() -> AppResult<PathBuf> {
    let temp_dir = std::env::temp_dir().join("prediction_uploader");
    fs::create_dir_all(&temp_dir)?;
    Ok(temp_dir)
}

pub fn validate_config(config: &Config) -> AppResult<()> {
    if config.jpeg_quality == 0 || config.jpeg_quality > 100 {
        return Err(AppError::validation(
            "jpeg_quality",
            "Must be between 1 and 100",
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(AppError::validation(
            "request_timeout_secs",
            "Must be greater than 0",
        ));
    }

    crate::security::InputValidator::validate_endpoint_url(&config.endpoint_url)?;

    // Validate log level
    let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(AppError::validation("log_level", "Must be a valid log level"));
    }

    Ok(())
}

// Reset configuration to defaults
pub fn reset_config() -> AppResult<()> {
    let config_path = get_config_path()?;

    // Backup existing config
    if config_path.exists() {
        let backup_path = config_path.with_extension("json.reset_backup");
        fs::copy(&config_path, &backup_path)?;
        log::info!("Existing config backed up to {}", backup_path.display());
    }

    // Save default config
    let default_config = Config::default();
    save_config_internal(&default_config)?;

    log::info!("Configuration reset to defaults");
    Ok(())
}
