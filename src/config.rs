use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/server.json";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "data/chat.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

/// Listening port, resolved as CLI flag, then `PORT` env var, then config.
pub fn resolve_port(cli_port: Option<u16>, config: &AppConfig) -> u16 {
    if let Some(port) = cli_port {
        return port;
    }
    match std::env::var("PORT") {
        Ok(value) => match value.parse() {
            Ok(port) => port,
            Err(err) => {
                log::warn!("Ignoring invalid PORT value `{value}`: {err}");
                config.port
            }
        },
        Err(_) => config.port,
    }
}
