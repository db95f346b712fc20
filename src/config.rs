use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

static CONFIG_MANAGER: OnceLock<Arc<ConfigManager>> = OnceLock::new();

/// Log level setting persisted in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Application settings, loaded once at startup from
/// `~/.sitepulse/config.json` with environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the SitePulse backend API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Port of the local HTTP surface the GUI connects to
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: usize,
}

fn default_api_base_url() -> String {
    "https://app.sitepulse.io/api".to_string()
}

fn default_listen_port() -> u16 {
    8230
}

fn default_log_to_file() -> bool {
    true
}

fn default_log_max_files() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            listen_port: default_listen_port(),
            log_level: LogLevel::default(),
            log_to_file: default_log_to_file(),
            log_max_files: default_log_max_files(),
        }
    }
}

/// Owner of the `.sitepulse` data directory and the loaded [`AppConfig`].
/// Settings are immutable after startup; edits to the config file take
/// effect on restart.
pub struct ConfigManager {
    config: AppConfig,
    data_dir: PathBuf,
}

impl ConfigManager {
    /// Load the configuration and register the global instance.
    pub fn init() -> Result<Arc<Self>> {
        let data_dir = Self::resolve_data_dir();

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .context("Failed to create .sitepulse data directory")?;
        }

        let mut config = Self::load_config_file(&data_dir)?;
        Self::apply_env_overrides(&mut config);

        let manager = Arc::new(Self { config, data_dir });
        let _ = CONFIG_MANAGER.set(manager.clone());
        Ok(manager)
    }

    /// The global instance, if [`ConfigManager::init`] has run.
    pub fn try_get() -> Option<Arc<Self>> {
        CONFIG_MANAGER.get().cloned()
    }

    pub fn get_config(&self) -> AppConfig {
        self.config.clone()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the persisted session token file
    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Log directory, resolvable before the manager exists
    pub fn get_log_dir() -> PathBuf {
        Self::resolve_data_dir().join("logs")
    }

    fn resolve_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("SITEPULSE_DATA_DIR") {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sitepulse")
    }

    fn load_config_file(data_dir: &Path) -> Result<AppConfig> {
        let config_file = data_dir.join("config.json");
        if !config_file.exists() {
            tracing::debug!(target: "config", "No config file found, using defaults");
            return Ok(AppConfig::default());
        }

        let content =
            std::fs::read_to_string(&config_file).context("Failed to read config file")?;
        serde_json::from_str(&content).context("Failed to parse config file")
    }

    fn apply_env_overrides(config: &mut AppConfig) {
        if let Ok(url) = std::env::var("SITEPULSE_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(port) = std::env::var("SITEPULSE_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }
    }
}
