// Determine config stuffs

use crate::api::DEFAULT_BASE_URL;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const BASE_URL_ENV: &str = "ATTENDANCE_API_BASE_URL";

lazy_static! {
    static ref APP_DATA: Option<ProjectDirs> =
        ProjectDirs::from("com", "studentmonitoring", "AttendanceScanner");
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the application data directory")]
    AppDataDir,

    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where logs and `config.json` live.
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    APP_DATA
        .as_ref()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::AppDataDir)
}

/// How barcodes reach the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScannerConfig {
    /// USB HID scanner typing into the window.
    Keyboard,
    Serial {
        port: String,
        #[serde(default = "default_baud_rate")]
        baud_rate: u32,
    },
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig::Keyboard
    }
}

fn default_baud_rate() -> u32 {
    9600
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub scanner: ScannerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout_secs: 30,
            scanner: ScannerConfig::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            info!("No config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Config {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            info!("{} set, using backend {}", BASE_URL_ENV, base_url);
            self.api_base_url = base_url;
        }
        self
    }
}

impl Config {
    /// [`Config::load_from`] plus environment overrides.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        Ok(Config::load_from(path)?.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }
}

/// `config.json` from the app data directory, with environment overrides.
pub fn get_config() -> Result<Config, ConfigError> {
    Config::load(&app_data_dir()?.join("config.json"))
}
