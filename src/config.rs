use crate::error::AppError;
use media_capture::{CaptureConfig, HttpUploadConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "civic-report.toml";
const CONFIG_ENV: &str = "CIVIC_REPORT_CONFIG";

/// App settings read from `civic-report.toml`
///
/// Every field is optional in the file; missing ones fall back to the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub upload_path: String,
    pub submit_path: String,
    pub request_timeout_secs: u64,
    pub camera: CaptureConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            upload_path: "api/upload".to_string(),
            submit_path: "api/spots".to_string(),
            request_timeout_secs: 60,
            camera: CaptureConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads the config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::from_toml(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Loads from `$CIVIC_REPORT_CONFIG` or `./civic-report.toml`
    ///
    /// A broken file is logged and replaced by the defaults so the app still
    /// starts.
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(config) => {
                log::debug!("Loaded config: {:?}", config);
                config
            }
            Err(e) => {
                log::error!("Failed to load {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn upload_config(&self) -> HttpUploadConfig {
        HttpUploadConfig {
            server_url: self.server_url.clone(),
            upload_path: self.upload_path.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }

    pub fn submit_url(&self) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.submit_path.trim_start_matches('/')
        )
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}
