use crate::error::{Result, TrackerError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub map: MapSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Path joined onto `base_url`, or an absolute `http(s)://` URL used as-is.
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            endpoint: "/api/clients".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiSettings {
    /// Full URL the client list is fetched from.
    pub fn url(&self) -> String {
        if self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://") {
            return self.endpoint.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MapSettings {
    pub zoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: crate::view::DEFAULT_ZOOM,
            api_key: None,
        }
    }
}

/// Command-line or environment values that take precedence over the file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub maps_api_key: Option<String>,
}

impl Config {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.api.endpoint = endpoint;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.api.timeout_ms = timeout_ms;
        }
        if let Some(key) = non_blank(overrides.maps_api_key) {
            self.map.api_key = Some(key);
        }
    }
}

/// A blank key counts as no key.
fn non_blank(key: Option<String>) -> Option<String> {
    key.filter(|k| !k.trim().is_empty())
}

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "compressor-tracker") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.compressor-tracker/
    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        TrackerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".compressor-tracker"))
}

/// Load config.toml, falling back to defaults when it doesn't exist
pub fn load_config(cfg_dir: &Path) -> Result<Config> {
    let path = cfg_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| TrackerError::ConfigParse { path, source: e })?;
    config.map.api_key = non_blank(config.map.api_key);
    Ok(config)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "http://127.0.0.1:8080"
endpoint = "/api/clients"   # or a full URL, e.g. "https://crm.example.com/api/clients"
timeout_ms = 10000

[map]
zoom = 6
# api_key = "your-maps-api-key"   # or set TRACKER_MAPS_API_KEY
"#;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
