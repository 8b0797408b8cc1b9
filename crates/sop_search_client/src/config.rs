//! Client config load/save for `~/.sop-assistant/config.yaml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::messages::Domain;

/// Server root used when the config does not name one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "SOP_SEARCH_CONFIG";

/// Server section (base_url, timeout_secs).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ServerSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Search section (default_domain, suggestions).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub search: SearchSection,
}

impl Config {
    pub fn base_url(&self) -> &str {
        self.server.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.server.timeout_secs.map(Duration::from_secs)
    }

    pub fn default_domain(&self) -> Domain {
        self.search
            .default_domain
            .as_deref()
            .map(Domain::from)
            .unwrap_or_default()
    }
}

/// Config load/save error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Returns the default config file path: `~/.sop-assistant/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    let home = home_dir()?;
    Some(home.join(".sop-assistant").join("config.yaml"))
}

#[cfg(unix)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(windows)]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE").map(PathBuf::from)
}

#[cfg(not(any(unix, windows)))]
fn home_dir() -> Option<PathBuf> {
    None
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path` when given, otherwise the default file if it exists, otherwise
/// built-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load(path);
    }
    match default_config_path() {
        Some(path) if path.exists() => load(&path),
        _ => {
            tracing::debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Save config to a YAML file. Creates parent directory if missing.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let contents = serde_yaml::to_string(config).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, contents).map_err(io_err)
}
