//! Client configuration
//!
//! `Config` mirrors the TOML file as written by the operator; every field is
//! optional so environment variables can fill the gaps. `RuntimeConfig` is
//! the validated form handed to the clients.

use crate::auth::BasicCredentials;
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "fred-client.toml";

/// Environment variable holding an explicit config file path
pub const CONFIG_PATH_ENV: &str = "FRED_CLIENT_CONFIG";

pub const ENV_HTTP_TIMEOUT: &str = "FRED_HTTP_TIMEOUT";
pub const ENV_API_URL: &str = "FRED_API_URL";
pub const ENV_ODATA_URL: &str = "FRED_ODATA_URL";
pub const ENV_USERNAME: &str = "FRED_USERNAME";
pub const ENV_PASSWORD: &str = "FRED_PASSWORD";
pub const ENV_ODATA_VERSION: &str = "FRED_ODATA_VERSION";

const DEFAULT_HTTP_TIMEOUT_MINUTES: u64 = 5;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// OData protocol version spoken by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ODataVersion {
    V3,
    #[default]
    V4,
}

impl FromStr for ODataVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v3" | "3" | "3.0" => Ok(ODataVersion::V3),
            "v4" | "4" | "4.0" => Ok(ODataVersion::V4),
            other => Err(format!("unknown OData version '{}', expected v3 or v4", other)),
        }
    }
}

/// Settings as read from the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub http_timeout_minutes: Option<u64>,
    pub api_base_url: Option<String>,
    pub odata_base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub odata_version: Option<ODataVersion>,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    tracing::warn!(
                        "No {} found, relying on environment variables",
                        DEFAULT_CONFIG_FILE
                    );
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay values found through `lookup` (normally the process environment)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(timeout) = lookup(ENV_HTTP_TIMEOUT) {
            let minutes = timeout.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: ENV_HTTP_TIMEOUT,
                message: e.to_string(),
            })?;
            self.http_timeout_minutes = Some(minutes);
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = Some(url);
        }
        if let Some(url) = lookup(ENV_ODATA_URL) {
            self.odata_base_url = Some(url);
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = Some(password);
        }
        if let Some(version) = lookup(ENV_ODATA_VERSION) {
            let version = version.parse().map_err(|message| ConfigError::Invalid {
                key: ENV_ODATA_VERSION,
                message,
            })?;
            self.odata_version = Some(version);
        }
        Ok(())
    }

    /// Validate and convert into the form used by the clients
    pub fn to_runtime(&self) -> Result<RuntimeConfig, ConfigError> {
        let minutes = self.http_timeout_minutes.unwrap_or(DEFAULT_HTTP_TIMEOUT_MINUTES);
        if minutes == 0 {
            return Err(ConfigError::Invalid {
                key: "http_timeout_minutes",
                message: "must be greater than zero".to_string(),
            });
        }

        let seconds = minutes.checked_mul(60).ok_or(ConfigError::Invalid {
            key: "http_timeout_minutes",
            message: format!("{} minutes is too large", minutes),
        })?;

        let api_base_url = parse_base_url(
            "api_base_url",
            self.api_base_url.as_deref().ok_or(ConfigError::Missing("api_base_url"))?,
        )?;
        let odata_base_url = parse_base_url(
            "odata_base_url",
            self.odata_base_url.as_deref().ok_or(ConfigError::Missing("odata_base_url"))?,
        )?;

        Ok(RuntimeConfig {
            http_timeout: Duration::from_secs(seconds),
            api_base_url,
            odata_base_url,
            username: self.username.clone().unwrap_or_default(),
            password: self.password.clone().unwrap_or_default(),
            odata_version: self.odata_version.unwrap_or_default(),
        })
    }
}

/// Parse an absolute http(s) URL and make sure its path ends with `/`,
/// otherwise `Url::join` would drop the last segment.
pub fn parse_base_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    let url = Url::parse(&with_slash).map_err(|e| ConfigError::Invalid {
        key,
        message: format!("'{}': {}", raw, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Invalid {
            key,
            message: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

/// Validated configuration
#[derive(Clone)]
pub struct RuntimeConfig {
    pub http_timeout: Duration,
    pub api_base_url: Url,
    pub odata_base_url: Url,
    pub username: String,
    pub password: String,
    pub odata_version: ODataVersion,
}

impl RuntimeConfig {
    /// Basic credentials, or `None` when no username is configured
    pub fn credentials(&self) -> Option<BasicCredentials> {
        match BasicCredentials::try_new(self.username.as_str(), self.password.as_str()) {
            Ok(creds) => Some(creds),
            Err(e) => {
                tracing::debug!("Sending requests without Basic auth: {}", e);
                None
            }
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("http_timeout", &self.http_timeout)
            .field("api_base_url", &self.api_base_url.as_str())
            .field("odata_base_url", &self.odata_base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("odata_version", &self.odata_version)
            .finish()
    }
}
