//! Client configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app: AppSettings,
    pub api: ApiConfig,
    pub gateway: GatewaySettings,
    pub reconnect: ReconnectSettings,
    /// JSON file holding `{"email": .., "password": ..}`
    pub credentials_file: PathBuf,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// REST API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
}

/// Gateway connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    /// Fixed gateway URL; when absent the URL is discovered over REST
    pub url: Option<String>,
    /// Pre-issued token; when absent the client logs in with credentials
    pub token: Option<String>,
    /// Capacity of the outbound frame queue
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

/// Reconnect behaviour after a lost connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReconnectSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub delay_ms: u64,
    pub max_attempts: Option<u32>,
}

impl ReconnectSettings {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 0,
            max_attempts: None,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "relaycord".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_api_base_url() -> String {
    "https://discordapp.com/api".to_string()
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("conf.json")
}

fn default_event_buffer() -> usize {
    100
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// `from_env` is this with the process environment as the source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ApiConfig {
                base_url: lookup("API_BASE_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_api_base_url),
            },
            gateway: GatewaySettings {
                url: lookup("GATEWAY_URL").filter(|s| !s.is_empty()),
                token: lookup("GATEWAY_TOKEN").filter(|s| !s.is_empty()),
                event_buffer: parse_var(&lookup, "GATEWAY_EVENT_BUFFER")?
                    .unwrap_or_else(default_event_buffer),
            },
            reconnect: ReconnectSettings {
                enabled: parse_bool(&lookup, "GATEWAY_RECONNECT")?.unwrap_or(false),
                delay_ms: parse_var(&lookup, "GATEWAY_RECONNECT_DELAY_MS")?.unwrap_or(0),
                max_attempts: parse_var(&lookup, "GATEWAY_MAX_RECONNECT_ATTEMPTS")?,
            },
            credentials_file: lookup("CREDENTIALS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_credentials_file),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue(key, raw)),
        },
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
