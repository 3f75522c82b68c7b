//! # relaycord-common
//!
//! Shared utilities: environment configuration, credential loading and
//! tracing subscriber setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    ApiConfig, AppSettings, ClientConfig, ConfigError, Credentials, CredentialsError,
    Environment, GatewaySettings, ReconnectSettings,
};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
