//! Configuration structs

mod app_config;
mod credentials;

pub use app_config::{
    ApiConfig, AppSettings, ClientConfig, ConfigError, Environment, GatewaySettings,
    ReconnectSettings,
};
pub use credentials::{Credentials, CredentialsError};
