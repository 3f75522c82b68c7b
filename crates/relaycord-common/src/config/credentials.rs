//! Login credentials loaded from a local JSON file

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Account credentials used for REST login
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read `{"email": "...", "password": "..."}` from `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CredentialsError> {
        let credentials: Self = serde_json::from_str(raw)?;
        if credentials.email.is_empty() {
            return Err(CredentialsError::Empty("email"));
        }
        if credentials.password.is_empty() {
            return Err(CredentialsError::Empty("password"));
        }
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential loading errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Failed to read credentials file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed credentials file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Credentials field is empty: {0}")]
    Empty(&'static str),
}
