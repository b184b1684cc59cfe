use thiserror::Error;

use crate::auth::ValidationErrors;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("command failed: {0}")]
    Command(String),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Failures reported by a durable store. Never fatal to the state managers.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("read failed for key {key}: {message}")]
    Read { key: String, message: String },
    #[error("write failed for key {key}: {message}")]
    Write { key: String, message: String },
    #[error("delete failed for key {key}: {message}")]
    Delete { key: String, message: String },
}

impl StoreError {
    pub fn read(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Read {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn write(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Write {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn delete(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Delete {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. } | Self::Write { key, .. } | Self::Delete { key, .. } => key,
        }
    }
}

/// Exercise catalog fetch failures.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("catalog request failed: {0}")]
    Http(String),
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}
