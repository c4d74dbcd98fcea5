// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ConvergeError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("PowerDNS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("PowerDNS {operation} failed with {status}: {message}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        message: String,
    },

    #[error("zone '{zone}' already exists")]
    Conflict { zone: String },

    #[error("zone '{zone}' does not exist")]
    ZoneMissing { zone: String },
}

impl ConvergeError {
    pub fn api(operation: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        ConvergeError::Api {
            operation,
            status,
            message: message.into(),
        }
    }

    /// Authentication or authorization was refused by the server.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ConvergeError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}
