//! Result and error types for the core library

use thiserror::Error;

use super::fault::ProviderFault;

/// Core library error type
///
/// `Provider` carries the recognized fault classes that services turn into
/// client-facing 400 responses. Every other variant is unhandled in-core and
/// is expected to reach the host's generic failure handler.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Provider fault: {0}")]
    Provider(ProviderFault),

    #[error("Upstream error ({error_type}/{error_code}): {message}")]
    Upstream {
        error_type: String,
        error_code: String,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an upstream error for a provider response outside the known fault classes
    pub fn upstream(
        error_type: impl Into<String>,
        error_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Upstream {
            error_type: error_type.into(),
            error_code: error_code.into(),
            message: message.into(),
        }
    }

    /// The recognized provider fault, if this is one
    pub fn as_fault(&self) -> Option<&ProviderFault> {
        match self {
            Self::Provider(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<ProviderFault> for Error {
    fn from(fault: ProviderFault) -> Self {
        Self::Provider(fault)
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
