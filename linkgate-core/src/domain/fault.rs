//! Provider faults and the normalized client-facing error shape

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::result::{Error, Result};

/// Recognized provider failure classes
///
/// Anything the provider reports outside these classes is not a fault and
/// propagates as an unhandled error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    ItemError,
    InvalidInput,
    InvalidRequest,
}

impl FaultKind {
    /// Map a provider `error_type` string onto a fault class
    pub fn from_error_type(error_type: &str) -> Option<Self> {
        match error_type {
            "ITEM_ERROR" => Some(Self::ItemError),
            "INVALID_INPUT" => Some(Self::InvalidInput),
            "INVALID_REQUEST" => Some(Self::InvalidRequest),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItemError => "ITEM_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidRequest => "INVALID_REQUEST",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recognized provider-side failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} {error_code}: {error_message}")]
pub struct ProviderFault {
    pub kind: FaultKind,
    pub error_code: String,
    pub error_message: String,
}

impl ProviderFault {
    pub fn new(
        kind: FaultKind,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            error_code: error_code.into(),
            error_message: error_message.into(),
        }
    }
}

/// Normalized `{error_code, error_message}` pair sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    pub error_code: String,
    pub error_message: String,
}

impl From<ProviderFault> for ProviderError {
    fn from(fault: ProviderFault) -> Self {
        Self {
            error_code: fault.error_code,
            error_message: fault.error_message,
        }
    }
}

/// `{"error": {...}}` envelope used for every 400 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    pub error: ProviderError,
}

impl From<ProviderError> for ProviderErrorBody {
    fn from(error: ProviderError) -> Self {
        Self { error }
    }
}

/// Outcome of a provider-backed operation at the service boundary
///
/// Expected provider failures are values, not errors: callers match on
/// `Fault` instead of catching. The surrounding `Result` still carries
/// everything that was not anticipated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome<T> {
    Ok(T),
    Fault(ProviderError),
}

impl<T> ProviderOutcome<T> {
    /// Convert a provider call result, turning faults accepted by `handles`
    /// into `Fault`. Rejected faults and all other errors stay in `Err`.
    pub fn recover(result: Result<T>, handles: impl Fn(FaultKind) -> bool) -> Result<Self> {
        match result {
            Ok(value) => Ok(Self::Ok(value)),
            Err(Error::Provider(fault)) if handles(fault.kind) => Ok(Self::Fault(fault.into())),
            Err(e) => Err(e),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderOutcome<U> {
        match self {
            Self::Ok(value) => ProviderOutcome::Ok(f(value)),
            Self::Fault(error) => ProviderOutcome::Fault(error),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, ProviderError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Fault(error) => Err(error),
        }
    }
}
