//! Domain error types that callers branch on

use thiserror::Error;

/// Failure to obtain a usable OpenAPI document for a group
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("Request timed out ({0}s)")]
    Timeout(u64),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Invalid document URL: {0}")]
    InvalidUrl(String),
}

/// Rejected global parameter mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobalParamError {
    #[error("Parameter name is required")]
    EmptyName,

    #[error("Parameter value is required")]
    EmptyValue,

    #[error("Parameter {name} ({kind}) already exists")]
    Duplicate { name: String, kind: &'static str },

    #[error("No parameter at position {0}")]
    OutOfRange(usize),
}

/// The body editor does not hold valid JSON
#[derive(Debug, Error)]
#[error("Invalid JSON: {0}")]
pub struct BodyFormatError(#[from] pub serde_json::Error);
