//! Shared error type across kpiboard crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Payload could not be decoded into the expected shape.
    Validation,
    /// Durable storage rejected a read or write.
    Persistence,
    /// Required input was missing or unusable.
    Input,
    /// Target does not exist (or could not be removed).
    NotFound,
    /// Auth failed.
    AuthFailed,
    /// Invalid configuration or request.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Validation => "VALIDATION",
            ClientCode::Persistence => "PERSISTENCE",
            ClientCode::Input => "INPUT",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, KpiError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum KpiError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl KpiError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            KpiError::Validation(_) => ClientCode::Validation,
            KpiError::Persistence(_) => ClientCode::Persistence,
            KpiError::Input(_) => ClientCode::Input,
            KpiError::NotFound(_) => ClientCode::NotFound,
            KpiError::AuthFailed => ClientCode::AuthFailed,
            KpiError::BadRequest(_) => ClientCode::BadRequest,
            KpiError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            KpiError::Internal(_) => ClientCode::Internal,
        }
    }
}
