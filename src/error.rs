//! Error types shared by both demo services

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {

    // =============================
    // Domain Errors
    // =============================

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Family not found: {0}")]
    FamilyNotFound(Uuid),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Completion gateway error: {0}")]
    Gateway(String),

    #[error("Completion API returned status {status}: {message}")]
    GatewayStatus { status: u16, message: String },

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
