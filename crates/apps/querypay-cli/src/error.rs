//! CLI error types.

use querypay_types::ErrorCode;
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Message decoding error.
    #[error("{0}")]
    Decode(#[from] querypay_wire::DecodeError),

    /// Address or hex parsing error.
    #[error("{0}")]
    Crypto(#[from] querypay_crypto::CryptoError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// User-facing error with actionable message.
    #[error("{0}")]
    User(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a user-facing error.
    pub fn user(msg: impl Into<String>) -> Self {
        Self::User(msg.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors: 1
            Self::User(_) => 1,
            // Not found: 2
            Self::FileNotFound(_) => 2,
            // Config errors: 3
            Self::Config(_) | Self::Toml(_) => 3,
            // Malformed input: 4
            Self::Decode(_) | Self::Crypto(_) => 4,
            // IO errors: 9
            Self::Io(_) => 9,
            // JSON/format errors: 10
            Self::Json(_) => 10,
        }
    }

    /// Get the protocol error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            // Input errors
            Self::Decode(e) => e.error_code(),
            Self::Crypto(_) => ErrorCode::InvalidMessage,

            // Everything else is local to the CLI
            Self::Config(_)
            | Self::Toml(_)
            | Self::Json(_)
            | Self::Io(_)
            | Self::User(_)
            | Self::FileNotFound(_) => ErrorCode::InternalError,
        }
    }
}
