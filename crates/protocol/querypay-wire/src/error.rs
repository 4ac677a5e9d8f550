//! Error types for querypay-wire

use querypay_types::ErrorCode;
use thiserror::Error;

/// Errors that can occur while encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// CBOR serialization failed
    #[error("CBOR encoding failed: {0}")]
    Cbor(String),

    /// Encoded body exceeds the protocol limit
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

impl From<ciborium::ser::Error<std::io::Error>> for EncodeError {
    fn from(e: ciborium::ser::Error<std::io::Error>) -> Self {
        EncodeError::Cbor(e.to_string())
    }
}

/// Errors that can occur while decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before the declared frame did
    #[error("truncated message: expected {expected} bytes, got {got}")]
    TruncatedMessage { expected: usize, got: usize },

    /// First byte is not the protocol magic
    #[error("invalid magic byte: expected {expected:#04x}, got {got:#04x}")]
    InvalidMagic { expected: u8, got: u8 },

    /// Unsupported protocol version
    #[error("unsupported protocol version: expected {expected}, got {got}")]
    InvalidVersion { expected: u8, got: u8 },

    /// Declared body length exceeds the protocol limit
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Bytes left over after the declared frame
    #[error("{extra} trailing bytes after message body")]
    TrailingBytes { extra: usize },

    /// CBOR body could not be decoded
    #[error("payload decode failed: {0}")]
    PayloadDecodeFailed(String),
}

impl EncodeError {
    /// Map to a protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidMessage
    }
}

impl DecodeError {
    /// Map to a protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidMessage
    }
}
