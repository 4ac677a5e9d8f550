//! Error types for querypay-crypto

use thiserror::Error;

/// Errors that can occur in cryptographic operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal encoding
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Invalid key, address or digest length
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,
}
