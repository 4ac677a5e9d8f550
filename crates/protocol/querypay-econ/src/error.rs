//! Error types for query payment accounting.

use querypay_types::{Amount, ErrorCode, QueryStateType};
use thiserror::Error;

/// Result type alias for transition operations.
pub type EconResult<T> = std::result::Result<T, EconError>;

/// Errors raised while computing the next application state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EconError {
    /// App data could not be decoded or encoded.
    #[error("invalid app data: {0}")]
    InvalidAppData(String),

    /// The current query round cannot be answered from this state.
    #[error("cannot answer a query in state {found}")]
    UnexpectedStateType { found: QueryStateType },

    /// The requested target is not a query response.
    #[error("{0} is not a valid response state")]
    InvalidTargetState(QueryStateType),

    /// An attestation response must carry a CID and a signature.
    #[error("attestation requires a response CID and a signature")]
    IncompleteAttestation,

    /// Allocations do not have the query channel layout.
    #[error("unsupported allocation: {0}")]
    UnsupportedAllocation(String),

    /// The payer cannot cover the payment.
    #[error("insufficient funds: payer holds {available}, payment is {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    /// Amount arithmetic overflowed.
    #[error("amount overflow")]
    AmountOverflow,
}

impl EconError {
    /// Create an invalid app data error.
    pub fn invalid_app_data(msg: impl Into<String>) -> Self {
        EconError::InvalidAppData(msg.into())
    }

    /// Create an unsupported allocation error.
    pub fn unsupported_allocation(msg: impl Into<String>) -> Self {
        EconError::UnsupportedAllocation(msg.into())
    }

    /// Map to a protocol error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            EconError::InvalidAppData(_) => ErrorCode::InvalidAppData,
            EconError::UnexpectedStateType { .. } | EconError::InvalidTargetState(_) => {
                ErrorCode::InvalidQueryState
            }
            EconError::IncompleteAttestation => ErrorCode::InvalidAttestation,
            EconError::UnsupportedAllocation(_) => ErrorCode::UnsupportedAllocation,
            EconError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            EconError::AmountOverflow => ErrorCode::AmountOverflow,
        }
    }
}
