//! Query application types.
//!
//! A query channel carries one query round at a time in its app data. The
//! payer opens the round in `QueryRequested`; the provider answers with an
//! attestation or declines.

use serde::{Deserialize, Serialize};

use crate::enums::QueryStateType;
use crate::Amount;

/// Proof that a query was answered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Attestation {
    /// Content identifier of the response
    pub response_cid: String,
    /// Provider signature over the response
    pub signature: String,
}

impl Attestation {
    /// Create a new attestation.
    pub fn new(response_cid: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            response_cid: response_cid.into(),
            signature: signature.into(),
        }
    }

    /// The sentinel attestation used when a query is declined.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether both fields are empty.
    pub fn is_empty(&self) -> bool {
        self.response_cid.is_empty() && self.signature.is_empty()
    }

    /// Whether both fields carry a value.
    pub fn is_complete(&self) -> bool {
        !self.response_cid.is_empty() && !self.signature.is_empty()
    }
}

/// Application data of a query channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueryAppData {
    /// Where the current round stands
    pub state_type: QueryStateType,
    /// Content identifier of the request
    pub request_cid: String,
    /// Amount the payer locked for this round
    pub payment_amount: Amount,
    /// Content identifier of the response, empty until attested
    pub response_cid: String,
    /// Attestation signature, empty until attested
    pub signature: String,
}

impl QueryAppData {
    /// Open a new query round.
    pub fn requested(request_cid: impl Into<String>, payment_amount: Amount) -> Self {
        Self {
            state_type: QueryStateType::QueryRequested,
            request_cid: request_cid.into(),
            payment_amount,
            response_cid: String::new(),
            signature: String::new(),
        }
    }

    /// The attestation recorded in this app data.
    pub fn attestation(&self) -> Attestation {
        Attestation::new(self.response_cid.clone(), self.signature.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_attestation() {
        let empty = Attestation::empty();
        assert!(empty.is_empty());
        assert!(!empty.is_complete());

        let partial = Attestation::new("Qm123", "");
        assert!(!partial.is_empty());
        assert!(!partial.is_complete());

        assert!(Attestation::new("Qm123", "0xabc").is_complete());
    }

    #[test]
    fn test_requested_app_data() {
        let data = QueryAppData::requested("QmRequest", 25);
        assert_eq!(data.state_type, QueryStateType::QueryRequested);
        assert_eq!(data.payment_amount, 25);
        assert!(data.attestation().is_empty());
    }
}
