//! Enumeration types.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a channel as reported by the wallet.
///
/// Only `Proposed`, `Running` and `Closed` drive lifecycle decisions; the
/// remaining statuses are wallet-internal waypoints between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ChannelStatus {
    /// A counterparty proposed the channel; we have not joined yet.
    Proposed,
    /// Joined, pre-fund state countersigned.
    Opening,
    /// Waiting for funding to be recorded.
    Funding,
    /// Setup complete; application states may be exchanged.
    Running,
    /// A final state has been proposed.
    Closing,
    /// Both parties signed a final state.
    Closed,
}

impl ChannelStatus {
    /// Whether the channel accepts application state updates.
    pub fn is_running(&self) -> bool {
        *self == ChannelStatus::Running
    }

    /// Whether the channel reached a terminal status.
    pub fn is_closed(&self) -> bool {
        *self == ChannelStatus::Closed
    }
}

impl std::fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChannelStatus::Proposed => "proposed",
            ChannelStatus::Opening => "opening",
            ChannelStatus::Funding => "funding",
            ChannelStatus::Running => "running",
            ChannelStatus::Closing => "closing",
            ChannelStatus::Closed => "closed",
        };
        write!(f, "{}", s)
    }
}

/// Application-level state of a query round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum QueryStateType {
    /// The payer asked a query and locked a payment for it.
    QueryRequested = 0,
    /// The provider answered and attested to the response.
    AttestationProvided = 1,
    /// The provider refused the query; the payment stays with the payer.
    QueryDeclined = 2,
}

impl QueryStateType {
    /// Whether this is a provider response to a query.
    pub fn is_response(&self) -> bool {
        matches!(
            self,
            QueryStateType::AttestationProvided | QueryStateType::QueryDeclined
        )
    }
}

impl std::fmt::Display for QueryStateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QueryStateType::QueryRequested => "QueryRequested",
            QueryStateType::AttestationProvided => "AttestationProvided",
            QueryStateType::QueryDeclined => "QueryDeclined",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_status_predicates() {
        assert!(ChannelStatus::Running.is_running());
        assert!(!ChannelStatus::Proposed.is_running());
        assert!(ChannelStatus::Closed.is_closed());
        assert!(!ChannelStatus::Closing.is_closed());
    }

    #[test]
    fn test_channel_status_serde() {
        let json = serde_json::to_string(&ChannelStatus::Proposed).unwrap();
        assert_eq!(json, "\"proposed\"");
        let status: ChannelStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(status, ChannelStatus::Running);
        assert_eq!(status.to_string(), "running");
    }

    #[test]
    fn test_query_state_type() {
        assert!(!QueryStateType::QueryRequested.is_response());
        assert!(QueryStateType::AttestationProvided.is_response());
        assert!(QueryStateType::QueryDeclined.is_response());
        assert_eq!(
            QueryStateType::AttestationProvided.to_string(),
            "AttestationProvided"
        );
    }
}
