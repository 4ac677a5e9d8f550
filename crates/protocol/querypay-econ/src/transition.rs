//! The application state transition seam.

use querypay_types::{Allocation, Attestation, QueryStateType};

use crate::error::EconResult;

/// What the provider decided to do with the open query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Target query state
    pub to_state_type: QueryStateType,
    /// Attestation for the response (empty when declining)
    pub attestation: Attestation,
}

impl TransitionRequest {
    /// Answer the query with an attestation.
    pub fn attest(attestation: Attestation) -> Self {
        Self {
            to_state_type: QueryStateType::AttestationProvided,
            attestation,
        }
    }

    /// Decline the query.
    pub fn decline() -> Self {
        Self {
            to_state_type: QueryStateType::QueryDeclined,
            attestation: Attestation::empty(),
        }
    }
}

/// The next application payload of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextState {
    /// Encoded app data
    pub app_data: Vec<u8>,
    /// The channel's single allocation after the transition
    pub allocation: Allocation,
}

/// Computes the next application state of a channel.
///
/// Implementations must be pure: the same inputs always produce the same
/// output and nothing outside the return value changes.
pub trait StateTransition: Send + Sync {
    /// Compute the state that follows `app_data` and `allocations`.
    fn compute_next_state(
        &self,
        app_data: &[u8],
        allocations: &[Allocation],
        request: &TransitionRequest,
    ) -> EconResult<NextState>;
}
