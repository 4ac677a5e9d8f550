//! Query attestation accounting.
//!
//! A query channel holds one allocation with an item per participant:
//! index 0 is the payer, index 1 the provider. While a query is open the
//! payer's item still holds the locked payment. When the provider attests
//! to a response, the payment moves to the provider's item. When the
//! provider declines, the balances stay put.

use querypay_types::{Allocation, Amount, QueryAppData, QueryStateType};
use querypay_wire::{decode_payload, encode_payload};

use crate::error::{EconError, EconResult};
use crate::transition::{NextState, StateTransition, TransitionRequest};

/// Index of the payer's allocation item
pub const PAYER_INDEX: usize = 0;

/// Index of the provider's allocation item
pub const PROVIDER_INDEX: usize = 1;

/// Decode query app data.
pub fn decode_app_data(app_data: &[u8]) -> EconResult<QueryAppData> {
    decode_payload(app_data).map_err(|e| EconError::invalid_app_data(e.to_string()))
}

/// Encode query app data.
pub fn encode_app_data(data: &QueryAppData) -> EconResult<Vec<u8>> {
    encode_payload(data).map_err(|e| EconError::invalid_app_data(e.to_string()))
}

/// The default query payment transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttestationTransition;

impl AttestationTransition {
    /// Create the transition.
    pub fn new() -> Self {
        Self
    }
}

impl StateTransition for AttestationTransition {
    fn compute_next_state(
        &self,
        app_data: &[u8],
        allocations: &[Allocation],
        request: &TransitionRequest,
    ) -> EconResult<NextState> {
        if !request.to_state_type.is_response() {
            return Err(EconError::InvalidTargetState(request.to_state_type));
        }

        let current = decode_app_data(app_data)?;
        if current.state_type != QueryStateType::QueryRequested {
            return Err(EconError::UnexpectedStateType {
                found: current.state_type,
            });
        }

        let [allocation] = allocations else {
            return Err(EconError::unsupported_allocation(format!(
                "expected 1 allocation, found {}",
                allocations.len()
            )));
        };
        if allocation.items.len() <= PROVIDER_INDEX {
            return Err(EconError::unsupported_allocation(format!(
                "expected an item per participant, found {}",
                allocation.items.len()
            )));
        }

        let mut next_allocation = allocation.clone();
        let next_data = match request.to_state_type {
            QueryStateType::AttestationProvided => {
                if !request.attestation.is_complete() {
                    return Err(EconError::IncompleteAttestation);
                }
                transfer_payment(&mut next_allocation, current.payment_amount)?;
                QueryAppData {
                    state_type: QueryStateType::AttestationProvided,
                    response_cid: request.attestation.response_cid.clone(),
                    signature: request.attestation.signature.clone(),
                    ..current
                }
            }
            QueryStateType::QueryDeclined => QueryAppData {
                state_type: QueryStateType::QueryDeclined,
                response_cid: String::new(),
                signature: String::new(),
                ..current
            },
            other => return Err(EconError::InvalidTargetState(other)),
        };

        Ok(NextState {
            app_data: encode_app_data(&next_data)?,
            allocation: next_allocation,
        })
    }
}

/// Move `amount` from the payer item to the provider item.
fn transfer_payment(allocation: &mut Allocation, amount: Amount) -> EconResult<()> {
    let available = allocation.items[PAYER_INDEX].amount;
    let payer = available
        .checked_sub(amount)
        .ok_or(EconError::InsufficientFunds {
            available,
            required: amount,
        })?;
    let provider = allocation.items[PROVIDER_INDEX]
        .amount
        .checked_add(amount)
        .ok_or(EconError::AmountOverflow)?;

    allocation.items[PAYER_INDEX].amount = payer;
    allocation.items[PROVIDER_INDEX].amount = provider;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use querypay_crypto::Address;
    use querypay_types::{AllocationItem, Attestation};

    fn payer() -> Address {
        Address([1u8; 20])
    }

    fn provider() -> Address {
        Address([2u8; 20])
    }

    fn allocation(payer_amount: u64, provider_amount: u64) -> Allocation {
        Allocation::new(
            Address::default(),
            vec![
                AllocationItem::new(payer(), payer_amount),
                AllocationItem::new(provider(), provider_amount),
            ],
        )
    }

    fn requested(payment: u64) -> Vec<u8> {
        encode_app_data(&QueryAppData::requested("QmRequest", payment)).unwrap()
    }

    #[test]
    fn test_attestation_moves_payment() {
        let next = AttestationTransition::new()
            .compute_next_state(
                &requested(30),
                &[allocation(100, 5)],
                &TransitionRequest::attest(Attestation::new("Qm123", "0xabc")),
            )
            .unwrap();

        assert_eq!(next.allocation.items[PAYER_INDEX].amount, 70);
        assert_eq!(next.allocation.items[PROVIDER_INDEX].amount, 35);
        assert_eq!(next.allocation.items[PAYER_INDEX].destination, payer());

        let data = decode_app_data(&next.app_data).unwrap();
        assert_eq!(data.state_type, QueryStateType::AttestationProvided);
        assert_eq!(data.response_cid, "Qm123");
        assert_eq!(data.signature, "0xabc");
        assert_eq!(data.request_cid, "QmRequest");
        assert_eq!(data.payment_amount, 30);
    }

    #[test]
    fn test_decline_keeps_balances() {
        let next = AttestationTransition::new()
            .compute_next_state(
                &requested(30),
                &[allocation(100, 5)],
                &TransitionRequest::decline(),
            )
            .unwrap();

        assert_eq!(next.allocation, allocation(100, 5));
        let data = decode_app_data(&next.app_data).unwrap();
        assert_eq!(data.state_type, QueryStateType::QueryDeclined);
        assert!(data.attestation().is_empty());
    }

    #[test]
    fn test_insufficient_funds() {
        let result = AttestationTransition::new().compute_next_state(
            &requested(500),
            &[allocation(100, 0)],
            &TransitionRequest::attest(Attestation::new("Qm123", "0xabc")),
        );
        assert_eq!(
            result,
            Err(EconError::InsufficientFunds {
                available: 100,
                required: 500
            })
        );
    }

    #[test]
    fn test_provider_overflow() {
        let result = AttestationTransition::new().compute_next_state(
            &requested(1),
            &[allocation(1, u64::MAX)],
            &TransitionRequest::attest(Attestation::new("Qm123", "0xabc")),
        );
        assert_eq!(result, Err(EconError::AmountOverflow));
    }

    #[test]
    fn test_only_from_query_requested() {
        let answered = encode_app_data(&QueryAppData {
            state_type: QueryStateType::AttestationProvided,
            ..QueryAppData::requested("QmRequest", 1)
        })
        .unwrap();

        let result = AttestationTransition::new().compute_next_state(
            &answered,
            &[allocation(10, 0)],
            &TransitionRequest::decline(),
        );
        assert_eq!(
            result,
            Err(EconError::UnexpectedStateType {
                found: QueryStateType::AttestationProvided
            })
        );
    }

    #[test]
    fn test_target_must_be_response() {
        let request = TransitionRequest {
            to_state_type: QueryStateType::QueryRequested,
            attestation: Attestation::empty(),
        };
        let result = AttestationTransition::new().compute_next_state(
            &requested(1),
            &[allocation(10, 0)],
            &request,
        );
        assert_eq!(
            result,
            Err(EconError::InvalidTargetState(QueryStateType::QueryRequested))
        );
    }

    #[test]
    fn test_incomplete_attestation() {
        let result = AttestationTransition::new().compute_next_state(
            &requested(1),
            &[allocation(10, 0)],
            &TransitionRequest::attest(Attestation::new("Qm123", "")),
        );
        assert_eq!(result, Err(EconError::IncompleteAttestation));
    }

    #[test]
    fn test_allocation_shape() {
        let transition = AttestationTransition::new();
        let request = TransitionRequest::decline();

        let none = transition.compute_next_state(&requested(1), &[], &request);
        assert!(matches!(none, Err(EconError::UnsupportedAllocation(_))));

        let two = transition.compute_next_state(
            &requested(1),
            &[allocation(1, 0), allocation(1, 0)],
            &request,
        );
        assert!(matches!(two, Err(EconError::UnsupportedAllocation(_))));

        let single_item = Allocation::new(
            Address::default(),
            vec![AllocationItem::new(payer(), 10)],
        );
        let short = transition.compute_next_state(&requested(1), &[single_item], &request);
        assert!(matches!(short, Err(EconError::UnsupportedAllocation(_))));
    }

    #[test]
    fn test_garbage_app_data() {
        let result = AttestationTransition::new().compute_next_state(
            &[0xde, 0xad, 0xbe, 0xef],
            &[allocation(10, 0)],
            &TransitionRequest::decline(),
        );
        assert!(matches!(result, Err(EconError::InvalidAppData(_))));
    }

    #[test]
    fn test_deterministic() {
        let transition = AttestationTransition::new();
        let request = TransitionRequest::attest(Attestation::new("Qm123", "0xabc"));
        let a = transition
            .compute_next_state(&requested(3), &[allocation(10, 0)], &request)
            .unwrap();
        let b = transition
            .compute_next_state(&requested(3), &[allocation(10, 0)], &request)
            .unwrap();
        assert_eq!(a, b);
    }
}
