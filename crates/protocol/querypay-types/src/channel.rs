//! Channel types.
//!
//! This module defines the channel constants and identifier derivation,
//! funding allocations, signed states and the wallet's channel snapshot.

use querypay_crypto::{hash_with_domain, Address, Hash, Signature};
use serde::{Deserialize, Serialize};

use crate::enums::ChannelStatus;
use crate::Amount;

/// Unique channel identifier derived from the channel constants.
pub type ChannelId = Hash;

/// Domain separator for channel id derivation
const DOMAIN_CHANNEL_ID: u8 = 0x10;

/// The immutable constants of a channel.
///
/// Everything that identifies a channel independently of its turn:
/// chain, ordered participants, nonce and challenge duration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelConstants {
    /// Chain the channel settles on
    pub chain_id: u64,
    /// Participant signing addresses, payer first
    pub participants: Vec<Address>,
    /// Nonce distinguishing channels between the same participants
    pub channel_nonce: u64,
    /// Challenge window in seconds
    pub challenge_duration: u64,
}

impl ChannelConstants {
    /// Create new channel constants.
    pub fn new(
        chain_id: u64,
        participants: Vec<Address>,
        channel_nonce: u64,
        challenge_duration: u64,
    ) -> Self {
        Self {
            chain_id,
            participants,
            channel_nonce,
            challenge_duration,
        }
    }

    /// Compute the channel id for these constants.
    pub fn channel_id(&self) -> ChannelId {
        calculate_channel_id(self)
    }
}

/// Derive the channel identifier from channel constants.
///
/// # Algorithm
/// ```text
/// H(0x10 || len || chain_id || n || participant_1 .. participant_n || nonce || challenge_duration)
/// ```
/// with integers big-endian and the participant count `n` as a `u64`, so
/// every participant list has a distinct prefix. Pure and deterministic.
pub fn calculate_channel_id(constants: &ChannelConstants) -> ChannelId {
    let count = constants.participants.len() as u64;
    let mut data = Vec::with_capacity(8 + 8 + constants.participants.len() * 20 + 8 + 8);
    data.extend_from_slice(&constants.chain_id.to_be_bytes());
    data.extend_from_slice(&count.to_be_bytes());
    for participant in &constants.participants {
        data.extend_from_slice(&participant.0);
    }
    data.extend_from_slice(&constants.channel_nonce.to_be_bytes());
    data.extend_from_slice(&constants.challenge_duration.to_be_bytes());
    hash_with_domain(DOMAIN_CHANNEL_ID, &data)
}

/// A single funding item: an amount owed to a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocationItem {
    /// Who receives the amount when the channel settles
    pub destination: Address,
    /// Amount in the allocation's token
    pub amount: Amount,
}

impl AllocationItem {
    /// Create a new allocation item.
    pub fn new(destination: Address, amount: Amount) -> Self {
        Self {
            destination,
            amount,
        }
    }
}

/// The funding of a channel in one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Allocation {
    /// Token the items are denominated in
    pub token: Address,
    /// Ordered items, one per participant for query channels
    pub items: Vec<AllocationItem>,
}

impl Allocation {
    /// Create a new allocation.
    pub fn new(token: Address, items: Vec<AllocationItem>) -> Self {
        Self { token, items }
    }

    /// Sum of all item amounts.
    ///
    /// Returns `None` if the sum overflows the amount type.
    pub fn total(&self) -> Option<Amount> {
        self.items
            .iter()
            .try_fold(0 as Amount, |acc, item| acc.checked_add(item.amount))
    }
}

/// A signature over a state, tagged with the signer's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StateSignature {
    /// Address of the signing participant
    pub signer: Address,
    /// Signature over the state hash
    pub signature: Signature,
}

/// A channel state together with the participant signatures on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SignedState {
    /// Chain the channel settles on
    pub chain_id: u64,
    /// Participant signing addresses, payer first
    pub participants: Vec<Address>,
    /// Channel nonce
    pub channel_nonce: u64,
    /// Challenge window in seconds
    pub challenge_duration: u64,
    /// Address of the application rules
    pub app_definition: Address,
    /// Position of this state in the channel history
    pub turn_num: u64,
    /// Whether this state closes the channel
    pub is_final: bool,
    /// Funding outcome of the state
    pub outcome: Vec<Allocation>,
    /// Opaque application data
    #[serde(with = "hex_bytes")]
    pub app_data: Vec<u8>,
    /// Signatures collected so far
    pub signatures: Vec<StateSignature>,
}

impl SignedState {
    /// The channel constants embedded in this state.
    pub fn constants(&self) -> ChannelConstants {
        ChannelConstants {
            chain_id: self.chain_id,
            participants: self.participants.clone(),
            channel_nonce: self.channel_nonce,
            challenge_duration: self.challenge_duration,
        }
    }

    /// The id of the channel this state belongs to.
    pub fn channel_id(&self) -> ChannelId {
        calculate_channel_id(&self.constants())
    }

    /// Whether `address` has signed this state.
    pub fn is_signed_by(&self, address: &Address) -> bool {
        self.signatures.iter().any(|s| &s.signer == address)
    }

    /// A copy of this state with no signatures.
    pub fn without_signatures(&self) -> SignedState {
        SignedState {
            signatures: Vec::new(),
            ..self.clone()
        }
    }
}

/// The wallet's snapshot of a channel.
///
/// Owned by the wallet; callers keep read-only copies and replace them
/// wholesale after every wallet operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelResult {
    /// Channel identifier
    pub channel_id: ChannelId,
    /// Participant signing addresses, payer first
    pub participants: Vec<Address>,
    /// Current lifecycle status
    pub status: ChannelStatus,
    /// Current funding outcome
    pub allocations: Vec<Allocation>,
    /// Current application data
    #[serde(with = "hex_bytes")]
    pub app_data: Vec<u8>,
    /// Address of the application rules
    pub app_definition: Address,
    /// Turn number of the latest supported state
    pub turn_num: u64,
}

impl ChannelResult {
    /// Build a snapshot from the latest supported state.
    pub fn from_state(state: &SignedState, status: ChannelStatus) -> Self {
        Self {
            channel_id: state.channel_id(),
            participants: state.participants.clone(),
            status,
            allocations: state.outcome.clone(),
            app_data: state.app_data.clone(),
            app_definition: state.app_definition,
            turn_num: state.turn_num,
        }
    }

    /// Check if the channel accepts application updates.
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    /// The participant other than `me`, if `me` takes part in the channel.
    pub fn counterparty(&self, me: &Address) -> Option<Address> {
        if !self.participants.contains(me) {
            return None;
        }
        self.participants.iter().find(|p| *p != me).copied()
    }
}

/// Hex string encoding for opaque byte payloads.
mod hex_bytes {
    use querypay_crypto::{hex_decode, hex_encode};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex_encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex_decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_constants(nonce: u64) -> ChannelConstants {
        ChannelConstants::new(1337, vec![Address([1u8; 20]), Address([2u8; 20])], nonce, 86400)
    }

    fn test_state(turn_num: u64) -> SignedState {
        let constants = test_constants(7);
        SignedState {
            chain_id: constants.chain_id,
            participants: constants.participants.clone(),
            channel_nonce: constants.channel_nonce,
            challenge_duration: constants.challenge_duration,
            app_definition: Address([9u8; 20]),
            turn_num,
            is_final: false,
            outcome: vec![Allocation::new(
                Address([0u8; 20]),
                vec![
                    AllocationItem::new(Address([1u8; 20]), 100),
                    AllocationItem::new(Address([2u8; 20]), 0),
                ],
            )],
            app_data: vec![0xde, 0xad],
            signatures: Vec::new(),
        }
    }

    #[test]
    fn test_channel_id_deterministic() {
        let a = calculate_channel_id(&test_constants(1));
        let b = calculate_channel_id(&test_constants(1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_channel_id_depends_on_nonce() {
        assert_ne!(test_constants(1).channel_id(), test_constants(2).channel_id());
    }

    #[test]
    fn test_channel_id_layout() {
        let constants = test_constants(1);
        let mut data = Vec::new();
        data.extend_from_slice(&1337u64.to_be_bytes());
        data.extend_from_slice(&2u64.to_be_bytes());
        data.extend_from_slice(&[1u8; 20]);
        data.extend_from_slice(&[2u8; 20]);
        data.extend_from_slice(&1u64.to_be_bytes());
        data.extend_from_slice(&86400u64.to_be_bytes());

        assert_eq!(constants.channel_id(), hash_with_domain(0x10, &data));
    }

    #[test]
    fn test_channel_id_depends_on_participant_count() {
        let constants = test_constants(1);
        let mut single = constants.clone();
        single.participants.truncate(1);
        assert_ne!(constants.channel_id(), single.channel_id());
    }

    #[test]
    fn test_channel_id_depends_on_participant_order() {
        let constants = test_constants(1);
        let mut swapped = constants.clone();
        swapped.participants.reverse();
        assert_ne!(constants.channel_id(), swapped.channel_id());
    }

    #[test]
    fn test_channel_id_depends_on_challenge_duration() {
        let constants = test_constants(1);
        let mut other = constants.clone();
        other.challenge_duration = 3600;
        assert_ne!(constants.channel_id(), other.channel_id());
    }

    #[test]
    fn test_state_channel_id_ignores_turn() {
        assert_eq!(test_state(0).channel_id(), test_state(5).channel_id());
        assert_eq!(test_state(0).channel_id(), test_constants(7).channel_id());
    }

    #[test]
    fn test_allocation_total() {
        let allocation = test_state(0).outcome[0].clone();
        assert_eq!(allocation.total(), Some(100));

        let overflowing = Allocation::new(
            Address([0u8; 20]),
            vec![
                AllocationItem::new(Address([1u8; 20]), Amount::MAX),
                AllocationItem::new(Address([2u8; 20]), 1),
            ],
        );
        assert_eq!(overflowing.total(), None);

        let empty = Allocation::new(Address([0u8; 20]), Vec::new());
        assert_eq!(empty.total(), Some(0));
    }

    #[test]
    fn test_is_signed_by() {
        let mut state = test_state(0);
        assert!(!state.is_signed_by(&Address([1u8; 20])));
        state.signatures.push(StateSignature {
            signer: Address([1u8; 20]),
            signature: Signature([0u8; 64]),
        });
        assert!(state.is_signed_by(&Address([1u8; 20])));
        assert!(state.without_signatures().signatures.is_empty());
    }

    #[test]
    fn test_channel_result_from_state() {
        let state = test_state(3);
        let result = ChannelResult::from_state(&state, ChannelStatus::Running);
        assert_eq!(result.channel_id, state.channel_id());
        assert_eq!(result.turn_num, 3);
        assert!(result.is_running());
        assert_eq!(
            result.counterparty(&Address([2u8; 20])),
            Some(Address([1u8; 20]))
        );
        assert_eq!(result.counterparty(&Address([3u8; 20])), None);
    }

    #[test]
    fn test_signed_state_serialization() {
        let state = test_state(0);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"app_data\":\"0xdead\""));
        let decoded: SignedState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, state);
    }
}
