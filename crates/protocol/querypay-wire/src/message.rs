//! Wallet-protocol messages.
//!
//! A [`Message`] is what travels between the two channel participants: a
//! routing envelope (sender, recipient) around a [`Payload`] of signed
//! states. Wallet operations hand back [`OutboxItem`]s, each wrapping a
//! message that should be delivered to the counterparty.

use querypay_crypto::Address;
use querypay_types::{SignedState, WALLET_VERSION};
use serde::{Deserialize, Serialize};

/// Wallet-protocol data carried by a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Payload {
    /// Wallet protocol version of the producer
    pub wallet_version: String,
    /// Signed states, oldest turn first
    pub signed_states: Vec<SignedState>,
}

impl Payload {
    /// Create a payload at the current wallet version.
    pub fn new(signed_states: Vec<SignedState>) -> Self {
        Self {
            wallet_version: WALLET_VERSION.to_string(),
            signed_states,
        }
    }

    /// The first signed state, if any.
    pub fn first_state(&self) -> Option<&SignedState> {
        self.signed_states.first()
    }
}

/// A message between channel participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    /// Address of the sending participant
    pub sender: Address,
    /// Address of the receiving participant
    pub recipient: Address,
    /// Wallet-protocol payload
    pub data: Payload,
}

impl Message {
    /// Create a new message.
    pub fn new(sender: Address, recipient: Address, data: Payload) -> Self {
        Self {
            sender,
            recipient,
            data,
        }
    }

    /// The first signed state carried by this message, if any.
    pub fn first_state(&self) -> Option<&SignedState> {
        self.data.first_state()
    }

    /// Number of signed states carried.
    pub fn state_count(&self) -> usize {
        self.data.signed_states.len()
    }
}

/// What the wallet wants done with an outbox item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OutboxMethod {
    /// Deliver the message to the counterparty
    MessageQueued,
}

/// A wallet-produced directive awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OutboxItem {
    /// Delivery method
    pub method: OutboxMethod,
    /// Message to deliver
    pub params: Message,
}

impl OutboxItem {
    /// Queue a message for delivery.
    pub fn queued(params: Message) -> Self {
        Self {
            method: OutboxMethod::MessageQueued,
            params,
        }
    }

    /// The first signed state in the queued message, if any.
    pub fn first_state(&self) -> Option<&SignedState> {
        self.params.first_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload() {
        let payload = Payload::new(Vec::new());
        assert_eq!(payload.wallet_version, WALLET_VERSION);
        assert!(payload.first_state().is_none());
    }

    #[test]
    fn test_outbox_item_queued() {
        let message = Message::new(
            Address([1u8; 20]),
            Address([2u8; 20]),
            Payload::new(Vec::new()),
        );
        let item = OutboxItem::queued(message.clone());
        assert_eq!(item.method, OutboxMethod::MessageQueued);
        assert_eq!(item.params, message);
        assert_eq!(item.params.state_count(), 0);
    }

    #[test]
    fn test_outbox_method_serde() {
        let json = serde_json::to_string(&OutboxMethod::MessageQueued).unwrap();
        assert_eq!(json, "\"message_queued\"");
    }
}
