//! Wire format for the querypay channel protocol.
//!
//! This crate defines the messages exchanged between channel participants,
//! the framed CBOR codec used to move them, and the state hash that
//! participants sign.
//!
//! # Example
//!
//! ```
//! use querypay_crypto::Address;
//! use querypay_wire::{decode_message, encode_message, Message, Payload};
//!
//! let msg = Message::new(Address([1u8; 20]), Address([2u8; 20]), Payload::new(vec![]));
//! let bytes = encode_message(&msg).unwrap();
//! assert_eq!(decode_message(&bytes).unwrap(), msg);
//! ```

mod encoding;
mod error;
mod message;

pub use encoding::{
    decode_message, decode_payload, encode_message, encode_payload, sign_state, state_hash,
    verify_state_signature,
};
pub use error::{DecodeError, EncodeError};
pub use message::{Message, OutboxItem, OutboxMethod, Payload};
