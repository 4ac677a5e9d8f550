//! Wire format encoding and decoding.
//!
//! This module implements:
//!
//! - CBOR encoding of payloads and app data
//! - Framed message encoding (magic, version, length, body)
//! - State hashing and signing with a domain separator
//!
//! # Wire Format
//!
//! ```text
//! [0x51]                  # Protocol magic byte
//! [version: u8]           # Protocol version
//! [length: u32 BE]        # Body length
//! [body: bytes]           # CBOR-encoded Message
//! ```

use querypay_crypto::{
    address_from_public_key, hash_with_domain, Address, Hash, PrivateKey, PublicKey,
};
use querypay_types::constants::{MAX_MESSAGE_SIZE, PROTOCOL_MAGIC, PROTOCOL_VERSION};
use querypay_types::{SignedState, StateSignature};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::message::Message;

/// Frame header: magic(1) + version(1) + length(4)
const HEADER_SIZE: usize = 1 + 1 + 4;

/// Domain separator for state hashing
const DOMAIN_STATE: u8 = 0x11;

// =============================================================================
// State Hashing
// =============================================================================

/// Compute the hash participants sign for a state.
///
/// `H(0x11 || len || CBOR(state without signatures))`
///
/// Signatures are excluded so every participant signs the same bytes
/// regardless of who signed first.
pub fn state_hash(state: &SignedState) -> Result<Hash, EncodeError> {
    let body = encode_payload(&state.without_signatures())?;
    Ok(hash_with_domain(DOMAIN_STATE, &body))
}

/// Sign a state and append the signature.
///
/// Replaces any earlier signature by the same signer.
pub fn sign_state(
    state: &mut SignedState,
    private_key: &PrivateKey,
    signer: Address,
) -> Result<(), EncodeError> {
    let hash = state_hash(state)?;
    let signature = querypay_crypto::sign(private_key, hash.as_ref());
    state.signatures.retain(|s| s.signer != signer);
    state.signatures.push(StateSignature { signer, signature });
    Ok(())
}

/// Check that `public_key`'s address signed this state.
///
/// Returns false if the signature is missing, invalid, or the state
/// cannot be hashed.
pub fn verify_state_signature(state: &SignedState, public_key: &PublicKey) -> bool {
    let signer = address_from_public_key(public_key);
    let Some(entry) = state.signatures.iter().find(|s| s.signer == signer) else {
        return false;
    };
    let Ok(hash) = state_hash(state) else {
        return false;
    };
    querypay_crypto::verify(public_key, hash.as_ref(), &entry.signature)
}

// =============================================================================
// Payload Encoding/Decoding
// =============================================================================

/// Encode a value to CBOR.
pub fn encode_payload<T: Serialize>(payload: &T) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    ciborium::into_writer(payload, &mut buf)?;

    if buf.len() > MAX_MESSAGE_SIZE as usize {
        return Err(EncodeError::PayloadTooLarge {
            size: buf.len(),
            max: MAX_MESSAGE_SIZE as usize,
        });
    }

    Ok(buf)
}

/// Decode a CBOR value.
pub fn decode_payload<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    ciborium::from_reader(bytes).map_err(|e| DecodeError::PayloadDecodeFailed(e.to_string()))
}

// =============================================================================
// Message Encoding/Decoding
// =============================================================================

/// Encode a message to wire format.
pub fn encode_message(msg: &Message) -> Result<Vec<u8>, EncodeError> {
    let body = encode_payload(msg)?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.push(PROTOCOL_MAGIC);
    buf.push(PROTOCOL_VERSION);
    buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buf.extend_from_slice(&body);

    Ok(buf)
}

/// Decode a message from wire format.
///
/// The input must hold exactly one frame.
pub fn decode_message(bytes: &[u8]) -> Result<Message, DecodeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DecodeError::TruncatedMessage {
            expected: HEADER_SIZE,
            got: bytes.len(),
        });
    }

    let magic = bytes[0];
    if magic != PROTOCOL_MAGIC {
        return Err(DecodeError::InvalidMagic {
            expected: PROTOCOL_MAGIC,
            got: magic,
        });
    }

    let version = bytes[1];
    if version != PROTOCOL_VERSION {
        return Err(DecodeError::InvalidVersion {
            expected: PROTOCOL_VERSION,
            got: version,
        });
    }

    let len_bytes: [u8; 4] = bytes[2..HEADER_SIZE]
        .try_into()
        .map_err(|_| DecodeError::TruncatedMessage {
            expected: HEADER_SIZE,
            got: bytes.len(),
        })?;
    let body_len = u32::from_be_bytes(len_bytes) as usize;
    if body_len > MAX_MESSAGE_SIZE as usize {
        return Err(DecodeError::MessageTooLarge {
            size: body_len,
            max: MAX_MESSAGE_SIZE as usize,
        });
    }

    let expected_total = HEADER_SIZE + body_len;
    if bytes.len() < expected_total {
        return Err(DecodeError::TruncatedMessage {
            expected: expected_total,
            got: bytes.len(),
        });
    }
    if bytes.len() > expected_total {
        return Err(DecodeError::TrailingBytes {
            extra: bytes.len() - expected_total,
        });
    }

    decode_payload(&bytes[HEADER_SIZE..expected_total])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Payload;
    use querypay_crypto::generate_identity;
    use querypay_types::{Allocation, AllocationItem, QueryAppData};

    fn test_state(participants: Vec<Address>) -> SignedState {
        SignedState {
            chain_id: 1,
            participants: participants.clone(),
            channel_nonce: 42,
            challenge_duration: 86_400,
            app_definition: Address([7u8; 20]),
            turn_num: 0,
            is_final: false,
            outcome: vec![Allocation::new(
                Address::default(),
                participants
                    .iter()
                    .map(|p| AllocationItem::new(*p, 50))
                    .collect(),
            )],
            app_data: Vec::new(),
            signatures: Vec::new(),
        }
    }

    fn test_message() -> Message {
        let participants = vec![Address([1u8; 20]), Address([2u8; 20])];
        Message::new(
            participants[0],
            participants[1],
            Payload::new(vec![test_state(participants)]),
        )
    }

    #[test]
    fn test_state_hash_ignores_signatures() {
        let (private_key, public_key) = generate_identity();
        let signer = address_from_public_key(&public_key);
        let mut state = test_state(vec![signer, Address([2u8; 20])]);
        let before = state_hash(&state).unwrap();

        sign_state(&mut state, &private_key, signer).unwrap();
        assert_eq!(state_hash(&state).unwrap(), before);
    }

    #[test]
    fn test_state_hash_covers_turn() {
        let mut state = test_state(vec![Address([1u8; 20]), Address([2u8; 20])]);
        let before = state_hash(&state).unwrap();
        state.turn_num = 3;
        assert_ne!(state_hash(&state).unwrap(), before);
    }

    #[test]
    fn test_sign_and_verify_state() {
        let (private_key, public_key) = generate_identity();
        let (_, other_public) = generate_identity();
        let signer = address_from_public_key(&public_key);
        let mut state = test_state(vec![signer, Address([2u8; 20])]);

        assert!(!verify_state_signature(&state, &public_key));
        sign_state(&mut state, &private_key, signer).unwrap();
        assert!(verify_state_signature(&state, &public_key));
        assert!(!verify_state_signature(&state, &other_public));

        // Re-signing replaces rather than duplicates
        sign_state(&mut state, &private_key, signer).unwrap();
        assert_eq!(state.signatures.len(), 1);
    }

    #[test]
    fn test_tampered_state_fails_verification() {
        let (private_key, public_key) = generate_identity();
        let signer = address_from_public_key(&public_key);
        let mut state = test_state(vec![signer, Address([2u8; 20])]);
        sign_state(&mut state, &private_key, signer).unwrap();

        state.outcome[0].items[0].amount = 0;
        assert!(!verify_state_signature(&state, &public_key));
    }

    #[test]
    fn test_app_data_payload() {
        let data = QueryAppData::requested("QmRequest", 10);
        let bytes = encode_payload(&data).unwrap();
        let decoded: QueryAppData = decode_payload(&bytes).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_decode_payload_garbage() {
        let result: Result<QueryAppData, _> = decode_payload(&[0xff, 0x00, 0x13]);
        assert!(matches!(result, Err(DecodeError::PayloadDecodeFailed(_))));
    }

    #[test]
    fn test_message_frame_header() {
        let msg = test_message();
        let bytes = encode_message(&msg).unwrap();

        assert_eq!(bytes[0], PROTOCOL_MAGIC);
        assert_eq!(bytes[1], PROTOCOL_VERSION);
        let len = u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]) as usize;
        assert_eq!(len, bytes.len() - HEADER_SIZE);

        assert_eq!(decode_message(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode_message(&test_message()).unwrap();
        let result = decode_message(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(DecodeError::TruncatedMessage { .. })));

        let result = decode_message(&bytes[..3]);
        assert_eq!(
            result,
            Err(DecodeError::TruncatedMessage {
                expected: HEADER_SIZE,
                got: 3
            })
        );
    }

    #[test]
    fn test_decode_bad_magic_and_version() {
        let mut bytes = encode_message(&test_message()).unwrap();
        bytes[0] = 0x00;
        assert!(matches!(
            decode_message(&bytes),
            Err(DecodeError::InvalidMagic { got: 0x00, .. })
        ));

        let mut bytes = encode_message(&test_message()).unwrap();
        bytes[1] = 0x7f;
        assert!(matches!(
            decode_message(&bytes),
            Err(DecodeError::InvalidVersion { got: 0x7f, .. })
        ));
    }

    #[test]
    fn test_decode_oversized_length() {
        let mut bytes = vec![PROTOCOL_MAGIC, PROTOCOL_VERSION];
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(matches!(
            decode_message(&bytes),
            Err(DecodeError::MessageTooLarge { .. })
        ));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = encode_message(&test_message()).unwrap();
        bytes.push(0x00);
        assert_eq!(
            decode_message(&bytes),
            Err(DecodeError::TrailingBytes { extra: 1 })
        );
    }
}
