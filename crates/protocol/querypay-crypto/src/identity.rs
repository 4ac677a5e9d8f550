//! Identity management.
//!
//! Provides Ed25519 keypair generation and participant address derivation.
//!
//! An address is derived from a public key:
//! ```text
//! Address = H(0x00 || len || public_key)[0:20]
//! ```
//!
//! Human-readable format: `0x` + 40 lowercase hex characters.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use crate::error::CryptoError;
use crate::hash::hash_with_domain;
use crate::{hex_decode, Address, PrivateKey, PublicKey};

/// Domain separator for key hashing (Ed25519 key type)
const DOMAIN_KEY: u8 = 0x00;

/// Generate a new Ed25519 identity (keypair).
///
/// Uses the operating system's cryptographically secure random number generator.
///
/// # Example
/// ```
/// use querypay_crypto::generate_identity;
///
/// let (private_key, public_key) = generate_identity();
/// ```
pub fn generate_identity() -> (PrivateKey, PublicKey) {
    let mut csprng = OsRng;
    let signing_key = SigningKey::generate(&mut csprng);
    let verifying_key = signing_key.verifying_key();

    let private_key = PrivateKey::from_signing_key(&signing_key);
    let public_key = PublicKey(verifying_key.to_bytes());

    (private_key, public_key)
}

/// Rebuild an identity from a 32-byte seed.
///
/// Deterministic: the same seed always yields the same keypair. Used by
/// fixtures and tooling that need stable participants.
pub fn identity_from_seed(seed: [u8; 32]) -> (PrivateKey, PublicKey) {
    let signing_key = SigningKey::from_bytes(&seed);
    let public_key = PublicKey(signing_key.verifying_key().to_bytes());
    (PrivateKey::from_signing_key(&signing_key), public_key)
}

/// Derive a participant address from a public key.
///
/// # Example
/// ```
/// use querypay_crypto::{generate_identity, address_from_public_key};
///
/// let (_, public_key) = generate_identity();
/// let address = address_from_public_key(&public_key);
/// assert_eq!(address.0.len(), 20);
/// ```
pub fn address_from_public_key(public_key: &PublicKey) -> Address {
    let hash = hash_with_domain(DOMAIN_KEY, &public_key.0);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.0[..20]);
    Address(address)
}

/// Parse a human-readable address (`0x` prefix optional).
///
/// # Errors
/// - `InvalidHex` if the string is not valid hexadecimal
/// - `InvalidLength` if the decoded data isn't 20 bytes
pub fn address_from_string(s: &str) -> Result<Address, CryptoError> {
    let decoded = hex_decode(s)?;
    if decoded.len() != 20 {
        return Err(CryptoError::InvalidLength {
            expected: 20,
            actual: decoded.len(),
        });
    }

    let mut address = [0u8; 20];
    address.copy_from_slice(&decoded);
    Ok(Address(address))
}
