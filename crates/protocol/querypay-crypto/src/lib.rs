//! Cryptographic primitives for the querypay channel protocol.
//!
//! This crate provides the cryptography the channel core relies on:
//!
//! - **Hashing**: SHA-256 with domain separation (channel ids, state hashes)
//! - **Identity**: Ed25519 keypair generation and participant addresses
//! - **Signatures**: state signing and verification
//!
//! # Example
//!
//! ```
//! use querypay_crypto::{
//!     address_from_public_key, generate_identity, hash_with_domain, sign, verify,
//! };
//!
//! let (private_key, public_key) = generate_identity();
//! let address = address_from_public_key(&public_key);
//! println!("participant: {}", address);
//!
//! let digest = hash_with_domain(0x11, b"state bytes");
//! let signature = sign(&private_key, &digest.0);
//! assert!(verify(&public_key, &digest.0, &signature));
//! ```

mod error;
mod hash;
mod identity;
mod serde_impl;
mod signature;

pub use error::CryptoError;
pub use hash::hash_with_domain;
pub use identity::{
    address_from_public_key, address_from_string, generate_identity, identity_from_seed,
};
pub use signature::{sign, verify, verify_strict};

use ed25519_dalek::SigningKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Parse a hex digest (`0x` prefix optional).
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex_decode(s)?;
        let array: [u8; 32] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| CryptoError::InvalidLength {
                    expected: 32,
                    actual: bytes.len(),
                })?;
        Ok(Hash(array))
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({}...)", hex_encode(&self.0[..8]))
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex_encode(&self.0))
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An Ed25519 private key (32 bytes).
///
/// Implements Zeroize + ZeroizeOnDrop to clear key material from memory.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Create a PrivateKey from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the private key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn from_signing_key(key: &SigningKey) -> Self {
        Self(key.to_bytes())
    }

    pub(crate) fn to_signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

/// An Ed25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create a PublicKey from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({}...)", hex_encode(&self.0[..8]))
    }
}

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Create a Signature from raw bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex_encode(&self.0[..8]))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A channel participant address (20 bytes).
///
/// The address is the first 20 bytes of the key-domain hash of the
/// participant's Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

/// The all-zero address.
///
/// Used as the token address of the chain's native asset.
pub const ZERO_ADDRESS: Address = Address([0u8; 20]);

impl Address {
    /// Create an Address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex_encode(&self.0))
    }
}

impl std::str::FromStr for Address {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        address_from_string(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Lowercase hex encoding without prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decode hex, accepting an optional `0x` prefix.
pub fn hex_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if !digits.is_ascii() {
        return Err(CryptoError::InvalidHex("non-ascii input".to_string()));
    }
    if digits.len() % 2 != 0 {
        return Err(CryptoError::InvalidHex(format!(
            "odd number of digits: {}",
            digits.len()
        )));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| CryptoError::InvalidHex(digits[i..i + 2].to_string()))
        })
        .collect()
}
