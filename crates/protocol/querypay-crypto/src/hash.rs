//! Domain-separated hashing.
//!
//! Every digest in the protocol is SHA-256 over a one-byte domain
//! separator, the input length and the input:
//! ```text
//! H(domain || len(data) as u64be || data)
//! ```
//!
//! Distinct domains keep channel identifiers, state hashes and key
//! fingerprints from ever colliding for the same input bytes.

use sha2::{Digest, Sha256};

use crate::Hash;

/// Compute a domain-separated SHA-256 digest.
///
/// # Example
/// ```
/// use querypay_crypto::hash_with_domain;
///
/// let a = hash_with_domain(0x10, b"payload");
/// let b = hash_with_domain(0x11, b"payload");
/// assert_ne!(a, b);
/// ```
pub fn hash_with_domain(domain: u8, data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();

    hasher.update([domain]);
    hasher.update((data.len() as u64).to_be_bytes());
    hasher.update(data);

    let result: [u8; 32] = hasher.finalize().into();
    Hash(result)
}
