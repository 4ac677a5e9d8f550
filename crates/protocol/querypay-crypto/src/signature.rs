//! Signature creation and verification.
//!
//! Channel states are signed with Ed25519 over the SHA-256 of the
//! message bytes:
//! ```text
//! signature = Ed25519_Sign(private_key, H(message))
//! ```

use ed25519_dalek::{Signature as DalekSignature, Signer, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::{PrivateKey, PublicKey, Signature};

fn message_digest(message: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(message);
    hasher.finalize().into()
}

/// Sign a message with a private key.
///
/// # Example
/// ```
/// use querypay_crypto::{generate_identity, sign, verify};
///
/// let (private_key, public_key) = generate_identity();
/// let message = b"turn 3";
/// let signature = sign(&private_key, message);
/// assert!(verify(&public_key, message, &signature));
/// ```
pub fn sign(private_key: &PrivateKey, message: &[u8]) -> Signature {
    let signing_key = private_key.to_signing_key();
    let sig: DalekSignature = signing_key.sign(&message_digest(message));

    Signature(sig.to_bytes())
}

/// Verify a signature against a public key and message.
///
/// Returns `false` for malformed public keys as well as bad signatures.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(&public_key.0) else {
        return false;
    };

    let sig = DalekSignature::from_bytes(&signature.0);
    verifying_key.verify(&message_digest(message), &sig).is_ok()
}

/// Verify a signature, returning an error instead of `false`.
pub fn verify_strict(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), CryptoError> {
    if verify(public_key, message, signature) {
        Ok(())
    } else {
        Err(CryptoError::SignatureVerificationFailed)
    }
}
