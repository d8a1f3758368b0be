//! Ed25519 key material for API keys.
//!
//! The caller receives the hex encoded secret key. The store only ever sees
//! an address-style fingerprint of the matching public key, which validation
//! re-derives from the presented secret.

use ed25519_dalek::{SECRET_KEY_LENGTH, SigningKey, VerifyingKey};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Number of trailing digest bytes kept in a fingerprint.
const FINGERPRINT_LENGTH: usize = 20;

/// Freshly generated key material.
pub struct KeyPair {
    /// Hex encoded secret key handed to the caller (64 characters)
    pub credential: String,

    /// Stored lookup value derived from the public key
    pub fingerprint: String,
}

// Keep the secret out of debug output.
impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

/// Generate a keypair from the operating system's secure random source.
pub fn generate_keypair() -> Result<KeyPair, AppError> {
    let mut seed = [0u8; SECRET_KEY_LENGTH];
    OsRng
        .try_fill_bytes(&mut seed)
        .map_err(|e| AppError::Generation(format!("secure random source failed: {e}")))?;

    let signing_key = SigningKey::from_bytes(&seed);
    Ok(KeyPair {
        credential: hex::encode(signing_key.to_bytes()),
        fingerprint: fingerprint(&signing_key.verifying_key()),
    })
}

/// Decode a presented credential and derive its fingerprint.
///
/// Anything that is not exactly 32 hex encoded bytes is rejected as
/// `InvalidCredentialFormat`.
pub fn fingerprint_from_credential(credential: &str) -> Result<String, AppError> {
    let bytes = hex::decode(credential).map_err(|_| AppError::InvalidCredentialFormat)?;
    let secret: [u8; SECRET_KEY_LENGTH] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| AppError::InvalidCredentialFormat)?;

    Ok(fingerprint(&SigningKey::from_bytes(&secret).verifying_key()))
}

/// `0x` followed by the last 20 bytes of SHA-256 over the public key, in hex.
pub fn fingerprint(verifying_key: &VerifyingKey) -> String {
    let digest = Sha256::digest(verifying_key.as_bytes());
    format!("0x{}", hex::encode(&digest[digest.len() - FINGERPRINT_LENGTH..]))
}
