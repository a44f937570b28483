//! # Encryption Module
//!
//! AES-256-GCM with a detached authentication tag.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SEAL / OPEN                                        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  seal(key, iv, plaintext)                                              │
//! │    → encrypted (same length as plaintext)                              │
//! │    → tag (16 bytes)                                                    │
//! │                                                                         │
//! │  open(key, iv, encrypted, tag)                                         │
//! │    → plaintext, or AuthenticationFailed                                │
//! │                                                                         │
//! │  Decryption happens in a scratch buffer that is only returned after    │
//! │  the tag verifies, so no unauthenticated bytes ever leave.             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aes_gcm::{
    aead::{generic_array::GenericArray, AeadInPlace, KeyInit},
    Aes256Gcm, Nonce as AesNonce,
};
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use super::kdf::derive_envelope_key;
use super::keys::PublicKey;
use super::{IV_SIZE, KEY_SIZE, TAG_SIZE};
use crate::error::{Error, Result};

/// Initialization vector for AES-GCM (96 bits)
///
/// Always random. Every envelope also has a fresh key, so reuse under one
/// key cannot happen even on an RNG collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Iv(pub [u8; IV_SIZE]);

impl Iv {
    /// Generate a cryptographically random IV
    pub fn random() -> Self {
        let mut bytes = [0u8; IV_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; IV_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.0
    }
}

/// AES-GCM authentication tag (128 bits)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tag(pub [u8; TAG_SIZE]);

impl Tag {
    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; TAG_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }
}

/// Raw X25519 output, only ever fed to HKDF
#[derive(ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; 32],
}

impl SharedSecret {
    /// Create from raw DH output
    pub(crate) fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Derive the envelope key bound to both public keys
    pub fn derive_key(&self, ephemeral: &PublicKey, recipient: &PublicKey) -> Result<EnvelopeKey> {
        derive_envelope_key(&self.bytes, ephemeral, recipient)
    }
}

/// An AES-256-GCM key for a single envelope
///
/// Zeroized when dropped.
#[derive(ZeroizeOnDrop)]
pub struct EnvelopeKey([u8; KEY_SIZE]);

impl EnvelopeKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Encrypt `plaintext`, returning the ciphertext and detached tag
pub fn seal(key: &EnvelopeKey, iv: &Iv, plaintext: &[u8]) -> Result<(Vec<u8>, Tag)> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| Error::EncryptionFailed(format!("Invalid key: {}", e)))?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(AesNonce::from_slice(&iv.0), b"", &mut buffer)
        .map_err(|e| Error::EncryptionFailed(format!("AEAD failure: {}", e)))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok((buffer, Tag(tag_bytes)))
}

/// Verify `tag` and decrypt `encrypted`
///
/// ## Errors
///
/// Returns `AuthenticationFailed` for a wrong key, IV, tag or ciphertext,
/// without saying which.
pub fn open(key: &EnvelopeKey, iv: &Iv, encrypted: &[u8], tag: &Tag) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.0).map_err(|_| Error::AuthenticationFailed)?;

    let mut buffer = encrypted.to_vec();
    cipher
        .decrypt_in_place_detached(
            AesNonce::from_slice(&iv.0),
            b"",
            &mut buffer,
            GenericArray::from_slice(&tag.0),
        )
        .map_err(|_| Error::AuthenticationFailed)?;

    Ok(buffer)
}

// ============================================================================
// TESTS
// ============================================================================
