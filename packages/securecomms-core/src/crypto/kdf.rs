//! # Key Derivation Functions
//!
//! HKDF-SHA256 expansions used by the core.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KEY DERIVATION                                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Wallet signature over the seed message (opaque bytes)                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  HKDF-SHA256(ikm = signature,                                          │
//! │              salt = "securecomms-seed-signature-v1",                   │
//! │              info = "securecomms-encryption-key-v1")                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  32-byte X25519 private key                                            │
//! │                                                                         │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  X25519 shared secret (per envelope)                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  HKDF-SHA256(ikm = shared_secret,                                      │
//! │              salt = ephemeral_pub || recipient_pub,                    │
//! │              info = "securecomms-envelope-key-v1")                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  32-byte AES-256-GCM key                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Binding both public keys into the salt ties each envelope key to the
//! exact pair of points that produced it.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::encryption::EnvelopeKey;
use super::keys::PublicKey;
use super::{KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::error::{Error, Result};

/// Domain separation strings for HKDF
pub mod domain {
    /// Salt for expanding a seed signature
    pub const SEED_SIGNATURE_SALT: &[u8] = b"securecomms-seed-signature-v1";

    /// Info for the derived X25519 private key
    pub const ENCRYPTION_KEY: &[u8] = b"securecomms-encryption-key-v1";

    /// Info for per-envelope AES keys
    pub const ENVELOPE_KEY: &[u8] = b"securecomms-envelope-key-v1";
}

/// Expand a seed signature into 32 bytes of private key material
///
/// Deterministic: the same signature always yields the same bytes.
pub fn derive_private_key_bytes(signature: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
    if signature.is_empty() {
        return Err(Error::DerivationError("signature is empty".into()));
    }

    let hkdf = Hkdf::<Sha256>::new(Some(domain::SEED_SIGNATURE_SALT), signature);
    let mut key = Zeroizing::new([0u8; 32]);
    hkdf.expand(domain::ENCRYPTION_KEY, &mut *key)
        .map_err(|_| Error::DerivationError("HKDF expansion failed".into()))?;

    Ok(key)
}

/// Derive the AES-256-GCM key for one envelope
pub fn derive_envelope_key(
    shared_secret: &[u8; 32],
    ephemeral: &PublicKey,
    recipient: &PublicKey,
) -> Result<EnvelopeKey> {
    let mut salt = [0u8; PUBLIC_KEY_SIZE * 2];
    salt[..PUBLIC_KEY_SIZE].copy_from_slice(ephemeral.as_bytes());
    salt[PUBLIC_KEY_SIZE..].copy_from_slice(recipient.as_bytes());

    let hkdf = Hkdf::<Sha256>::new(Some(&salt), shared_secret);
    let mut key = [0u8; KEY_SIZE];
    hkdf.expand(domain::ENVELOPE_KEY, &mut key)
        .map_err(|_| Error::EncryptionFailed("HKDF expansion failed".into()))?;

    Ok(EnvelopeKey::from_bytes(key))
}

// ============================================================================
// TESTS
// ============================================================================
