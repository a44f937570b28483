//! # Key Management
//!
//! X25519 keys used for envelope key agreement.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  PrivateKey (X25519 static secret)                                     │
//! │  • Derived from a wallet signature, or random for ephemerals           │
//! │  • 32 bytes, zeroized on drop, never serialized                        │
//! │                                                                         │
//! │  PublicKey (X25519 Montgomery u-coordinate)                            │
//! │  • 32 bytes, shared as 64 lowercase hex characters                     │
//! │                                                                         │
//! │  KeyPair                                                               │
//! │  • PrivateKey + PublicKey, held in memory by the caller                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

use super::encryption::SharedSecret;
use super::PUBLIC_KEY_SIZE;
use crate::error::{Error, Result};

/// X25519 private key
///
/// Clamping happens inside `x25519-dalek` during scalar multiplication, so
/// any 32 bytes form a usable key.
pub struct PrivateKey {
    // x25519_dalek zeroizes StaticSecret on drop
    secret: StaticSecret,
}

impl PrivateKey {
    /// Generate a random key from the OS entropy source
    pub fn generate() -> Self {
        Self {
            secret: StaticSecret::random_from_rng(OsRng),
        }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            secret: StaticSecret::from(bytes),
        }
    }

    /// Compute the matching public key (base-point multiplication)
    pub fn public_key(&self) -> PublicKey {
        PublicKey(X25519PublicKey::from(&self.secret).to_bytes())
    }

    /// Perform X25519 key agreement with `their_public`
    ///
    /// Returns `None` when the peer key is a low-order point, in which case
    /// the output would be independent of our secret.
    pub(crate) fn agree(&self, their_public: &PublicKey) -> Option<SharedSecret> {
        let shared = self
            .secret
            .diffie_hellman(&X25519PublicKey::from(their_public.0));
        if !shared.was_contributory() {
            return None;
        }
        Some(SharedSecret::from_bytes(shared.to_bytes()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// X25519 public key, safe to disclose
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Encode as lowercase hex (64 characters, no prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex, accepting an optional `0x` prefix and either case
    ///
    /// Errors carry index 0; batch callers re-index with [`Error::at_index`].
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != PUBLIC_KEY_SIZE * 2 {
            return Err(Error::InvalidPublicKey {
                index: 0,
                reason: format!(
                    "expected {} hex characters, got {}",
                    PUBLIC_KEY_SIZE * 2,
                    digits.len()
                ),
            });
        }

        let mut bytes = [0u8; PUBLIC_KEY_SIZE];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| Error::InvalidPublicKey {
            index: 0,
            reason: format!("invalid hex: {}", e),
        })?;

        Ok(Self(bytes))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A private key together with its public key
///
/// Lifetime is entirely up to the holder; nothing here persists it.
#[derive(Debug)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generate a random keypair
    ///
    /// Derived keypairs come from [`crate::derivation`]; this is for
    /// recipients in tests and tooling.
    pub fn generate() -> Self {
        Self::from_private_key(PrivateKey::generate())
    }

    /// Build a keypair around an existing private key
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Public key as hex, the form handed to other parties
    pub fn public_key_hex(&self) -> String {
        self.public_key.to_hex()
    }
}

// ============================================================================
// TESTS
// ============================================================================
