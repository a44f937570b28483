//! # Cryptography Module
//!
//! Primitives shared by key derivation and the hybrid messenger.
//!
//! ## Algorithm Choices
//!
//! | Algorithm | Purpose |
//! |-----------|---------|
//! | X25519 | Key agreement (derived and ephemeral keys) |
//! | HKDF-SHA256 | Signature → private key, shared secret → AES key |
//! | AES-256-GCM | Envelope confidentiality + integrity, detached tag |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: secret keys, shared secrets and AES keys are
//!    zeroized when dropped
//! 2. **Secure Random**: `rand::rngs::OsRng` for ephemerals and IVs, never
//!    cached across calls
//! 3. **Fail Closed**: decryption only returns bytes after the tag verifies
//! 4. **Contributory Agreement**: low-order public keys are refused

mod encryption;
mod kdf;
mod keys;

pub use encryption::{open, seal, EnvelopeKey, Iv, SharedSecret, Tag};
pub use kdf::{derive_envelope_key, derive_private_key_bytes, domain};
pub use keys::{KeyPair, PrivateKey, PublicKey};

/// Size of X25519 public keys in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of AES-256-GCM keys in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM IV in bytes (96 bits)
pub const IV_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;
