//! # SecureComms Core
//!
//! Client-side key management and encryption for a wallet-based messaging
//! dapp. A user's encryption keypair is derived from their wallet's
//! signature over a fixed seed message, so it never has to be stored.
//! Messages are sealed once per recipient with an ephemeral X25519 key
//! agreement and AES-256-GCM.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SECURECOMMS CORE MODULES                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                          Bridge                                  │  │
//! │  │  typed Request/Response, JSON dispatch, session keypair          │  │
//! │  └───────────────┬──────────────────────────────┬───────────────────┘  │
//! │                  │                              │                      │
//! │  ┌───────────────▼─────────────┐  ┌─────────────▼───────────────────┐  │
//! │  │        Derivation           │  │          Messenger              │  │
//! │  │                             │  │                                 │  │
//! │  │ - SigningAuthority          │  │ - encrypt_to_pubkeys            │  │
//! │  │ - Address validation        │  │ - decrypt_for_user              │  │
//! │  │ - derive_keypair            │  │ - Envelope / WireEnvelope       │  │
//! │  └───────────────┬─────────────┘  └─────────────┬───────────────────┘  │
//! │                  │                              │                      │
//! │                  └──────────────┬───────────────┘                      │
//! │                                 ▼                                      │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                          Crypto                                  │  │
//! │  │  X25519 keys │ HKDF-SHA256 │ AES-256-GCM (detached tag)          │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error type and numeric codes
//! - [`config`] - Runtime configuration
//! - [`crypto`] - Keys, key derivation, authenticated encryption
//! - [`derivation`] - Keypair derivation from a wallet signature
//! - [`messenger`] - Multi-recipient encryption and decryption
//! - [`bridge`] - Request/response surface for the UI
//!
//! ## Example
//!
//! ```ignore
//! use securecomms_core::{derive_keypair, encrypt_to_pubkeys, decrypt_for_user};
//! use securecomms_core::derivation::{KeyDerivationRequest, LocalSigner};
//!
//! let wallet = LocalSigner::generate();
//! let request = KeyDerivationRequest::new("derive-comms-key", wallet.address().as_str())?;
//! let keypair = derive_keypair(&wallet, &request).await?;
//!
//! let envelopes = encrypt_to_pubkeys(b"hello", &[keypair.public_key_hex()])?;
//! let plaintext = decrypt_for_user(&envelopes[0], keypair.private_key())?;
//! ```
//!
//! ## Logging
//!
//! Everything goes through `tracing`. The library installs no subscriber
//! and never logs key material or plaintext.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod bridge;
pub mod config;
pub mod crypto;
pub mod derivation;
pub mod error;
pub mod messenger;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use bridge::{dispatch, Bridge, Request, Response};
pub use config::CommsConfig;
pub use crypto::{KeyPair, PrivateKey, PublicKey};
pub use derivation::{derive_keypair, KeyDerivationRequest, SigningAuthority};
pub use error::{Error, Result};
pub use messenger::{decrypt_for_user, encrypt_to_pubkeys, Envelope, WireEnvelope};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of SecureComms Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
