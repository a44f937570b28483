//! # Key Derivation
//!
//! Deterministic keypairs from a wallet signature.
//!
//! ## Derivation Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    KEYPAIR DERIVATION                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  (seed_message, address)                                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  SigningAuthority::sign()  ◄── only suspension point, may be rejected  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  SeedSignature ──► HKDF-SHA256 ──► X25519 private key                  │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                   base-point mult ──► public key       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Same seed message + same signing identity ⇒ same keypair, with nothing
//! stored. That only holds if the wallet signs deterministically, which
//! RFC 6979 ECDSA and Ed25519 wallets do.

mod address;
mod signer;

use std::time::Duration;

pub use address::{Address, ADDRESS_SIZE};
pub use signer::{
    ChannelSigner, LocalSigner, PendingSignature, SeedSignature, SigningAuthority, SigningError,
};

use crate::crypto::{derive_private_key_bytes, KeyPair, PrivateKey};
use crate::error::{Error, Result};

/// A validated request to derive a keypair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyDerivationRequest {
    seed_message: String,
    address: Address,
}

impl KeyDerivationRequest {
    /// Validate the inputs
    pub fn new(seed_message: impl Into<String>, address: &str) -> Result<Self> {
        let seed_message = seed_message.into();
        if seed_message.is_empty() {
            return Err(Error::InvalidRequest("seed message is empty".into()));
        }
        Ok(Self {
            seed_message,
            address: Address::parse(address)?,
        })
    }

    /// The message the wallet is asked to sign
    pub fn seed_message(&self) -> &str {
        &self.seed_message
    }

    /// The account whose wallet signs
    pub fn address(&self) -> &Address {
        &self.address
    }
}

/// Derive a keypair by asking `authority` to sign the seed message
///
/// ## Errors
///
/// - `SigningRejected` if the authority declines, fails or is dismissed
/// - `DerivationError` if the signature cannot be expanded
pub async fn derive_keypair<A>(authority: &A, request: &KeyDerivationRequest) -> Result<KeyPair>
where
    A: SigningAuthority + ?Sized,
{
    tracing::info!("Requesting seed signature from {}", request.address);

    let signature = authority
        .sign(&request.seed_message, &request.address)
        .await
        .map_err(|e| {
            tracing::warn!("Seed signature for {} not obtained: {}", request.address, e);
            Error::from(e)
        })?;

    let keypair = derive_keypair_from_signature(&signature)?;
    tracing::info!("Derived keypair for {}", request.address);
    Ok(keypair)
}

/// Like [`derive_keypair`], but give up if the authority is silent for
/// `timeout`
pub async fn derive_keypair_with_timeout<A>(
    authority: &A,
    request: &KeyDerivationRequest,
    timeout: Duration,
) -> Result<KeyPair>
where
    A: SigningAuthority + ?Sized,
{
    match tokio::time::timeout(timeout, derive_keypair(authority, request)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                "Seed signature for {} timed out after {:?}",
                request.address,
                timeout
            );
            Err(Error::SigningRejected(format!(
                "no answer within {} ms",
                timeout.as_millis()
            )))
        }
    }
}

/// Expand a signature into a keypair without contacting a wallet
pub fn derive_keypair_from_signature(signature: &SeedSignature) -> Result<KeyPair> {
    let secret = derive_private_key_bytes(signature.as_bytes())?;
    Ok(KeyPair::from_private_key(PrivateKey::from_bytes(*secret)))
}

// ============================================================================
// TESTS
// ============================================================================
