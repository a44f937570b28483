//! # Signing Authorities
//!
//! The wallet is an external collaborator. The core only needs one thing
//! from it: a signature over the seed message for a given account.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ChannelSigner                                                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  core ──sign()──► mpsc ──► PendingSignature ──► wallet UI              │
//! │                                  │                                      │
//! │                     approve(sig) │ reject(reason) │ drop (dismissed)   │
//! │                                  ▼                                      │
//! │  core ◄──────────── oneshot ◄────┘                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A dropped `PendingSignature` resolves the request as dismissed, so an
//! abandoned prompt never leaves the caller waiting.

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::address::{Address, ADDRESS_SIZE};
use crate::error::{Error, Result};

/// Raw signature bytes returned by a wallet
///
/// Opaque to the core: only fed to the key derivation function.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedSignature(Vec<u8>);

impl SeedSignature {
    /// Wrap raw signature bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse the `0x`-prefixed hex string most wallets return
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|e| Error::DerivationError(format!("signature is not hex: {}", e)))?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SeedSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeedSignature({} bytes)", self.0.len())
    }
}

/// Why a signing authority did not produce a signature
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The user or wallet declined
    #[error("declined: {0}")]
    Rejected(String),

    /// The prompt was closed without an answer
    #[error("request dismissed")]
    Dismissed,

    /// The wallet could not be reached
    #[error("wallet unavailable: {0}")]
    Unavailable(String),
}

impl From<SigningError> for Error {
    fn from(err: SigningError) -> Self {
        Error::SigningRejected(err.to_string())
    }
}

/// Something that can sign a message on behalf of an account
///
/// May suspend for as long as the user takes to approve.
#[async_trait]
pub trait SigningAuthority: Send + Sync {
    /// Sign `message` with the identity behind `address`
    async fn sign(
        &self,
        message: &str,
        address: &Address,
    ) -> std::result::Result<SeedSignature, SigningError>;
}

// ============================================================================
// CHANNEL SIGNER
// ============================================================================

/// A signature request waiting for the wallet side to answer
pub struct PendingSignature {
    /// Message to sign
    pub message: String,
    /// Account that should sign it
    pub address: Address,
    responder: oneshot::Sender<std::result::Result<SeedSignature, SigningError>>,
}

impl PendingSignature {
    /// Answer with a signature
    ///
    /// Returns `false` if the requester has already gone away.
    pub fn approve(self, signature: SeedSignature) -> bool {
        self.responder.send(Ok(signature)).is_ok()
    }

    /// Decline the request
    pub fn reject(self, reason: impl Into<String>) -> bool {
        self.responder
            .send(Err(SigningError::Rejected(reason.into())))
            .is_ok()
    }
}

/// Signing authority that hands requests to another task over a channel
#[derive(Clone)]
pub struct ChannelSigner {
    requests: mpsc::Sender<PendingSignature>,
}

impl ChannelSigner {
    /// Create a signer and the receiving end the wallet side listens on
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PendingSignature>) {
        let (requests, rx) = mpsc::channel(buffer.max(1));
        (Self { requests }, rx)
    }
}

#[async_trait]
impl SigningAuthority for ChannelSigner {
    async fn sign(
        &self,
        message: &str,
        address: &Address,
    ) -> std::result::Result<SeedSignature, SigningError> {
        let (responder, answer) = oneshot::channel();
        let pending = PendingSignature {
            message: message.to_string(),
            address: address.clone(),
            responder,
        };

        self.requests
            .send(pending)
            .await
            .map_err(|_| SigningError::Unavailable("wallet channel closed".into()))?;

        answer.await.map_err(|_| SigningError::Dismissed)?
    }
}

// ============================================================================
// LOCAL SIGNER
// ============================================================================

/// In-process Ed25519 wallet
///
/// Ed25519 signatures are deterministic, so the same seed message always
/// derives the same keypair. The address is the first 20 bytes of
/// SHA-256 over the verifying key.
pub struct LocalSigner {
    signing_key: SigningKey,
    address: Address,
}

impl LocalSigner {
    /// Generate a new random wallet
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Restore a wallet from its 32-byte secret
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(bytes))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let digest = Sha256::digest(signing_key.verifying_key().as_bytes());
        let mut raw = [0u8; ADDRESS_SIZE];
        raw.copy_from_slice(&digest[..ADDRESS_SIZE]);
        Self {
            signing_key,
            address: Address::from_bytes(raw),
        }
    }

    /// The account this wallet signs for
    pub fn address(&self) -> &Address {
        &self.address
    }
}

#[async_trait]
impl SigningAuthority for LocalSigner {
    async fn sign(
        &self,
        message: &str,
        address: &Address,
    ) -> std::result::Result<SeedSignature, SigningError> {
        if address != &self.address {
            return Err(SigningError::Rejected(format!(
                "{} is not managed by this wallet",
                address
            )));
        }
        let signature = self.signing_key.sign(message.as_bytes());
        Ok(SeedSignature::from_bytes(signature.to_bytes().to_vec()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
