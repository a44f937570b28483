//! # UI Bridge
//!
//! Explicit request/response surface for the UI.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         BRIDGE                                          │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Request::GenerateKeypair ──► derive_keypair ──► UserPubkeyResult      │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                          keypair held in memory                         │
//! │                                    │                                    │
//! │  Request::Encrypt ──► encrypt_to_pubkeys ──► EncryptionFinished        │
//! │  Request::Decrypt ──► decrypt_for_user   ──► DecryptionFinished        │
//! │  Request::ForgetKeypair ──► drop keypair ──► KeypairForgotten          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bridge is an ordinary value owned by the caller. Dropping it drops
//! the keypair; nothing is written anywhere.

mod dispatcher;
mod types;

use std::sync::Arc;

use parking_lot::RwLock;

pub use dispatcher::{dispatch, DResult};
pub use types::{
    DecryptRequest, EncryptRequest, GenerateKeypairRequest, MessageId, Request, Response,
};

use crate::config::CommsConfig;
use crate::crypto::{KeyPair, PublicKey};
use crate::derivation::{
    derive_keypair, derive_keypair_with_timeout, Address, KeyDerivationRequest, SigningAuthority,
};
use crate::error::{Error, Result};
use crate::messenger::{decrypt_for_user, encrypt_to_pubkeys, Envelope, WireEnvelope};

/// Session state between the UI and the core
pub struct Bridge<S> {
    signer: S,
    config: CommsConfig,
    session: RwLock<Option<Session>>,
}

/// The derived keypair and the account it belongs to
struct Session {
    address: Address,
    keypair: Arc<KeyPair>,
}

impl<S: SigningAuthority> Bridge<S> {
    /// Create a bridge with default configuration
    pub fn new(signer: S) -> Self {
        Self::with_config(signer, CommsConfig::default())
    }

    /// Create a bridge with explicit configuration
    pub fn with_config(signer: S, config: CommsConfig) -> Self {
        Self {
            signer,
            config,
            session: RwLock::new(None),
        }
    }

    /// Public key of the derived keypair, if any
    pub fn public_key(&self) -> Option<PublicKey> {
        self.session.read().as_ref().map(|s| s.keypair.public_key())
    }

    /// Handle one request
    ///
    /// Decrypt requests never fail here: any failure becomes a
    /// `DecryptionFinished` with no message.
    pub async fn handle(&self, request: Request) -> Result<Response> {
        tracing::debug!("Handling {} request", request.kind());

        match request {
            Request::GenerateKeypair(req) => {
                let pubkey = self.generate_keypair(req).await?;
                Ok(Response::UserPubkeyResult { pubkey })
            }
            Request::Encrypt(req) => {
                let envelopes = self.encrypt(&req)?;
                Ok(Response::EncryptionFinished { envelopes })
            }
            Request::Decrypt(req) => {
                let message = self.decrypt(&req);
                Ok(Response::DecryptionFinished {
                    id: req.id,
                    message,
                })
            }
            Request::ForgetKeypair => {
                self.forget_keypair();
                Ok(Response::KeypairForgotten)
            }
        }
    }

    /// Derive and keep the user's keypair, returning its public key hex
    ///
    /// If derivation fails for a different account than the one whose
    /// keypair is held, that keypair is dropped. A failed retry for the same
    /// account keeps it.
    pub async fn generate_keypair(&self, req: GenerateKeypairRequest) -> Result<String> {
        let request = KeyDerivationRequest::new(req.sign_seed_msg, &req.address)?;

        let derived = match self.config.signing_timeout() {
            Some(timeout) => derive_keypair_with_timeout(&self.signer, &request, timeout).await,
            None => derive_keypair(&self.signer, &request).await,
        };

        let keypair = match derived {
            Ok(keypair) => keypair,
            Err(e) => {
                if e.requires_user_action() {
                    tracing::warn!("Keypair for {} needs the user: {}", request.address(), e);
                }
                self.drop_other_account(request.address());
                return Err(e);
            }
        };

        let pubkey = keypair.public_key_hex();
        *self.session.write() = Some(Session {
            address: request.address().clone(),
            keypair: Arc::new(keypair),
        });
        tracing::info!("User public key: {}", pubkey);
        Ok(pubkey)
    }

    fn drop_other_account(&self, address: &Address) {
        let mut session = self.session.write();
        if session.as_ref().is_some_and(|s| &s.address != address) {
            *session = None;
            tracing::info!("Dropped keypair held for a different account");
        }
    }

    /// Encrypt to every listed key, in order
    pub fn encrypt(&self, req: &EncryptRequest) -> Result<Vec<WireEnvelope>> {
        if req.pubkey_hex_strings.len() > self.config.max_recipients {
            return Err(Error::InvalidRequest(format!(
                "{} recipients exceeds the limit of {}",
                req.pubkey_hex_strings.len(),
                self.config.max_recipients
            )));
        }

        let envelopes = encrypt_to_pubkeys(req.message.as_bytes(), &req.pubkey_hex_strings)?;
        let encoding = self.config.wire_encoding;
        Ok(envelopes.iter().map(|e| e.to_wire(encoding)).collect())
    }

    /// Decrypt with the held keypair; `None` on any failure
    pub fn decrypt(&self, req: &DecryptRequest) -> Option<String> {
        match self.try_decrypt(&req.envelope) {
            Ok(message) => Some(message),
            Err(e) => {
                // The reason stays in debug logs only
                tracing::debug!("Decryption of message {} failed: {}", req.id, e);
                tracing::warn!("Decryption failed for message {}", req.id);
                None
            }
        }
    }

    fn try_decrypt(&self, wire: &WireEnvelope) -> Result<String> {
        let keypair = self
            .session
            .read()
            .as_ref()
            .map(|s| Arc::clone(&s.keypair))
            .ok_or(Error::NoKeypair)?;
        let envelope = Envelope::from_wire(wire, self.config.wire_encoding)?;
        let plaintext = decrypt_for_user(&envelope, keypair.private_key())?;
        String::from_utf8(plaintext).map_err(|_| Error::AuthenticationFailed)
    }

    /// Drop the held keypair
    pub fn forget_keypair(&self) {
        if self.session.write().take().is_some() {
            tracing::info!("Derived keypair dropped");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
