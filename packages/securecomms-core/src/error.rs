//! # Error Handling
//!
//! Error types for the secure-communications core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Request Errors (1-99)                                             │
//! │  │   ├── InvalidRequest        - Malformed or incomplete request       │
//! │  │   └── UnknownMethod         - No handler for the method name        │
//! │  │                                                                      │
//! │  ├── Derivation Errors (200-299)                                       │
//! │  │   ├── SigningRejected       - Wallet declined / dismissed / failed  │
//! │  │   ├── DerivationError       - Signature not expandable to a key     │
//! │  │   ├── InvalidAddress        - Address is not 0x + 40 hex digits     │
//! │  │   └── NoKeypair             - No keypair derived in this session    │
//! │  │                                                                      │
//! │  ├── Crypto Errors (300-399)                                           │
//! │  │   ├── EncryptionFailed      - AEAD encryption failed                │
//! │  │   ├── AuthenticationFailed  - Any decryption failure                │
//! │  │   ├── InvalidPublicKey      - Recipient key malformed / low order   │
//! │  │   └── InvalidEnvelope       - Wire field not decodable              │
//! │  │                                                                      │
//! │  └── Internal Errors (900-999)                                         │
//! │      └── Serialization         - JSON encoding failed                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `AuthenticationFailed` carries no detail. A tampered tag, a corrupted
//! ciphertext and a wrong private key must be indistinguishable to callers.

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the secure-communications core
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Request Errors (1-99)
    // ========================================================================

    /// A request was malformed or missing fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The dispatcher has no handler for this method
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    // ========================================================================
    // Derivation Errors (200-299)
    // ========================================================================

    /// The signing authority declined, failed, or never answered
    #[error("Signing rejected: {0}")]
    SigningRejected(String),

    /// The signature could not be expanded into a private key
    #[error("Failed to derive keypair: {0}")]
    DerivationError(String),

    /// Account address is not well formed
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The operation needs a keypair that has not been derived yet
    #[error("No keypair derived. Generate a keypair first.")]
    NoKeypair,

    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed")]
    AuthenticationFailed,

    /// A recipient public key is malformed or unusable
    #[error("Invalid public key at index {index}: {reason}")]
    InvalidPublicKey {
        /// Position of the offending key in the recipient list
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// An envelope field could not be decoded from its wire form
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Get the numeric error code reported across the bridge
    ///
    /// - 1-99: Request
    /// - 200-299: Derivation
    /// - 300-399: Crypto
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidRequest(_) => 1,
            Error::UnknownMethod(_) => 2,

            Error::SigningRejected(_) => 201,
            Error::DerivationError(_) => 203,
            Error::InvalidAddress(_) => 204,
            Error::NoKeypair => 205,

            Error::EncryptionFailed(_) => 300,
            Error::AuthenticationFailed => 301,
            Error::InvalidPublicKey { .. } => 304,
            Error::InvalidEnvelope(_) => 305,

            Error::Serialization(_) => 902,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Only a rejected signing request can succeed on retry: derivation
    /// is deterministic, so a `DerivationError` repeats identically.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::SigningRejected(_))
    }

    /// Check if this error requires user action
    pub fn requires_user_action(&self) -> bool {
        matches!(self, Error::SigningRejected(_) | Error::NoKeypair)
    }

    /// Point an `InvalidPublicKey` at its position in a recipient list
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Error::InvalidPublicKey { reason, .. } => Error::InvalidPublicKey { index, reason },
            other => other,
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_by_category() {
        assert_eq!(Error::InvalidRequest("x".into()).code(), 1);
        assert_eq!(Error::SigningRejected("x".into()).code(), 201);
        assert_eq!(Error::DerivationError("x".into()).code(), 203);
        assert_eq!(Error::AuthenticationFailed.code(), 301);
        let bad_key = Error::InvalidPublicKey {
            index: 0,
            reason: "x".into(),
        };
        assert_eq!(bad_key.code(), 304);
    }

    #[test]
    fn test_only_signing_rejection_is_recoverable() {
        assert!(Error::SigningRejected("dismissed".into()).is_recoverable());
        assert!(!Error::DerivationError("empty".into()).is_recoverable());
        assert!(!Error::AuthenticationFailed.is_recoverable());
    }

    #[test]
    fn test_user_action_errors() {
        assert!(Error::SigningRejected("no".into()).requires_user_action());
        assert!(Error::NoKeypair.requires_user_action());
        assert!(!Error::InvalidAddress("0x".into()).requires_user_action());
        assert!(!Error::AuthenticationFailed.requires_user_action());
    }

    #[test]
    fn test_authentication_failure_message_has_no_detail() {
        assert_eq!(Error::AuthenticationFailed.to_string(), "Decryption failed");
    }

    #[test]
    fn test_invalid_public_key_names_index() {
        let e = Error::InvalidPublicKey {
            index: 3,
            reason: "bad hex".into(),
        };
        assert_eq!(e.to_string(), "Invalid public key at index 3: bad hex");
    }
}
