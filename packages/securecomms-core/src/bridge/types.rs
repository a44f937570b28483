//! Typed requests and responses exchanged with the UI.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::messenger::WireEnvelope;

/// Identifier the UI attaches to an incoming message, echoed back unchanged
///
/// Any JSON value is accepted, including `null` or a missing field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub Value);

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl From<Value> for MessageId {
    fn from(id: Value) -> Self {
        Self(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Payload of a keypair generation request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateKeypairRequest {
    /// Message the wallet signs
    pub sign_seed_msg: String,
    /// Account that signs it
    pub address: String,
}

/// Payload of an encrypt request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    /// Plaintext
    pub message: String,
    /// Recipient public keys, one envelope each, in this order
    pub pubkey_hex_strings: Vec<String>,
}

/// Payload of a decrypt request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Echoed back in the response
    #[serde(default)]
    pub id: MessageId,
    /// The envelope fields
    #[serde(flatten)]
    pub envelope: WireEnvelope,
}

/// A request from the UI
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    /// Derive the user's keypair from a wallet signature
    GenerateKeypair(GenerateKeypairRequest),
    /// Encrypt a message to a list of public keys
    Encrypt(EncryptRequest),
    /// Decrypt an envelope with the derived keypair
    Decrypt(DecryptRequest),
    /// Drop the derived keypair from memory
    ForgetKeypair,
}

impl Request {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Request::GenerateKeypair(_) => "generateKeypair",
            Request::Encrypt(_) => "encrypt",
            Request::Decrypt(_) => "decrypt",
            Request::ForgetKeypair => "forgetKeypair",
        }
    }
}

/// A result for the UI
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    /// The derived public key, hex encoded
    UserPubkeyResult {
        /// Public key hex
        pubkey: String,
    },
    /// One envelope per requested recipient, same order
    EncryptionFinished {
        /// Encoded envelopes
        envelopes: Vec<WireEnvelope>,
    },
    /// Outcome of a decrypt request
    DecryptionFinished {
        /// The request's id
        id: MessageId,
        /// Plaintext, or `None` if decryption failed for any reason
        message: Option<String>,
    },
    /// The keypair is gone
    KeypairForgotten,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_json_shape() {
        let req: Request = serde_json::from_str(
            r#"{"type":"generateKeypair","signSeedMsg":"derive-comms-key","address":"0xabc"}"#,
        )
        .unwrap();

        assert_eq!(
            req,
            Request::GenerateKeypair(GenerateKeypairRequest {
                sign_seed_msg: "derive-comms-key".into(),
                address: "0xabc".into(),
            })
        );
    }

    #[test]
    fn test_decrypt_request_flattens_envelope() {
        let req: DecryptRequest = serde_json::from_str(
            r#"{"id":7,"encapsulation":"aa","iv":"bb","tag":"cc","encrypted":"dd"}"#,
        )
        .unwrap();

        assert_eq!(req.id, MessageId::from(7u64));
        assert_eq!(req.envelope.encrypted, "dd");
    }

    #[test]
    fn test_message_id_text() {
        let id: MessageId = serde_json::from_str(r#""msg-1""#).unwrap();
        assert_eq!(id, MessageId::from("msg-1"));
        assert_eq!(id.to_string(), "msg-1");
    }

    #[test]
    fn test_message_id_accepts_any_json() {
        for raw in ["-1", "2.5", "null", r#"{"k":1}"#] {
            let id: MessageId = serde_json::from_str(raw).unwrap();
            assert_eq!(serde_json::to_string(&id).unwrap(), raw);
        }
    }

    #[test]
    fn test_decrypt_request_without_id() {
        let req: DecryptRequest = serde_json::from_str(
            r#"{"encapsulation":"aa","iv":"bb","tag":"cc","encrypted":"dd"}"#,
        )
        .unwrap();
        assert_eq!(req.id, MessageId(Value::Null));
    }

    #[test]
    fn test_failed_decryption_serializes_null() {
        let resp = Response::DecryptionFinished {
            id: MessageId::from(3u64),
            message: None,
        };
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["type"], "decryptionFinished");
        assert!(json["message"].is_null());
    }
}
