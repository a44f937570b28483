//! Envelope types and their wire form.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::crypto::{Iv, PublicKey, Tag, IV_SIZE, PUBLIC_KEY_SIZE, TAG_SIZE};
use crate::error::{Error, Result};

/// Ciphertext addressed to exactly one recipient
///
/// Self-contained: the recipient's private key plus these four fields are
/// all that decryption needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Ephemeral public key for key agreement
    pub encapsulation: PublicKey,
    /// AES-GCM IV, fresh per envelope
    pub iv: Iv,
    /// AES-GCM authentication tag
    pub tag: Tag,
    /// Ciphertext, same length as the plaintext
    pub encrypted: Vec<u8>,
}

/// Text encoding for envelope fields on the wire
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEncoding {
    /// Lowercase hex
    #[default]
    Hex,
    /// Standard base64 with padding
    Base64,
}

impl WireEncoding {
    /// Encode bytes
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            WireEncoding::Hex => hex::encode(bytes),
            WireEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Decode a field, naming it in the error
    pub fn decode(&self, field: &str, text: &str) -> Result<Vec<u8>> {
        match self {
            WireEncoding::Hex => hex::decode(text)
                .map_err(|e| Error::InvalidEnvelope(format!("{}: invalid hex: {}", field, e))),
            WireEncoding::Base64 => base64::engine::general_purpose::STANDARD
                .decode(text)
                .map_err(|e| Error::InvalidEnvelope(format!("{}: invalid base64: {}", field, e))),
        }
    }

    fn decode_array<const N: usize>(&self, field: &str, text: &str) -> Result<[u8; N]> {
        let bytes = self.decode(field, text)?;
        bytes.try_into().map_err(|v: Vec<u8>| {
            Error::InvalidEnvelope(format!("{}: expected {} bytes, got {}", field, N, v.len()))
        })
    }
}

/// An envelope with every field as encoded text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnvelope {
    /// Encoded ephemeral public key
    pub encapsulation: String,
    /// Encoded IV
    pub iv: String,
    /// Encoded tag
    pub tag: String,
    /// Encoded ciphertext
    pub encrypted: String,
}

impl Envelope {
    /// Encode every field with `encoding`
    pub fn to_wire(&self, encoding: WireEncoding) -> WireEnvelope {
        WireEnvelope {
            encapsulation: encoding.encode(self.encapsulation.as_bytes()),
            iv: encoding.encode(self.iv.as_bytes()),
            tag: encoding.encode(self.tag.as_bytes()),
            encrypted: encoding.encode(&self.encrypted),
        }
    }

    /// Decode a wire envelope, checking field lengths
    pub fn from_wire(wire: &WireEnvelope, encoding: WireEncoding) -> Result<Self> {
        Ok(Self {
            encapsulation: PublicKey::from_bytes(
                encoding.decode_array::<PUBLIC_KEY_SIZE>("encapsulation", &wire.encapsulation)?,
            ),
            iv: Iv::from_bytes(encoding.decode_array::<IV_SIZE>("iv", &wire.iv)?),
            tag: Tag::from_bytes(encoding.decode_array::<TAG_SIZE>("tag", &wire.tag)?),
            encrypted: encoding.decode("encrypted", &wire.encrypted)?,
        })
    }
}
