//! # Hybrid Messenger
//!
//! Multi-recipient encryption: one independent envelope per recipient.
//!
//! ## Envelope Construction
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  encrypt_to_pubkeys(message, [pk_1 .. pk_n])                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  parse + validate every pk_i first (any failure aborts the batch)      │
//! │                                                                         │
//! │  for each pk_i:                                                        │
//! │    1. e_i ← fresh X25519 secret (OsRng)                                │
//! │    2. s_i ← X25519(e_i, pk_i)           (refuse low-order pk_i)        │
//! │    3. k_i ← HKDF(s_i, salt = E_i || pk_i)                              │
//! │    4. iv_i ← 12 random bytes                                           │
//! │    5. (c_i, t_i) ← AES-256-GCM(k_i, iv_i, message)                     │
//! │    6. Envelope { encapsulation: E_i, iv_i, t_i, c_i }                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Envelopes share no secret material, so one recipient's key says nothing
//! about another recipient's envelope.
//!
//! Decryption reverses steps 2-5 with the recipient's private key. Every
//! failure collapses into `AuthenticationFailed`.

mod envelope;

pub use envelope::{Envelope, WireEncoding, WireEnvelope};

use crate::crypto::{open, seal, Iv, PrivateKey, PublicKey};
use crate::error::{Error, Result};

/// Encrypt `message` to each hex-encoded recipient key, preserving order
///
/// ## Errors
///
/// `InvalidPublicKey` naming the first bad key's index. No envelopes are
/// returned in that case.
pub fn encrypt_to_pubkeys<S: AsRef<str>>(
    message: &[u8],
    recipients: &[S],
) -> Result<Vec<Envelope>> {
    let keys = recipients
        .iter()
        .enumerate()
        .map(|(i, hex)| PublicKey::from_hex(hex.as_ref()).map_err(|e| e.at_index(i)))
        .collect::<Result<Vec<_>>>()?;

    encrypt_to_recipients(message, &keys)
}

/// Encrypt `message` to each recipient key, preserving order
pub fn encrypt_to_recipients(message: &[u8], recipients: &[PublicKey]) -> Result<Vec<Envelope>> {
    let envelopes = recipients
        .iter()
        .enumerate()
        .map(|(i, recipient)| encrypt_for_recipient(message, recipient).map_err(|e| e.at_index(i)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "Encrypted {} byte message for {} recipients",
        message.len(),
        envelopes.len()
    );
    Ok(envelopes)
}

/// Encrypt `message` for a single recipient
pub fn encrypt_for_recipient(message: &[u8], recipient: &PublicKey) -> Result<Envelope> {
    seal_envelope(&PrivateKey::generate(), Iv::random(), recipient, message)
}

fn seal_envelope(
    ephemeral: &PrivateKey,
    iv: Iv,
    recipient: &PublicKey,
    message: &[u8],
) -> Result<Envelope> {
    let encapsulation = ephemeral.public_key();
    let shared = ephemeral
        .agree(recipient)
        .ok_or_else(|| Error::InvalidPublicKey {
            index: 0,
            reason: "low-order point".into(),
        })?;
    let key = shared.derive_key(&encapsulation, recipient)?;
    let (encrypted, tag) = seal(&key, &iv, message)?;

    Ok(Envelope {
        encapsulation,
        iv,
        tag,
        encrypted,
    })
}

/// Decrypt an envelope addressed to `private_key`
///
/// ## Errors
///
/// `AuthenticationFailed` for any reason: tampering, wrong key, or a
/// degenerate encapsulation. Callers cannot tell these apart.
pub fn decrypt_for_user(envelope: &Envelope, private_key: &PrivateKey) -> Result<Vec<u8>> {
    let shared = private_key
        .agree(&envelope.encapsulation)
        .ok_or(Error::AuthenticationFailed)?;
    let key = shared
        .derive_key(&envelope.encapsulation, &private_key.public_key())
        .map_err(|_| Error::AuthenticationFailed)?;

    open(&key, &envelope.iv, &envelope.encrypted, &envelope.tag)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KeyPair, Tag};
    use std::collections::HashSet;

    fn flip_bit(bytes: &mut [u8], bit: usize) {
        bytes[bit / 8] ^= 1 << (bit % 8);
    }

    #[test]
    fn test_round_trip() {
        let bob = KeyPair::generate();

        let envelopes = encrypt_to_pubkeys(b"hello", &[bob.public_key_hex()]).unwrap();
        assert_eq!(envelopes.len(), 1);

        let plaintext = decrypt_for_user(&envelopes[0], bob.private_key()).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn test_round_trip_empty_message() {
        let bob = KeyPair::generate();
        let envelope = encrypt_for_recipient(b"", &bob.public_key()).unwrap();

        assert!(decrypt_for_user(&envelope, bob.private_key()).unwrap().is_empty());
    }

    #[test]
    fn test_known_envelope_decrypts() {
        // Sealed with ephemeral secret [7; 32] and IV 00..0b to the key
        // derived from the "derive-comms-key" fixture signature
        let recipient = PrivateKey::from_bytes(
            hex::decode("3f15bff3ee07f25041851ade95be18e84b7c810d1ae4452c1ce15d1493894122")
                .unwrap()
                .try_into()
                .unwrap(),
        );
        let envelope = Envelope {
            encapsulation: PublicKey::from_hex(
                "13be4feaeaf204c7fd3358fc9c00721881d174278128227ec674f37f7fe97b6d",
            )
            .unwrap(),
            iv: Iv::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
            tag: Tag::from_bytes(
                hex::decode("a533fa697eff19859d857f418251f511")
                    .unwrap()
                    .try_into()
                    .unwrap(),
            ),
            encrypted: hex::decode("a3d3bc3a41").unwrap(),
        };

        assert_eq!(decrypt_for_user(&envelope, &recipient).unwrap(), b"hello");

        let resealed = seal_envelope(
            &PrivateKey::from_bytes([7u8; 32]),
            envelope.iv,
            &recipient.public_key(),
            b"hello",
        )
        .unwrap();
        assert_eq!(resealed, envelope);
    }

    #[test]
    fn test_output_order_matches_input() {
        let recipients: Vec<KeyPair> = (0..4).map(|_| KeyPair::generate()).collect();
        let hexes: Vec<String> = recipients.iter().map(|k| k.public_key_hex()).collect();

        let envelopes = encrypt_to_pubkeys(b"fan-out", &hexes).unwrap();

        assert_eq!(envelopes.len(), recipients.len());
        for (kp, env) in recipients.iter().zip(&envelopes) {
            assert_eq!(decrypt_for_user(env, kp.private_key()).unwrap(), b"fan-out");
        }
    }

    #[test]
    fn test_empty_recipient_list() {
        let none: [&str; 0] = [];
        assert!(encrypt_to_pubkeys(b"hello", &none).unwrap().is_empty());
    }

    #[test]
    fn test_recipient_independence() {
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();

        let envs = encrypt_to_recipients(b"same message", &[alice.public_key(), bob.public_key()])
            .unwrap();

        assert_ne!(envs[0].encapsulation, envs[1].encapsulation);
        assert_ne!(envs[0].iv, envs[1].iv);
        assert_ne!(envs[0].encrypted, envs[1].encrypted);

        assert!(decrypt_for_user(&envs[0], alice.private_key()).is_ok());
        assert!(decrypt_for_user(&envs[1], bob.private_key()).is_ok());
        assert!(matches!(
            decrypt_for_user(&envs[0], bob.private_key()),
            Err(Error::AuthenticationFailed)
        ));
        assert!(matches!(
            decrypt_for_user(&envs[1], alice.private_key()),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_same_recipient_twice_independent() {
        let bob = KeyPair::generate();
        let envs = encrypt_to_recipients(b"twice", &[bob.public_key(), bob.public_key()]).unwrap();

        assert_ne!(envs[0].encapsulation, envs[1].encapsulation);
        assert_ne!(envs[0].encrypted, envs[1].encrypted);
    }

    #[test]
    fn test_iv_uniqueness() {
        let bob = KeyPair::generate();
        let mut ivs = HashSet::new();

        for _ in 0..1000 {
            let env = encrypt_for_recipient(b"x", &bob.public_key()).unwrap();
            assert!(ivs.insert(env.iv), "IV collision");
        }
    }

    #[test]
    fn test_tamper_detection_every_bit() {
        let bob = KeyPair::generate();
        let original = encrypt_for_recipient(b"hello", &bob.public_key()).unwrap();

        for bit in 0..original.encrypted.len() * 8 {
            let mut env = original.clone();
            flip_bit(&mut env.encrypted, bit);
            assert!(matches!(
                decrypt_for_user(&env, bob.private_key()),
                Err(Error::AuthenticationFailed)
            ));
        }
        for bit in 0..96 {
            let mut env = original.clone();
            flip_bit(&mut env.iv.0, bit);
            assert!(matches!(
                decrypt_for_user(&env, bob.private_key()),
                Err(Error::AuthenticationFailed)
            ));
        }
        for bit in 0..128 {
            let mut env = original.clone();
            flip_bit(&mut env.tag.0, bit);
            assert!(matches!(
                decrypt_for_user(&env, bob.private_key()),
                Err(Error::AuthenticationFailed)
            ));
        }
        for bit in 0..256 {
            let mut env = original.clone();
            flip_bit(&mut env.encapsulation.0, bit);
            assert!(matches!(
                decrypt_for_user(&env, bob.private_key()),
                Err(Error::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let bob = KeyPair::generate();
        let mut env = encrypt_for_recipient(b"hello", &bob.public_key()).unwrap();
        env.encrypted.pop();

        assert!(matches!(
            decrypt_for_user(&env, bob.private_key()),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_wrong_key_same_error_as_tampering() {
        let bob = KeyPair::generate();
        let eve = KeyPair::generate();
        let env = encrypt_for_recipient(b"hello", &bob.public_key()).unwrap();

        let wrong_key = decrypt_for_user(&env, eve.private_key()).unwrap_err();

        let mut tampered = env.clone();
        tampered.tag.0[0] ^= 1;
        let tamper = decrypt_for_user(&tampered, bob.private_key()).unwrap_err();

        assert_eq!(wrong_key.code(), tamper.code());
        assert_eq!(wrong_key.to_string(), tamper.to_string());
    }

    #[test]
    fn test_low_order_encapsulation_fails_closed() {
        let bob = KeyPair::generate();
        let mut env = encrypt_for_recipient(b"hello", &bob.public_key()).unwrap();
        env.encapsulation = PublicKey::from_bytes([0u8; 32]);

        assert!(matches!(
            decrypt_for_user(&env, bob.private_key()),
            Err(Error::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_invalid_key_aborts_batch_with_index() {
        let good = KeyPair::generate().public_key_hex();
        let result = encrypt_to_pubkeys(b"hello", &[good.as_str(), "not-a-key", good.as_str()]);

        assert!(matches!(
            result,
            Err(Error::InvalidPublicKey { index: 1, .. })
        ));
    }

    #[test]
    fn test_low_order_recipient_rejected_with_index() {
        let good = KeyPair::generate().public_key();
        let zero = PublicKey::from_bytes([0u8; 32]);
        let result = encrypt_to_recipients(b"hello", &[good, good, zero]);

        assert!(matches!(
            result,
            Err(Error::InvalidPublicKey { index: 2, .. })
        ));
    }
}
