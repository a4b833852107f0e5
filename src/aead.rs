//! Symmetric helpers: the self-inverse diversifier stream cipher and the
//! recipient-data AEAD (`spec.md` §4.6-§4.8, "Miscellaneous" in §2).
//!
//! Both primitives are keyed by a 32-byte key derived once per use via
//! [`crate::algebra::hash_to_bytes32`], so a fixed all-zero nonce is safe:
//! key reuse under the same nonce never occurs because every key is itself
//! a fresh hash of unique inputs (`s1` and the diversifier index for the
//! stream cipher; `K_der` for the AEAD).

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};

use crate::error::{Result, SparkError};

const ZERO_NONCE: [u8; 12] = [0u8; 12];
const ZERO_NONCE_24: [u8; 24] = [0u8; 24];

/// Applies the ChaCha20 keystream to `data` in place. Self-inverse under the
/// same key: calling this twice with the same key recovers the original
/// bytes, exactly the property `spec.md` §4.6 relies on for diversifier
/// encryption/decryption.
pub fn stream_cipher_apply(key: &[u8; 32], data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let mut cipher = ChaCha20::new(key.into(), &ZERO_NONCE.into());
    cipher.apply_keystream(&mut buf);
    buf
}

pub fn aead_encrypt(key: &[u8; 32], plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = Nonce::from_slice(&ZERO_NONCE_24[..12]);
    cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: associated_data,
            },
        )
        .map_err(|_| SparkError::InvalidWitness("aead: encryption failed".into()))
}

pub fn aead_decrypt(
    key: &[u8; 32],
    ciphertext: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = Nonce::from_slice(&ZERO_NONCE_24[..12]);
    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: associated_data,
            },
        )
        .map_err(|_| SparkError::NotMine)
}
