//! AES-256-CFB encryption of short text fields (stored credentials).
//!
//! Payload format is `base64(iv || ciphertext)` with a random 16-byte IV per
//! call. There is no authentication tag: tampered ciphertext decrypts to
//! garbage instead of failing.

use aes::cipher::{AsyncStreamCipher, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

type Aes256CfbEnc = cfb_mode::Encryptor<aes::Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<aes::Aes256>;

/// Byte length of an AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of the CFB initialization vector (one AES block).
pub const IV_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Configured key is not valid base64 or does not decode to [`KEY_LEN`] bytes.
    #[error("encryption key must decode to {KEY_LEN} bytes for AES-256 (got {0} bytes)")]
    InvalidKeyLength(usize),

    /// Payload is not base64 or is shorter than one IV.
    #[error("malformed encrypted payload")]
    MalformedPayload,
}

/// Encrypt `plaintext` under the base64-encoded 32-byte `encoded_key`.
pub fn encrypt(encoded_key: &str, plaintext: &str) -> Result<String, CipherError> {
    let key = decode_key(encoded_key)?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let mut buf = plaintext.as_bytes().to_vec();
    Aes256CfbEnc::new_from_slices(&key, &iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
        .encrypt(&mut buf);

    let mut payload = Vec::with_capacity(IV_LEN + buf.len());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&buf);

    Ok(STANDARD.encode(payload))
}

/// Decrypt a payload produced by [`encrypt`].
pub fn decrypt(encoded_key: &str, payload: &str) -> Result<String, CipherError> {
    let key = decode_key(encoded_key)?;

    let raw = STANDARD
        .decode(payload)
        .map_err(|_| CipherError::MalformedPayload)?;
    if raw.len() < IV_LEN {
        return Err(CipherError::MalformedPayload);
    }

    let (iv, ciphertext) = raw.split_at(IV_LEN);
    let mut buf = ciphertext.to_vec();
    Aes256CfbDec::new_from_slices(&key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
        .decrypt(&mut buf);

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Generate a fresh random key, base64-encoded for configuration.
pub fn generate_key() -> String {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    STANDARD.encode(key)
}

fn decode_key(encoded_key: &str) -> Result<Vec<u8>, CipherError> {
    let key = STANDARD
        .decode(encoded_key.trim())
        .map_err(|_| CipherError::InvalidKeyLength(0))?;

    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_key() -> String {
        STANDARD.encode([0u8; KEY_LEN])
    }

    #[test]
    fn zero_key_round_trips_hunter2() {
        let key = zero_key();
        let payload = encrypt(&key, "hunter2").unwrap();
        assert_eq!(decrypt(&key, &payload).unwrap(), "hunter2");
    }

    #[test]
    fn round_trips_varied_plaintexts() {
        let key = generate_key();
        for plaintext in ["", "a", "exactly16bytes!!", "Pässwörd with ünïcode ✓", &"x".repeat(1000)] {
            let payload = encrypt(&key, plaintext).unwrap();
            assert_eq!(decrypt(&key, &payload).unwrap(), plaintext);
        }
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let key = generate_key();
        let first = encrypt(&key, "Secret123").unwrap();
        let second = encrypt(&key, "Secret123").unwrap();

        assert_ne!(first, second);
        assert_eq!(decrypt(&key, &first).unwrap(), "Secret123");
        assert_eq!(decrypt(&key, &second).unwrap(), "Secret123");
    }

    #[test]
    fn payload_starts_with_iv() {
        let key = zero_key();
        let payload = STANDARD.decode(encrypt(&key, "hunter2").unwrap()).unwrap();
        assert_eq!(payload.len(), IV_LEN + "hunter2".len());
    }

    #[test]
    fn wrong_key_lengths_are_rejected() {
        let short = STANDARD.encode([1u8; 16]);
        let long = STANDARD.encode([1u8; 33]);

        assert_eq!(encrypt(&short, "x"), Err(CipherError::InvalidKeyLength(16)));
        assert_eq!(encrypt(&long, "x"), Err(CipherError::InvalidKeyLength(33)));

        let payload = encrypt(&zero_key(), "x").unwrap();
        assert_eq!(decrypt(&short, &payload), Err(CipherError::InvalidKeyLength(16)));
        assert_eq!(decrypt(&long, &payload), Err(CipherError::InvalidKeyLength(33)));
    }

    #[test]
    fn missing_or_garbage_key_is_rejected() {
        assert_eq!(encrypt("", "x"), Err(CipherError::InvalidKeyLength(0)));
        assert_eq!(encrypt("%%not base64%%", "x"), Err(CipherError::InvalidKeyLength(0)));
    }

    #[test]
    fn short_payload_is_malformed() {
        let key = zero_key();
        let short = STANDARD.encode([0u8; IV_LEN - 1]);
        assert_eq!(decrypt(&key, &short), Err(CipherError::MalformedPayload));
        assert_eq!(decrypt(&key, "***"), Err(CipherError::MalformedPayload));
    }

    #[test]
    fn bare_iv_decrypts_to_empty() {
        let key = zero_key();
        let iv_only = STANDARD.encode([9u8; IV_LEN]);
        assert_eq!(decrypt(&key, &iv_only).unwrap(), "");
    }

    #[test]
    fn tampered_ciphertext_decrypts_without_error() {
        let key = zero_key();
        let mut raw = STANDARD.decode(encrypt(&key, "hunter2").unwrap()).unwrap();
        raw[IV_LEN] ^= 0xff;

        let recovered = decrypt(&key, &STANDARD.encode(raw)).unwrap();
        assert_ne!(recovered, "hunter2");
    }

    #[test]
    fn generated_keys_are_usable_and_distinct() {
        let a = generate_key();
        let b = generate_key();
        assert_ne!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), KEY_LEN);
    }
}
