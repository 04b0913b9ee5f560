// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! AES-256-GCM sealing and opening.
//!
//! The adapter owns nonce management: `seal` draws a fresh random nonce and
//! prepends it to the ciphertext, so callers pass only a key and the opaque
//! blob. `open` authenticates before returning plaintext; a wrong key or a
//! corrupted blob fails, it never returns garbage.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Key, Nonce};
use zeroize::Zeroizing;

use super::kdf::KEY_LEN;
use super::CryptoError;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` under `key`, returning `nonce || ciphertext || tag`.
pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Authenticate and decrypt a blob produced by [`seal`].
///
/// # Errors
///
/// `CryptoError::Decryption` when the blob is truncated, any byte of it has
/// been altered, or the key is wrong.
pub fn open(key: &[u8; KEY_LEN], blob: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if blob.len() <= NONCE_LEN {
        return Err(CryptoError::Decryption);
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Decryption)?;
    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];

    #[test]
    fn seal_open_round_trip() {
        let blob = seal(&KEY, b"budget secrets").unwrap();
        let plaintext = open(&KEY, &blob).unwrap();
        assert_eq!(&*plaintext, b"budget secrets");
    }

    #[test]
    fn nonces_make_blobs_unique() {
        let a = seal(&KEY, b"same input").unwrap();
        let b = seal(&KEY, b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let blob = seal(&KEY, b"payload").unwrap();
        let wrong = [0x17; KEY_LEN];
        assert!(matches!(open(&wrong, &blob), Err(CryptoError::Decryption)));
    }

    #[test]
    fn every_flipped_byte_is_detected() {
        let blob = seal(&KEY, b"payload").unwrap();
        for i in 0..blob.len() {
            let mut tampered = blob.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(open(&KEY, &tampered), Err(CryptoError::Decryption)),
                "tampering byte {i} went undetected"
            );
        }
    }

    #[test]
    fn truncated_blob_fails() {
        let blob = seal(&KEY, b"payload").unwrap();
        assert!(matches!(open(&KEY, &blob[..NONCE_LEN]), Err(CryptoError::Decryption)));
        assert!(matches!(open(&KEY, &[]), Err(CryptoError::Decryption)));
    }
}
