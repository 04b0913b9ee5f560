// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! Kyber1024 key encapsulation.
//!
//! Thin byte-slice wrapper over `pqcrypto-kyber`. Keys and encapsulated
//! secrets cross this boundary as raw bytes because the store persists them
//! as opaque blobs and the token issuer consumes the private key directly
//! as a signing secret.
//!
//! Kyber uses implicit rejection: decapsulating with a mismatched private
//! key or a tampered (but well-formed) encapsulated secret returns a wrong
//! shared secret instead of failing. Callers must verify the derived key
//! downstream via the AEAD tag, not by trusting decapsulation success.

use pqcrypto_kyber::kyber1024;
use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};
use zeroize::Zeroizing;

use super::CryptoError;

/// Size of a Kyber1024 public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 1568;

/// Size of a Kyber1024 private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 3168;

/// Size of a Kyber1024 encapsulated secret in bytes.
pub const ENCAPSULATED_LEN: usize = 1568;

/// Size of the shared secret in bytes.
pub const SHARED_SECRET_LEN: usize = 32;

/// Generate a fresh Kyber1024 keypair from the OS CSPRNG.
///
/// Returns `(public_key, private_key)` byte vectors. Every call produces an
/// independent pair.
pub fn generate_keypair() -> (Vec<u8>, Vec<u8>) {
    let (pk, sk) = kyber1024::keypair();
    (pk.as_bytes().to_vec(), sk.as_bytes().to_vec())
}

/// Encapsulate a fresh shared secret against `public_key`.
///
/// Returns `(shared_secret, encapsulated_secret)`. The encapsulated secret
/// is persisted; the shared secret feeds the KDF and is zeroized on drop.
///
/// # Errors
///
/// `CryptoError::Encapsulation` if `public_key` is not a valid Kyber1024
/// public key.
pub fn encapsulate(public_key: &[u8]) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>), CryptoError> {
    let pk = kyber1024::PublicKey::from_bytes(public_key)
        .map_err(|_| CryptoError::Encapsulation)?;
    let (shared, encapsulated) = kyber1024::encapsulate(&pk);
    Ok((
        Zeroizing::new(shared.as_bytes().to_vec()),
        encapsulated.as_bytes().to_vec(),
    ))
}

/// Recover the shared secret from `encapsulated_secret` using `private_key`.
///
/// For any pair this module produced, the result equals the secret returned
/// by the matching [`encapsulate`] call.
///
/// # Errors
///
/// `CryptoError::Decapsulation` if either input has the wrong length or
/// cannot be parsed. Mismatched-but-well-formed inputs do not error; they
/// yield a wrong secret (implicit rejection).
pub fn decapsulate(
    private_key: &[u8],
    encapsulated_secret: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let sk = kyber1024::SecretKey::from_bytes(private_key)
        .map_err(|_| CryptoError::Decapsulation)?;
    let ct = kyber1024::Ciphertext::from_bytes(encapsulated_secret)
        .map_err(|_| CryptoError::Decapsulation)?;
    let shared = kyber1024::decapsulate(&ct, &sk);
    Ok(Zeroizing::new(shared.as_bytes().to_vec()))
}
