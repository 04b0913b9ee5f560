// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! The credential encryptor.
//!
//! Orchestrates KEM, KDF and cipher into the recoverable credential record:
//! a fresh Kyber1024 keypair per registration, a shared secret encapsulated
//! against the throwaway public key, a fresh salt, and the password sealed
//! under the derived key. Recovery runs the same pipeline backwards from the
//! persisted material.
//!
//! Storing passwords as recoverable ciphertext is materially weaker than a
//! one-way salted hash; it is kept because the credential contract requires
//! `decrypt`. Deployments that do not need password recovery should prefer
//! a verify-only scheme.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::{cipher, kdf, kem, CryptoError};
use crate::models::AuthMaterial;

/// Turns plaintext passwords into [`AuthMaterial`] and back.
///
/// Stateless apart from the KDF cost parameters; safe to share across
/// concurrent calls. Never logs, prints, or persists anything.
#[derive(Debug, Clone, Copy)]
pub struct CredentialEncryptor {
    kdf: kdf::KdfParams,
}

impl CredentialEncryptor {
    pub fn new(kdf: kdf::KdfParams) -> Self {
        Self { kdf }
    }

    /// Encrypt `password` into durable credential material.
    ///
    /// The KEM public key is used once for encapsulation and discarded; it
    /// is not required for decryption and is not persisted. The caller owns
    /// the plaintext and must clear it as soon as this returns.
    pub fn encrypt(&self, password: &str) -> Result<AuthMaterial, CryptoError> {
        let (public_key, private_key) = kem::generate_keypair();
        let (shared_secret, encapsulated) = kem::encapsulate(&public_key)?;

        let salt = kdf::generate_salt();
        let key = kdf::derive(&shared_secret, &salt, self.kdf)?;
        let sealed = cipher::seal(&key, password.as_bytes())?;

        AuthMaterial::new(private_key, encapsulated, salt.to_vec(), sealed)
    }

    /// Recover the plaintext password from `material`.
    ///
    /// Material completeness is enforced by [`AuthMaterial`]'s constructor,
    /// so every value reaching this point carries all four fields.
    ///
    /// # Errors
    ///
    /// `CryptoError::Decapsulation` for malformed key material,
    /// `CryptoError::Decryption` when the sealed password fails to
    /// authenticate (tampered blob or mismatched keys).
    pub fn decrypt(&self, material: &AuthMaterial) -> Result<Zeroizing<String>, CryptoError> {
        let shared_secret =
            kem::decapsulate(material.private_key(), material.encapsulated_secret())?;
        let key = kdf::derive(&shared_secret, material.salt(), self.kdf)?;
        let plaintext = cipher::open(&key, material.encrypted_password())?;

        let recovered =
            String::from_utf8(plaintext.to_vec()).map_err(|_| CryptoError::InvalidPlaintext)?;
        Ok(Zeroizing::new(recovered))
    }

    /// Compare `candidate` against the password sealed in `material`.
    ///
    /// The recovered plaintext is compared in constant time. A wrong
    /// password and corrupted material are both plain `false`; neither is
    /// distinguishable to the caller and neither panics.
    pub fn verify(&self, material: &AuthMaterial, candidate: &str) -> bool {
        match self.decrypt(material) {
            Ok(recovered) => recovered.as_bytes().ct_eq(candidate.as_bytes()).into(),
            Err(_) => false,
        }
    }
}

impl Default for CredentialEncryptor {
    fn default() -> Self {
        Self::new(kdf::KdfParams::default())
    }
}
