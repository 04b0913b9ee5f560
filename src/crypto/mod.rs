// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! # Credential Cryptography
//!
//! Primitives and orchestration for recoverable password credentials:
//!
//! 1. `kem` - Kyber1024 key encapsulation: a fresh per-user keypair and a
//!    shared secret recoverable from the persisted encapsulation output.
//! 2. `kdf` - scrypt stretching of the shared secret plus a per-record salt
//!    into a fixed 32-byte cipher key.
//! 3. `cipher` - AES-256-GCM sealing of the plaintext password under that
//!    key, with the nonce managed internally.
//! 4. `encryptor` - the `CredentialEncryptor` composing the three into
//!    `AuthMaterial` and recovering/comparing passwords from it.
//!
//! ## Security
//!
//! - Shared secrets, derived keys and recovered plaintext are zeroized.
//! - Decapsulation uses implicit rejection: mismatched inputs yield a wrong
//!   secret rather than an error, so the AEAD tag is the authoritative
//!   verification step.
//! - Nothing in this module logs, prints, or persists secret material.

pub mod cipher;
pub mod encryptor;
pub mod kdf;
pub mod kem;

pub use encryptor::CredentialEncryptor;

/// Error type for the cryptographic layers.
///
/// Variants carry no secret material and no primitive-specific detail; the
/// service boundary collapses them further into an undifferentiated
/// authentication failure.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Public key bytes could not be parsed for encapsulation.
    #[error("malformed public key")]
    Encapsulation,

    /// Private key or encapsulated-secret bytes could not be parsed.
    #[error("malformed private key or encapsulated secret")]
    Decapsulation,

    /// Key derivation failed (invalid cost parameters or output length).
    #[error("key derivation failed")]
    KeyDerivation,

    /// Symmetric sealing failed.
    #[error("encryption failed")]
    Encryption,

    /// Authentication-tag mismatch or truncated ciphertext blob.
    #[error("decryption failed")]
    Decryption,

    /// Credential material is missing a required field.
    #[error("credential material is missing field: {0}")]
    IncompleteMaterial(&'static str),

    /// Recovered plaintext is not valid UTF-8.
    #[error("recovered plaintext is not valid UTF-8")]
    InvalidPlaintext,
}
