// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! # Core Data Models
//!
//! This module defines the records the authentication core operates on:
//! identities, registration requests, bearer tokens, and the recoverable
//! credential record [`AuthMaterial`].
//!
//! `AuthMaterial` intentionally implements neither `Serialize` nor `Clone`:
//! the private key it owns must never end up in a response payload, and the
//! store persists it through an opaque binary framing instead.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::CryptoError;

// =============================================================================
// Identity
// =============================================================================

/// A registered user.
///
/// Identities are created at registration and never hard-deleted; the only
/// mutation the core performs is setting the soft-disable flag. Credential
/// material is associated by `id` and fetched separately, so ordinary
/// identity reads never touch private key material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Stable unique identifier.
    pub id: String,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Soft-disable flag; disabled identities cannot log in.
    pub disabled: bool,
}

/// Registration input for a new identity.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Requested login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password. The service zeroizes this immediately after
    /// credential material has been derived from it.
    pub password: String,
}

// =============================================================================
// Token
// =============================================================================

/// A bearer token issued on registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Signed, opaque token string.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

// =============================================================================
// AuthMaterial
// =============================================================================

/// The recoverable credential record, one per identity.
///
/// Produced once at registration by the credential encryptor and read (never
/// mutated) on every verification. The KEM public key is transient and is
/// discarded after encryption; everything needed for recovery is here:
///
/// - `private_key`: KEM private key (sensitive, zeroized on drop)
/// - `encapsulated_secret`: KEM encapsulation output
/// - `salt`: per-record KDF salt
/// - `encrypted_password`: AEAD-sealed password
///
/// All four fields must be present; partial material is rejected at
/// construction.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct AuthMaterial {
    private_key: Vec<u8>,
    encapsulated_secret: Vec<u8>,
    salt: Vec<u8>,
    encrypted_password: Vec<u8>,
}

impl AuthMaterial {
    /// Assemble credential material, enforcing the all-or-nothing invariant.
    pub fn new(
        private_key: Vec<u8>,
        encapsulated_secret: Vec<u8>,
        salt: Vec<u8>,
        encrypted_password: Vec<u8>,
    ) -> Result<Self, CryptoError> {
        if private_key.is_empty() {
            return Err(CryptoError::IncompleteMaterial("private_key"));
        }
        if encapsulated_secret.is_empty() {
            return Err(CryptoError::IncompleteMaterial("encapsulated_secret"));
        }
        if salt.is_empty() {
            return Err(CryptoError::IncompleteMaterial("salt"));
        }
        if encrypted_password.is_empty() {
            return Err(CryptoError::IncompleteMaterial("encrypted_password"));
        }
        Ok(Self {
            private_key,
            encapsulated_secret,
            salt,
            encrypted_password,
        })
    }

    /// KEM private key bytes. Handle with care; never serialize.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// KEM encapsulation output.
    pub fn encapsulated_secret(&self) -> &[u8] {
        &self.encapsulated_secret
    }

    /// KDF salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// AEAD-sealed password blob.
    pub fn encrypted_password(&self) -> &[u8] {
        &self.encrypted_password
    }
}

impl std::fmt::Debug for AuthMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AuthMaterial {{ private_key: [REDACTED], encapsulated_secret: {} bytes, \
             salt: {} bytes, encrypted_password: {} bytes }}",
            self.encapsulated_secret.len(),
            self.salt.len(),
            self.encrypted_password.len()
        )
    }
}
