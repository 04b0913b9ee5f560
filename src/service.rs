// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! The authentication façade.
//!
//! Composes the credential encryptor, the identity store and the token
//! issuer into the three flows the embedding server calls: registration,
//! login, and bearer-token validation. This is also the error-translation
//! boundary: cryptographic failures surface as the undifferentiated
//! [`AuthError::AuthenticationFailed`], and internal invariant violations
//! are logged here as server faults before being returned.
//!
//! The store handle is injected at construction; the service holds no other
//! mutable state and is safely re-entrant.

use chrono::Duration;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::config::{AuthConfig, TokenSigning};
use crate::crypto::CredentialEncryptor;
use crate::error::AuthError;
use crate::models::{AuthMaterial, Identity, RegisterRequest, Token};
use crate::store::{IdentityStore, StoreError};
use crate::token::TokenIssuer;

/// Registration, login and token-validation flows.
pub struct AuthenticationService<S: IdentityStore> {
    store: S,
    encryptor: CredentialEncryptor,
    issuer: TokenIssuer,
    signing: TokenSigning,
}

impl<S: IdentityStore> AuthenticationService<S> {
    pub fn new(store: S, config: AuthConfig) -> Self {
        Self {
            store,
            encryptor: CredentialEncryptor::new(config.kdf),
            issuer: TokenIssuer::new(
                Duration::minutes(config.token_ttl_minutes),
                config.token_leeway_secs,
            ),
            signing: config.signing,
        }
    }

    /// Access the underlying store (identity reads for the outer layers).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new identity and issue its first token.
    ///
    /// The request password is zeroized as soon as credential material has
    /// been derived from it. Identity and material are persisted in one
    /// atomic store operation.
    ///
    /// # Errors
    ///
    /// [`AuthError::DuplicateIdentity`] when the username or email is
    /// already taken by a non-disabled identity.
    pub fn register(&self, mut request: RegisterRequest) -> Result<Token, AuthError> {
        let material = self.encryptor.encrypt(&request.password).map_err(|e| {
            tracing::error!(error = %e, "credential encryption failed during registration");
            AuthError::CredentialMaterial(e.to_string())
        })?;
        request.password.zeroize();

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            disabled: false,
        };
        self.store.create_identity(&identity, &material)?;

        self.issue(&identity.username, &material)
    }

    /// Authenticate `username`/`password` and issue a token.
    ///
    /// Unknown username, disabled identity and wrong password all fail with
    /// the same [`AuthError::AuthenticationFailed`].
    pub fn login(&self, username: &str, password: &str) -> Result<Token, AuthError> {
        let identity = self
            .store
            .find_by_username(username)?
            .filter(|identity| !identity.disabled)
            .ok_or(AuthError::AuthenticationFailed)?;

        let material = self.material_for(&identity)?;
        if !self.encryptor.verify(&material, password) {
            return Err(AuthError::AuthenticationFailed);
        }

        self.issue(&identity.username, &material)
    }

    /// Check a password without issuing a token.
    ///
    /// Any failure along the way (unknown or disabled identity, missing
    /// material, wrong password) is plain `false`.
    pub fn verify_password(&self, username: &str, password: &str) -> bool {
        let Ok(Some(identity)) = self.store.find_by_username(username) else {
            return false;
        };
        if identity.disabled {
            return false;
        }
        let Ok(material) = self.material_for(&identity) else {
            return false;
        };
        self.encryptor.verify(&material, password)
    }

    /// Resolve a bearer token to its identity.
    ///
    /// Fails with [`AuthError::AuthenticationFailed`] when the signature
    /// does not verify, the token has expired, or the subject no longer
    /// resolves to a non-disabled identity.
    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let subject = match &self.signing {
            // Per-user signing: the subject must be read (unverified) first
            // to locate the private key that can verify the signature.
            TokenSigning::PerUserPrivateKey => {
                TokenIssuer::peek_subject(token).ok_or(AuthError::AuthenticationFailed)?
            }
            TokenSigning::ServerSecret(secret) => {
                self.issuer
                    .validate(token, secret)
                    .map_err(|_| AuthError::AuthenticationFailed)?
                    .sub
            }
        };

        let identity = self
            .store
            .find_by_username(&subject)?
            .filter(|identity| !identity.disabled)
            .ok_or(AuthError::AuthenticationFailed)?;

        if let TokenSigning::PerUserPrivateKey = self.signing {
            let material = self.material_for(&identity)?;
            self.issuer
                .validate(token, material.private_key())
                .map_err(|_| AuthError::AuthenticationFailed)?;
        }

        Ok(identity)
    }

    /// Soft-disable an identity. Outstanding tokens stop validating because
    /// `authenticate` re-resolves the subject on every call.
    pub fn disable(&self, identity_id: &str) -> Result<(), AuthError> {
        self.store.disable(identity_id)?;
        Ok(())
    }

    fn issue(&self, username: &str, material: &AuthMaterial) -> Result<Token, AuthError> {
        let secret = match &self.signing {
            TokenSigning::PerUserPrivateKey => material.private_key(),
            TokenSigning::ServerSecret(secret) => secret.as_slice(),
        };
        self.issuer.issue(username, secret).map_err(|e| {
            tracing::error!(error = %e, "token issuance failed");
            AuthError::CredentialMaterial(e.to_string())
        })
    }

    /// Fetch credential material, treating absence or corruption as the
    /// server fault it is: logged, then surfaced as `CredentialMaterial`.
    fn material_for(&self, identity: &Identity) -> Result<AuthMaterial, AuthError> {
        match self.store.load_material(&identity.id) {
            Ok(Some(material)) => Ok(material),
            Ok(None) => {
                tracing::error!(identity_id = %identity.id, "credential material missing");
                Err(AuthError::CredentialMaterial(
                    "missing credential record".to_string(),
                ))
            }
            Err(StoreError::Corrupt(msg)) => {
                tracing::error!(identity_id = %identity.id, "credential material corrupt: {msg}");
                Err(AuthError::CredentialMaterial(msg))
            }
            Err(other) => Err(other.into()),
        }
    }
}
