// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! Service-level authentication errors.
//!
//! This is the only error surface the embedding server sees. Failures from
//! the cryptographic layers are translated into [`AuthError`] variants at
//! the service boundary; cryptographic detail never crosses it.

use crate::store::StoreError;

/// Authentication error type.
///
/// `AuthenticationFailed` deliberately covers bad passwords, unknown or
/// disabled identities, and invalid or expired tokens with a single
/// undifferentiated message, so callers cannot enumerate usernames or
/// distinguish failure causes.
#[derive(Debug)]
pub enum AuthError {
    /// Registration conflicts with an existing non-disabled identity.
    DuplicateIdentity,
    /// Credentials or token could not be verified.
    AuthenticationFailed,
    /// Persisted credential material is missing required fields.
    ///
    /// This is an internal invariant violation, never user-caused; the
    /// service logs it as a server fault before returning.
    CredentialMaterial(String),
    /// Persistence failure.
    Store(StoreError),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::DuplicateIdentity => "duplicate_identity",
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::CredentialMaterial(_) => "credential_material",
            AuthError::Store(_) => "store_error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::DuplicateIdentity => {
                write!(f, "Username or email is already registered")
            }
            AuthError::AuthenticationFailed => write!(f, "Invalid username or password"),
            AuthError::CredentialMaterial(msg) => {
                write!(f, "Credential material is invalid: {msg}")
            }
            AuthError::Store(e) => write!(f, "Storage failure: {e}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate { .. } => AuthError::DuplicateIdentity,
            StoreError::Corrupt(msg) => AuthError::CredentialMaterial(msg),
            other => AuthError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(AuthError::DuplicateIdentity.error_code(), "duplicate_identity");
        assert_eq!(
            AuthError::AuthenticationFailed.error_code(),
            "authentication_failed"
        );
    }

    #[test]
    fn authentication_failed_message_is_undifferentiated() {
        // The login error must not reveal whether the username exists.
        assert_eq!(
            AuthError::AuthenticationFailed.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn duplicate_store_error_maps_to_duplicate_identity() {
        let err: AuthError = StoreError::Duplicate { field: "username" }.into();
        assert!(matches!(err, AuthError::DuplicateIdentity));
    }
}
