// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! Bearer-token issuance and validation.
//!
//! Tokens are stateless HS256 JWTs over `{sub, exp}`. The signing secret is
//! supplied by the caller on every operation because the service supports
//! two sources: a server-held secret, or the historical scheme where each
//! identity's tokens are signed with its own KEM private key. In the latter
//! mode the subject must be read from the unverified payload first
//! ([`TokenIssuer::peek_subject`]) to locate the key that can verify the
//! signature.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::Token;

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the identity's username.
    pub sub: String,
    /// Expiry as a Unix timestamp (seconds).
    pub exp: u64,
}

/// Token validation/issuance error type.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Malformed,

    #[error("token signing failed")]
    Signing,
}

/// Mints and validates bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    ttl: Duration,
    leeway_secs: u64,
}

impl TokenIssuer {
    pub fn new(ttl: Duration, leeway_secs: u64) -> Self {
        Self { ttl, leeway_secs }
    }

    /// Issue a token for `subject`, expiring `ttl` from now.
    pub fn issue(&self, subject: &str, signing_secret: &[u8]) -> Result<Token, TokenError> {
        let expires_at = Utc::now() + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp().max(0) as u64,
        };
        let encoded = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(signing_secret),
        )
        .map_err(|_| TokenError::Signing)?;
        Ok(Token::bearer(encoded))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn validate(&self, token: &str, signing_secret: &[u8]) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(signing_secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;
        Ok(token_data.claims)
    }

    /// Read the subject from the payload WITHOUT verifying the signature.
    ///
    /// Only used to locate the identity whose private key can then perform
    /// real verification; the result must never be trusted on its own.
    pub fn peek_subject(token: &str) -> Option<String> {
        jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .ok()
            .map(|data| data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test signing secret";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(Duration::minutes(30), 0)
    }

    #[test]
    fn issue_validate_round_trip() {
        let issuer = issuer();
        let token = issuer.issue("alice", SECRET).unwrap();
        assert_eq!(token.token_type, "bearer");

        let claims = issuer.validate(&token.access_token, SECRET).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > Utc::now().timestamp() as u64);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue("alice", SECRET).unwrap();
        let err = issuer
            .validate(&token.access_token, b"another secret")
            .unwrap_err();
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired_issuer = TokenIssuer::new(Duration::seconds(-120), 0);
        let token = expired_issuer.issue("alice", SECRET).unwrap();
        let err = expired_issuer
            .validate(&token.access_token, SECRET)
            .unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn leeway_tolerates_recent_expiry() {
        let issuer = TokenIssuer::new(Duration::seconds(-30), 300);
        let token = issuer.issue("alice", SECRET).unwrap();
        assert!(issuer.validate(&token.access_token, SECRET).is_ok());
    }

    #[test]
    fn garbage_is_malformed() {
        let issuer = issuer();
        assert!(matches!(
            issuer.validate("not-a-token", SECRET),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn peek_subject_reads_unverified_payload() {
        let issuer = issuer();
        let token = issuer.issue("alice", SECRET).unwrap();
        assert_eq!(
            TokenIssuer::peek_subject(&token.access_token).as_deref(),
            Some("alice")
        );
        assert!(TokenIssuer::peek_subject("garbage").is_none());
    }
}
