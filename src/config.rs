// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! # Authentication Configuration
//!
//! This module defines the tunable parameters of the authentication core.
//! Loading values from the environment is the embedding server's job; this
//! crate only consumes a fully-formed [`AuthConfig`].
//!
//! ## Parameters
//!
//! | Parameter | Description | Default |
//! |-----------|-------------|---------|
//! | `token_ttl_minutes` | Bearer-token lifetime | `30` |
//! | `token_leeway_secs` | Clock-skew tolerance when validating `exp` | `0` |
//! | `kdf` | scrypt cost parameters for key stretching | `N=2^14, r=8, p=1` |
//! | `signing` | Token signing-secret source | per-user private key |

use crate::crypto::kdf::KdfParams;

/// Default bearer-token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Default clock-skew tolerance in seconds when validating token expiry.
pub const DEFAULT_TOKEN_LEEWAY_SECS: u64 = 0;

/// Source of the secret used to sign and verify bearer tokens.
///
/// The historical scheme signs each user's tokens with that user's own KEM
/// private key, which couples token validity to credential-material
/// lifecycle: validation must fetch the private key on every request, and a
/// rotated or purged key silently invalidates all outstanding tokens.
/// Deployments that do not need compatibility with that scheme should prefer
/// a dedicated server-held secret.
#[derive(Debug, Clone)]
pub enum TokenSigning {
    /// Sign each identity's tokens with its own KEM private key.
    PerUserPrivateKey,
    /// Sign all tokens with a single server-held secret.
    ServerSecret(Vec<u8>),
}

/// Configuration for the authentication core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer-token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Clock-skew tolerance in seconds when validating token expiry.
    pub token_leeway_secs: u64,
    /// scrypt parameters used to stretch KEM shared secrets.
    pub kdf: KdfParams,
    /// Where the token signing secret comes from.
    pub signing: TokenSigning,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            token_leeway_secs: DEFAULT_TOKEN_LEEWAY_SECS,
            kdf: KdfParams::default(),
            signing: TokenSigning::PerUserPrivateKey,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_minutes, 30);
        assert_eq!(config.token_leeway_secs, 0);
        assert!(matches!(config.signing, TokenSigning::PerUserPrivateKey));
    }
}
