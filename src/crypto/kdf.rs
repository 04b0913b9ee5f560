// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! scrypt key derivation.
//!
//! Stretches the KEM shared secret plus a per-record random salt into the
//! fixed 32-byte AES key. The cost parameters are deliberately slow and are
//! part of the persisted-record contract: deriving with the same
//! `(secret, salt)` pair must always yield the same key, so parameters are
//! fixed at material-creation time and never rewritten.

use rand::RngCore;
use scrypt::{scrypt, Params};
use zeroize::Zeroizing;

use super::CryptoError;

/// Length of the derived cipher key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the per-record salt in bytes.
pub const SALT_LEN: usize = 16;

/// scrypt cost parameters.
///
/// Defaults are `N = 2^14, r = 8, p = 1`, the interactive-login cost the
/// credential records were created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the scrypt work factor N.
    pub log_n: u8,
    /// Block size factor.
    pub r: u32,
    /// Parallelization factor.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { log_n: 14, r: 8, p: 1 }
    }
}

/// Derive a fixed-length cipher key from `secret` and `salt`.
///
/// Deterministic for a given `(secret, salt, params)` triple. The result is
/// zeroized on drop.
///
/// # Errors
///
/// `CryptoError::KeyDerivation` if the cost parameters are invalid.
pub fn derive(
    secret: &[u8],
    salt: &[u8],
    params: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let params = Params::new(params.log_n, params.r, params.p, KEY_LEN)
        .map_err(|_| CryptoError::KeyDerivation)?;
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt(secret, salt, &params, key.as_mut()).map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}

/// Generate a fresh random salt.
///
/// Called exactly once per credential record; salts are never reused across
/// records.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap parameters keep the suite fast; production cost is exercised
    // through KdfParams::default in the encryptor tests.
    fn fast() -> KdfParams {
        KdfParams { log_n: 4, r: 8, p: 1 }
    }

    #[test]
    fn derivation_is_deterministic() {
        let secret = b"shared secret material";
        let salt = [7u8; SALT_LEN];
        let a = derive(secret, &salt, fast()).unwrap();
        let b = derive(secret, &salt, fast()).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn different_salts_yield_different_keys() {
        let secret = b"shared secret material";
        let a = derive(secret, &[1u8; SALT_LEN], fast()).unwrap();
        let b = derive(secret, &[2u8; SALT_LEN], fast()).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn different_secrets_yield_different_keys() {
        let salt = [9u8; SALT_LEN];
        let a = derive(b"secret one", &salt, fast()).unwrap();
        let b = derive(b"secret two", &salt, fast()).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn generated_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let bad = KdfParams { log_n: 14, r: 0, p: 1 };
        assert!(matches!(
            derive(b"secret", &[0u8; SALT_LEN], bad),
            Err(CryptoError::KeyDerivation)
        ));
    }
}
