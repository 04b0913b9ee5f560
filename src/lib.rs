// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! householdbudget-auth - Credential Encryption & Authentication Core
//!
//! This crate implements the credential subsystem of the household-budget
//! backend: per-user Kyber1024 key encapsulation, scrypt key stretching and
//! AES-256-GCM password sealing, persisted as recoverable `AuthMaterial`,
//! plus HS256 bearer-token issuance bound to that material.
//!
//! ## Modules
//!
//! - `crypto` - KEM, KDF, cipher and the credential encryptor
//! - `store` - Identity/credential persistence (embedded redb)
//! - `token` - Bearer-token issuance and validation
//! - `service` - Registration, login and token-validation façade

pub mod config;
pub mod crypto;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod token;

pub use config::{AuthConfig, TokenSigning};
pub use error::AuthError;
pub use models::{AuthMaterial, Identity, RegisterRequest, Token};
pub use service::AuthenticationService;
pub use store::{IdentityStore, RedbStore, StoreError};
