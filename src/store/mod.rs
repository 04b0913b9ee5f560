// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! # Identity & Credential Persistence
//!
//! Narrow storage contract consumed by the authentication service, plus the
//! embedded redb implementation. The store owns no cryptographic logic:
//! credential material passes through it as opaque byte blobs, and nothing
//! here exposes those blobs through an identity-read path.
//!
//! Lookups return `Option` rather than erroring on absence; callers decide
//! what a miss means.

pub mod redb_store;

pub use redb_store::RedbStore;

use crate::models::{AuthMaterial, Identity};

/// Error type for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("duplicate {field}")]
    Duplicate { field: &'static str },

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for identities and their credential material.
///
/// Implementations must make `create_identity` atomic: if it returns
/// successfully, a subsequent `load_material` for that identity observes
/// fully-formed material, never a partial write.
pub trait IdentityStore: Send + Sync {
    /// Persist a new identity together with its credential material.
    ///
    /// Fails with [`StoreError::Duplicate`] when the username or email
    /// collides with an existing non-disabled identity. A disabled
    /// identity's username and email may be claimed by a new registration;
    /// the disabled record itself stays retrievable by id.
    fn create_identity(&self, identity: &Identity, material: &AuthMaterial) -> StoreResult<()>;

    /// Look up an identity by username.
    ///
    /// Returns disabled identities too; policy belongs to the caller.
    fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>>;

    /// Look up an identity by id.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Identity>>;

    /// Fetch the credential material for an identity.
    ///
    /// Only credential-scoped paths may call this; ordinary identity reads
    /// never see private key material.
    fn load_material(&self, id: &str) -> StoreResult<Option<AuthMaterial>>;

    /// Soft-disable an identity. Its credential material is retained.
    fn disable(&self, id: &str) -> StoreResult<()>;

    /// List all non-disabled identities. Credential-free read path.
    fn list_identities(&self) -> StoreResult<Vec<Identity>>;
}
