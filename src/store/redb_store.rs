// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Household Ledger Contributors

//! Embedded identity store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `identities`: id → serialized Identity (JSON bytes)
//! - `username_idx`: username → id
//! - `email_idx`: email → id
//! - `credentials`: id → framed credential blob
//!
//! Credential blobs are an opaque binary framing (version byte followed by
//! four length-prefixed fields), never human-readable text. Identity and
//! credential rows for a registration are written in a single transaction,
//! so readers never observe a half-created pair.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{IdentityStore, StoreError, StoreResult};
use crate::models::{AuthMaterial, Identity};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: identity id → serialized Identity (JSON bytes).
const IDENTITIES: TableDefinition<&str, &[u8]> = TableDefinition::new("identities");

/// Index: username → identity id. Points at the newest claimant; a disabled
/// identity loses its entry when the name is re-registered.
const USERNAME_IDX: TableDefinition<&str, &str> = TableDefinition::new("username_idx");

/// Index: email → identity id.
const EMAIL_IDX: TableDefinition<&str, &str> = TableDefinition::new("email_idx");

/// Credential blobs: identity id → framed AuthMaterial bytes.
const CREDENTIALS: TableDefinition<&str, &[u8]> = TableDefinition::new("credentials");

// =============================================================================
// Credential Blob Framing
// =============================================================================

const FRAME_VERSION: u8 = 1;

/// Frame the four credential fields as `version | (len_be32 | bytes) * 4`.
fn encode_material(material: &AuthMaterial) -> Vec<u8> {
    let fields = [
        material.private_key(),
        material.encapsulated_secret(),
        material.salt(),
        material.encrypted_password(),
    ];
    let total: usize = fields.iter().map(|f| 4 + f.len()).sum();
    let mut blob = Vec::with_capacity(1 + total);
    blob.push(FRAME_VERSION);
    for field in fields {
        blob.extend_from_slice(&(field.len() as u32).to_be_bytes());
        blob.extend_from_slice(field);
    }
    blob
}

fn decode_material(blob: &[u8]) -> StoreResult<AuthMaterial> {
    let corrupt = |msg: &str| StoreError::Corrupt(msg.to_string());

    let (&version, mut rest) = blob
        .split_first()
        .ok_or_else(|| corrupt("empty credential blob"))?;
    if version != FRAME_VERSION {
        return Err(corrupt("unknown credential frame version"));
    }

    let mut fields: [Vec<u8>; 4] = Default::default();
    for field in fields.iter_mut() {
        if rest.len() < 4 {
            return Err(corrupt("truncated credential frame"));
        }
        let (len_bytes, tail) = rest.split_at(4);
        let len =
            u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
        if tail.len() < len {
            return Err(corrupt("truncated credential field"));
        }
        let (value, tail) = tail.split_at(len);
        *field = value.to_vec();
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(corrupt("trailing bytes in credential frame"));
    }

    let [private_key, encapsulated_secret, salt, encrypted_password] = fields;
    AuthMaterial::new(private_key, encapsulated_secret, salt, encrypted_password)
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}

// =============================================================================
// RedbStore
// =============================================================================

/// Embedded ACID identity store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(IDENTITIES)?;
            let _ = write_txn.open_table(USERNAME_IDX)?;
            let _ = write_txn.open_table(EMAIL_IDX)?;
            let _ = write_txn.open_table(CREDENTIALS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl IdentityStore for RedbStore {
    fn create_identity(&self, identity: &Identity, material: &AuthMaterial) -> StoreResult<()> {
        let identity_json = serde_json::to_vec(identity)?;
        let credential_blob = encode_material(material);

        let write_txn = self.db.begin_write()?;
        {
            let mut identities = write_txn.open_table(IDENTITIES)?;
            let mut username_idx = write_txn.open_table(USERNAME_IDX)?;
            let mut email_idx = write_txn.open_table(EMAIL_IDX)?;
            let mut credentials = write_txn.open_table(CREDENTIALS)?;

            // Uniqueness is enforced against non-disabled identities only;
            // a disabled identity's name and email may be claimed again.
            if let Some(existing_id) = username_idx.get(identity.username.as_str())? {
                let existing_id = existing_id.value().to_string();
                if let Some(existing) = identities.get(existing_id.as_str())? {
                    let existing: Identity = serde_json::from_slice(existing.value())?;
                    if !existing.disabled {
                        return Err(StoreError::Duplicate { field: "username" });
                    }
                }
            }
            if let Some(existing_id) = email_idx.get(identity.email.as_str())? {
                let existing_id = existing_id.value().to_string();
                if let Some(existing) = identities.get(existing_id.as_str())? {
                    let existing: Identity = serde_json::from_slice(existing.value())?;
                    if !existing.disabled {
                        return Err(StoreError::Duplicate { field: "email" });
                    }
                }
            }

            identities.insert(identity.id.as_str(), identity_json.as_slice())?;
            username_idx.insert(identity.username.as_str(), identity.id.as_str())?;
            email_idx.insert(identity.email.as_str(), identity.id.as_str())?;
            credentials.insert(identity.id.as_str(), credential_blob.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn find_by_username(&self, username: &str) -> StoreResult<Option<Identity>> {
        let read_txn = self.db.begin_read()?;
        let username_idx = read_txn.open_table(USERNAME_IDX)?;
        let Some(id) = username_idx.get(username)? else {
            return Ok(None);
        };
        let id = id.value().to_string();
        let identities = read_txn.open_table(IDENTITIES)?;
        match identities.get(id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Identity>> {
        let read_txn = self.db.begin_read()?;
        let identities = read_txn.open_table(IDENTITIES)?;
        match identities.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn load_material(&self, id: &str) -> StoreResult<Option<AuthMaterial>> {
        let read_txn = self.db.begin_read()?;
        let credentials = read_txn.open_table(CREDENTIALS)?;
        match credentials.get(id)? {
            Some(value) => Ok(Some(decode_material(value.value())?)),
            None => Ok(None),
        }
    }

    fn disable(&self, id: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut identities = write_txn.open_table(IDENTITIES)?;
            let mut identity: Identity = match identities.get(id)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => return Err(StoreError::NotFound(format!("identity {id}"))),
            };
            identity.disabled = true;
            let json = serde_json::to_vec(&identity)?;
            identities.insert(id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn list_identities(&self) -> StoreResult<Vec<Identity>> {
        let read_txn = self.db.begin_read()?;
        let identities = read_txn.open_table(IDENTITIES)?;
        let mut result = Vec::new();
        for entry in identities.iter()? {
            let (_, value) = entry?;
            let identity: Identity = serde_json::from_slice(value.value())?;
            if !identity.disabled {
                result.push(identity);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = RedbStore::open(&dir.path().join("auth.redb")).expect("open store");
        (dir, store)
    }

    fn identity(id: &str, username: &str, email: &str) -> Identity {
        Identity {
            id: id.to_string(),
            username: username.to_string(),
            first_name: "Alice".to_string(),
            last_name: "Archer".to_string(),
            email: email.to_string(),
            disabled: false,
        }
    }

    fn material(tag: u8) -> AuthMaterial {
        AuthMaterial::new(vec![tag; 32], vec![tag + 1; 48], vec![tag + 2; 16], vec![tag + 3; 24])
            .unwrap()
    }

    #[test]
    fn create_and_find_round_trip() {
        let (_dir, store) = test_store();
        let alice = identity("id-1", "alice", "alice@example.com");
        store.create_identity(&alice, &material(1)).unwrap();

        let by_name = store.find_by_username("alice").unwrap().unwrap();
        assert_eq!(by_name, alice);
        let by_id = store.find_by_id("id-1").unwrap().unwrap();
        assert_eq!(by_id, alice);
        assert!(store.find_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn material_round_trips_through_framing() {
        let (_dir, store) = test_store();
        let alice = identity("id-1", "alice", "alice@example.com");
        let original = material(7);
        store.create_identity(&alice, &original).unwrap();

        let loaded = store.load_material("id-1").unwrap().unwrap();
        assert_eq!(loaded.private_key(), original.private_key());
        assert_eq!(loaded.encapsulated_secret(), original.encapsulated_secret());
        assert_eq!(loaded.salt(), original.salt());
        assert_eq!(loaded.encrypted_password(), original.encrypted_password());

        assert!(store.load_material("missing").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_and_email_are_rejected() {
        let (_dir, store) = test_store();
        store
            .create_identity(&identity("id-1", "alice", "alice@example.com"), &material(1))
            .unwrap();

        let err = store
            .create_identity(&identity("id-2", "alice", "other@example.com"), &material(2))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "username" }));

        let err = store
            .create_identity(&identity("id-3", "carol", "alice@example.com"), &material(3))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "email" }));
    }

    #[test]
    fn rejected_duplicate_leaves_original_untouched() {
        let (_dir, store) = test_store();
        let original = material(1);
        store
            .create_identity(&identity("id-1", "alice", "alice@example.com"), &original)
            .unwrap();
        store
            .create_identity(&identity("id-2", "alice", "other@example.com"), &material(9))
            .unwrap_err();

        // The failed registration must not have written anything.
        let loaded = store.load_material("id-1").unwrap().unwrap();
        assert_eq!(loaded.encrypted_password(), original.encrypted_password());
        assert!(store.find_by_id("id-2").unwrap().is_none());
        assert!(store.load_material("id-2").unwrap().is_none());
    }

    #[test]
    fn disable_is_soft_and_keeps_material() {
        let (_dir, store) = test_store();
        store
            .create_identity(&identity("id-1", "alice", "alice@example.com"), &material(1))
            .unwrap();

        store.disable("id-1").unwrap();
        let disabled = store.find_by_username("alice").unwrap().unwrap();
        assert!(disabled.disabled);
        // Disabling never destroys credential material.
        assert!(store.load_material("id-1").unwrap().is_some());

        assert!(matches!(
            store.disable("missing"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn disabled_username_can_be_reclaimed() {
        let (_dir, store) = test_store();
        store
            .create_identity(&identity("id-1", "alice", "alice@example.com"), &material(1))
            .unwrap();
        store.disable("id-1").unwrap();

        store
            .create_identity(&identity("id-2", "alice", "alice@example.com"), &material(2))
            .unwrap();
        let current = store.find_by_username("alice").unwrap().unwrap();
        assert_eq!(current.id, "id-2");
        // The disabled record stays retrievable by id.
        assert!(store.find_by_id("id-1").unwrap().unwrap().disabled);
    }

    #[test]
    fn list_identities_excludes_disabled() {
        let (_dir, store) = test_store();
        store
            .create_identity(&identity("id-1", "alice", "alice@example.com"), &material(1))
            .unwrap();
        store
            .create_identity(&identity("id-2", "bob", "bob@example.com"), &material(2))
            .unwrap();
        store.disable("id-1").unwrap();

        let listed = store.list_identities().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].username, "bob");
    }

    #[test]
    fn framing_rejects_corruption() {
        let original = material(5);
        let blob = encode_material(&original);

        assert!(decode_material(&[]).is_err());
        assert!(decode_material(&blob[..blob.len() - 1]).is_err());

        let mut wrong_version = blob.clone();
        wrong_version[0] = 99;
        assert!(decode_material(&wrong_version).is_err());

        let mut trailing = blob.clone();
        trailing.push(0);
        assert!(decode_material(&trailing).is_err());

        let decoded = decode_material(&blob).unwrap();
        assert_eq!(decoded.salt(), original.salt());
    }
}
