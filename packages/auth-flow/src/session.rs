//! Durable session identity persistence.
//!
//! Only two string keys survive a reload: the user identifier and the
//! verification flag. The flag is stored as the string `"true"`/`"false"`,
//! never a serialized boolean, so values written by older builds still read
//! back. Flow position is deliberately not persisted.
//!
//! # Fail-safe loading
//!
//! `load` never errors and never trusts partial state: a missing identifier
//! key yields no session regardless of what the flag key says, and a missing
//! or unparseable flag downgrades to unverified.

use thiserror::Error;
use tracing::warn;

use crate::identity::Identity;

/// Storage key for the persisted user identifier.
pub const USER_ID_KEY: &str = "entagen.user.id";

/// Storage key for the persisted verification flag (`"true"`/`"false"`).
pub const USER_VERIFIED_KEY: &str = "entagen.user.verified";

/// Errors from the durable key/value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage backend failed (IO, quota, serialization).
    #[error("storage backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Durable string key/value storage.
///
/// The reload-surviving analogue of browser local storage. Implementations
/// must persist values across process restarts; beyond that, anything goes -
/// a JSON file, a database row, an in-memory map in tests.
pub trait KeyValueStorage {
    /// Read a value, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, overwriting any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Persistence of the authenticated identity across sessions.
///
/// The controller reads this exactly once at init and writes it on every
/// transition into `Authenticated`. Keeping it a trait keeps the controller
/// unit-testable with an in-memory fake.
pub trait SessionStore {
    /// Load the persisted identity, if any. Must fail safe: on any backend
    /// trouble this returns `None` and the flow starts from `EmailInput`.
    fn load(&self) -> Option<Identity>;

    /// Persist the identity.
    fn save(&mut self, identity: &Identity) -> Result<(), StorageError>;

    /// Forget the persisted identity (logout).
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// [`SessionStore`] over any [`KeyValueStorage`] backend.
///
/// Writes exactly the two documented keys. The email is reconstructed from
/// the identifier on load (the backend keys accounts by email).
pub struct KvSessionStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> KvSessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access the underlying storage (useful in tests).
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> SessionStore for KvSessionStore<S> {
    fn load(&self) -> Option<Identity> {
        let id = match self.storage.get(USER_ID_KEY) {
            Ok(value) => value?,
            Err(err) => {
                warn!(error = %err, "session storage unreadable; starting unauthenticated");
                return None;
            }
        };

        // The flag is only meaningful alongside an identifier; anything but
        // the literal "true" reads as unverified.
        let is_verified = matches!(
            self.storage.get(USER_VERIFIED_KEY),
            Ok(Some(flag)) if flag == "true"
        );

        Some(Identity {
            email: id.clone(),
            id,
            is_verified,
        })
    }

    fn save(&mut self, identity: &Identity) -> Result<(), StorageError> {
        self.storage.set(USER_ID_KEY, &identity.id)?;
        let flag = if identity.is_verified { "true" } else { "false" };
        self.storage.set(USER_VERIFIED_KEY, flag)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(USER_ID_KEY)?;
        self.storage.remove(USER_VERIFIED_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStorage;

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = KvSessionStore::new(MemoryStorage::new());
        store
            .save(&Identity::from_email("a@b.com").verified())
            .unwrap();

        let identity = store.load().unwrap();
        assert_eq!(identity.id, "a@b.com");
        assert_eq!(identity.email, "a@b.com");
        assert!(identity.is_verified);
    }

    #[test]
    fn test_verified_flag_is_stored_as_string() {
        let mut store = KvSessionStore::new(MemoryStorage::new());
        store
            .save(&Identity::from_email("a@b.com").verified())
            .unwrap();
        assert_eq!(
            store.storage().raw(USER_VERIFIED_KEY),
            Some("true".to_string())
        );

        store.save(&Identity::from_email("a@b.com")).unwrap();
        assert_eq!(
            store.storage().raw(USER_VERIFIED_KEY),
            Some("false".to_string())
        );
    }

    #[test]
    fn test_load_without_identifier_is_no_session() {
        let mut storage = MemoryStorage::new();
        // Orphaned flag with no identifier - must not conjure a session.
        storage.set(USER_VERIFIED_KEY, "true").unwrap();

        let store = KvSessionStore::new(storage);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_with_garbage_flag_downgrades_to_unverified() {
        let mut storage = MemoryStorage::new();
        storage.set(USER_ID_KEY, "a@b.com").unwrap();
        storage.set(USER_VERIFIED_KEY, "yes").unwrap();

        let store = KvSessionStore::new(storage);
        let identity = store.load().unwrap();
        assert!(!identity.is_verified);
    }

    #[test]
    fn test_load_with_missing_flag_downgrades_to_unverified() {
        let mut storage = MemoryStorage::new();
        storage.set(USER_ID_KEY, "a@b.com").unwrap();

        let store = KvSessionStore::new(storage);
        assert!(!store.load().unwrap().is_verified);
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let mut store = KvSessionStore::new(MemoryStorage::new());
        store.save(&Identity::from_email("a@b.com")).unwrap();
        store.clear().unwrap();

        assert!(store.load().is_none());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_clear_on_empty_storage_is_fine() {
        let mut store = KvSessionStore::new(MemoryStorage::new());
        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}
