//! Testing utilities - in-memory fakes for the flow's two collaborators.
//!
//! Enabled in this crate's own tests and for downstream crates via the
//! `testing` feature.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiError, AuthApi};
use crate::identity::Identity;
use crate::session::{KeyValueStorage, StorageError};

// =============================================================================
// Memory Storage
// =============================================================================

/// HashMap-backed [`KeyValueStorage`], the in-memory fake for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw read without going through the trait (for assertions).
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Cloneable [`MemoryStorage`] sharing one map between handles.
///
/// Lets a test hand "the same disk" to two controllers in turn, simulating
/// a page reload.
#[derive(Debug, Clone, Default)]
pub struct SharedMemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl SharedMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl KeyValueStorage for SharedMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// =============================================================================
// Mock Auth API
// =============================================================================

/// Scripted [`AuthApi`] that records every call.
///
/// Each operation has a response queue filled via the `with_*` builders;
/// when a queue is empty the operation falls back to a canned success
/// (identity derived from the email, verified only for passcode logins).
pub struct MockAuthApi {
    register_responses: Mutex<Vec<Result<Identity, ApiError>>>,
    login_responses: Mutex<Vec<Result<Identity, ApiError>>>,
    request_otp_responses: Mutex<Vec<Result<(), ApiError>>>,
    verify_responses: Mutex<Vec<Result<Identity, ApiError>>>,

    register_calls: Mutex<Vec<String>>,
    login_calls: Mutex<Vec<(String, String)>>,
    request_otp_calls: Mutex<Vec<String>>,
    verify_calls: Mutex<Vec<(String, String)>>,
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self {
            register_responses: Mutex::new(Vec::new()),
            login_responses: Mutex::new(Vec::new()),
            request_otp_responses: Mutex::new(Vec::new()),
            verify_responses: Mutex::new(Vec::new()),
            register_calls: Mutex::new(Vec::new()),
            login_calls: Mutex::new(Vec::new()),
            request_otp_calls: Mutex::new(Vec::new()),
            verify_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_register_ok(self, identity: Identity) -> Self {
        self.register_responses.lock().unwrap().push(Ok(identity));
        self
    }

    pub fn with_register_err(self, detail: &str) -> Self {
        self.register_responses
            .lock()
            .unwrap()
            .push(Err(ApiError::new(detail)));
        self
    }

    pub fn with_login_ok(self, identity: Identity) -> Self {
        self.login_responses.lock().unwrap().push(Ok(identity));
        self
    }

    pub fn with_login_err(self, detail: &str) -> Self {
        self.login_responses
            .lock()
            .unwrap()
            .push(Err(ApiError::new(detail)));
        self
    }

    pub fn with_request_otp_err(self, detail: &str) -> Self {
        self.request_otp_responses
            .lock()
            .unwrap()
            .push(Err(ApiError::new(detail)));
        self
    }

    pub fn with_verify_ok(self, identity: Identity) -> Self {
        self.verify_responses.lock().unwrap().push(Ok(identity));
        self
    }

    pub fn with_verify_err(self, detail: &str) -> Self {
        self.verify_responses
            .lock()
            .unwrap()
            .push(Err(ApiError::new(detail)));
        self
    }

    /// Emails passed to `register`.
    pub fn register_calls(&self) -> Vec<String> {
        self.register_calls.lock().unwrap().clone()
    }

    /// `(email, password)` pairs passed to `login_with_password`.
    pub fn login_calls(&self) -> Vec<(String, String)> {
        self.login_calls.lock().unwrap().clone()
    }

    /// Emails passed to `request_otp`.
    pub fn request_otp_calls(&self) -> Vec<String> {
        self.request_otp_calls.lock().unwrap().clone()
    }

    /// `(email, code)` pairs passed to `verify_otp`.
    pub fn verify_calls(&self) -> Vec<(String, String)> {
        self.verify_calls.lock().unwrap().clone()
    }

    fn next<T>(queue: &Mutex<Vec<Result<T, ApiError>>>) -> Option<Result<T, ApiError>> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }
}

impl Default for MockAuthApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn register(&self, email: &str) -> Result<Identity, ApiError> {
        self.register_calls.lock().unwrap().push(email.to_string());
        Self::next(&self.register_responses).unwrap_or_else(|| Ok(Identity::from_email(email)))
    }

    async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ApiError> {
        self.login_calls
            .lock()
            .unwrap()
            .push((email.to_string(), password.to_string()));
        Self::next(&self.login_responses).unwrap_or_else(|| Ok(Identity::from_email(email)))
    }

    async fn request_otp(&self, email: &str) -> Result<(), ApiError> {
        self.request_otp_calls
            .lock()
            .unwrap()
            .push(email.to_string());
        Self::next(&self.request_otp_responses).unwrap_or(Ok(()))
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<Identity, ApiError> {
        self.verify_calls
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Self::next(&self.verify_responses)
            .unwrap_or_else(|| Ok(Identity::from_email(email).verified()))
    }
}
