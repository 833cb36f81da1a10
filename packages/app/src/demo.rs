//! In-memory stand-in for the EntaGen backend.
//!
//! Implements [`AuthApi`] against a map of accounts, with the backend's
//! observable behavior: email is the account key, registering a taken email
//! conflicts, the first password sign-in sets the password, and passcode
//! verification accepts the fixed demo code.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use auth_flow::{ApiError, AuthApi, Identity};
use tracing::debug;

/// The one passcode the demo backend "delivers".
pub const DEMO_PASSCODE: &str = "123456";

#[derive(Debug, Default, Clone)]
struct Account {
    password: Option<String>,
    is_verified: bool,
}

/// Demo authentication backend.
///
/// All state lives behind a mutex so the same instance can back concurrent
/// step drivers, exactly like a real remote would.
#[derive(Default)]
pub struct DemoAuthApi {
    accounts: Mutex<HashMap<String, Account>>,
}

impl DemoAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account, as if it had registered in a past session.
    pub fn with_account(self, email: impl Into<String>, password: Option<&str>) -> Self {
        self.accounts.lock().unwrap().insert(
            email.into(),
            Account {
                password: password.map(str::to_string),
                is_verified: false,
            },
        );
        self
    }

    fn identity_for(email: &str, account: &Account) -> Identity {
        let identity = Identity::from_email(email);
        if account.is_verified {
            identity.verified()
        } else {
            identity
        }
    }
}

#[async_trait]
impl AuthApi for DemoAuthApi {
    async fn register(&self, email: &str) -> Result<Identity, ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(ApiError::new("An account with this email already exists"));
        }
        debug!(%email, "demo register");
        let account = Account::default();
        let identity = Self::identity_for(email, &account);
        accounts.insert(email.to_string(), account);
        Ok(identity)
    }

    async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| ApiError::new("No account found for this email"))?;
        match &account.password {
            // First password sign-in sets the password.
            None => account.password = Some(password.to_string()),
            Some(stored) if stored == password => {}
            Some(_) => return Err(ApiError::new("Incorrect password")),
        }
        debug!(%email, "demo password login");
        Ok(Self::identity_for(email, account))
    }

    async fn request_otp(&self, email: &str) -> Result<(), ApiError> {
        let accounts = self.accounts.lock().unwrap();
        if !accounts.contains_key(email) {
            return Err(ApiError::new("No account found for this email"));
        }
        debug!(%email, "demo passcode requested");
        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> Result<Identity, ApiError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| ApiError::new("No account found for this email"))?;
        if code != DEMO_PASSCODE {
            return Err(ApiError::new("Invalid or expired code"));
        }
        account.is_verified = true;
        debug!(%email, "demo passcode verified");
        Ok(Self::identity_for(email, account))
    }
}
