//! Step drivers - one per pre-authentication step.
//!
//! A driver owns the minimal context its form needs (the threaded email for
//! everything past the entry point), performs its own [`AuthApi`] call, and
//! classifies the result into exactly one [`AuthEvent`]. Drivers never touch
//! controller state and know nothing about sibling steps; the host feeds the
//! returned event into the controller together with the [`crate::Attempt`]
//! captured at dispatch time.
//!
//! # At most one outcome per action
//!
//! Each network driver carries an in-flight latch: while a submit is
//! pending, further submits return `None` instead of racing a second call.
//! Every admitted call settles in exactly one event - no API failure
//! escapes a driver.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::api::AuthApi;
use crate::event::AuthEvent;

/// RAII latch: at most one in-flight submit per driver.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::Acquire) {
            debug!("submit ignored: a previous attempt is still in flight");
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The email entry form. Local validation only; no network.
pub struct EmailStep;

impl EmailStep {
    /// Validate the typed address and produce the entry event.
    ///
    /// The message in `Err` is for the form to display inline; it never
    /// reaches the controller.
    pub fn submit(input: &str) -> Result<AuthEvent, String> {
        let email = input.trim();
        if email.is_empty() {
            return Err("Please enter your email address".to_string());
        }
        if !email.contains('@') {
            return Err("That doesn't look like an email address".to_string());
        }
        Ok(AuthEvent::EmailSubmitted(email.to_string()))
    }
}

/// Password sign-in form for the threaded email.
pub struct PasswordLoginStep {
    email: String,
    in_flight: AtomicBool,
}

impl PasswordLoginStep {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The email this form is signing in.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Attempt the login. `None` means a previous submit is still pending.
    pub async fn submit(&self, api: &dyn AuthApi, password: &str) -> Option<AuthEvent> {
        let _guard = SubmitGuard::acquire(&self.in_flight)?;
        let event = match api.login_with_password(&self.email, password).await {
            Ok(identity) => AuthEvent::LoginSucceeded(identity),
            Err(err) => AuthEvent::LoginFailed(err.detail),
        };
        Some(event)
    }
}

/// Registration form for the threaded email.
///
/// The backend keys accounts by email and takes nothing else at signup, so
/// registration success is reported as `LoginSucceeded` - a fresh account
/// ends the flow exactly like a password login.
pub struct RegisterStep {
    email: String,
    in_flight: AtomicBool,
}

impl RegisterStep {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub async fn submit(&self, api: &dyn AuthApi) -> Option<AuthEvent> {
        let _guard = SubmitGuard::acquire(&self.in_flight)?;
        let event = match api.register(&self.email).await {
            Ok(identity) => AuthEvent::LoginSucceeded(identity),
            Err(err) => AuthEvent::LoginFailed(err.detail),
        };
        Some(event)
    }
}

/// Passcode request form for the threaded email.
pub struct RequestOtpStep {
    email: String,
    in_flight: AtomicBool,
}

impl RequestOtpStep {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub async fn submit(&self, api: &dyn AuthApi) -> Option<AuthEvent> {
        let _guard = SubmitGuard::acquire(&self.in_flight)?;
        let event = match api.request_otp(&self.email).await {
            Ok(()) => AuthEvent::RequestSucceeded,
            Err(err) => AuthEvent::RequestFailed(err.detail),
        };
        Some(event)
    }
}

/// Passcode entry form for the threaded email.
pub struct VerifyOtpStep {
    email: String,
    in_flight: AtomicBool,
}

impl VerifyOtpStep {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub async fn submit(&self, api: &dyn AuthApi, code: &str) -> Option<AuthEvent> {
        let _guard = SubmitGuard::acquire(&self.in_flight)?;
        let event = match api.verify_otp(&self.email, code).await {
            Ok(identity) => AuthEvent::VerificationSucceeded(identity),
            Err(err) => AuthEvent::VerificationFailed(err.detail),
        };
        Some(event)
    }
}
