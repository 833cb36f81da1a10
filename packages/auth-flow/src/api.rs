//! The authentication API collaborator.
//!
//! Transport is out of scope here: an implementation may go over HTTP, a
//! server function, or an in-memory fake. The flow only cares about the
//! shape of the four operations and that every failure carries a
//! human-readable `detail` it can forward verbatim as the app error.

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::Identity;

/// A failed authentication API call.
///
/// `detail` is shown to the user as-is; implementations are responsible for
/// keeping it human-readable (and free of internals).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{detail}")]
pub struct ApiError {
    /// Human-readable failure message.
    pub detail: String,
}

impl ApiError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Network operations the flow invokes.
///
/// Each call settles in exactly one identity (or unit) or one [`ApiError`];
/// step drivers turn that into exactly one [`crate::AuthEvent`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Register a new account for `email`, returning its identity.
    ///
    /// The backend treats the email as the account key; registering an
    /// existing email may return the existing identity or fail with a
    /// conflict message, depending on the implementation.
    async fn register(&self, email: &str) -> Result<Identity, ApiError>;

    /// Sign in with a password.
    async fn login_with_password(&self, email: &str, password: &str)
        -> Result<Identity, ApiError>;

    /// Ask the backend to deliver a one-time passcode to `email`.
    async fn request_otp(&self, email: &str) -> Result<(), ApiError>;

    /// Exchange a delivered passcode for an identity.
    async fn verify_otp(&self, email: &str, code: &str) -> Result<Identity, ApiError>;
}
