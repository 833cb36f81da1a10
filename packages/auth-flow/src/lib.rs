//! # Auth Flow
//!
//! An email-first authentication flow controller where step drivers call the
//! network, outcomes become events, and a single transition table decides.
//!
//! ## Core Concepts
//!
//! The flow separates **outcomes** from **decisions**:
//! - [`AuthEvent`] = Outcomes (what a step reported)
//! - [`AuthFlowController`] = Decisions (the single authoritative transition table)
//!
//! The key principle: **one user action = one outcome event**. A step driver
//! performs its own API call and classifies the result into exactly one event;
//! it never touches controller state and knows nothing about sibling steps.
//!
//! ## Architecture
//!
//! ```text
//! Host UI (forms, sidebar)
//!     │
//!     ▼ submit()
//! Step driver ──► AuthApi (register / password login / OTP)
//!     │
//!     ▼ exactly one AuthEvent per action
//! AuthFlowController.resolve(attempt, event)
//!     │
//!     ├─► stale attempt? ──► dropped (step changed since dispatch)
//!     │
//!     └─► transition table ──► next FlowStep
//!                │
//!                └─► Authenticated ──► SessionStore.save()
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Exactly one step is active** - `FlowStep` is a tagged variant
//! 2. **Email is threaded** - every step between `EmailInput` and
//!    `Authenticated` carries the submitted email; a missing email is
//!    answered by a silent reset to `EmailInput`, never a panic
//! 3. **Transitions are total** - unlisted event/step pairs are no-ops;
//!    the controller never returns an error to the host
//! 4. **Success clears the error** - reaching `Authenticated` always leaves
//!    `error() == None`
//! 5. **Logout clears everything** - identity, pending email, error, and the
//!    durable session are all gone before the next user signs in
//!
//! ## Persistence
//!
//! Only the identity survives a reload: two string keys in a
//! [`KeyValueStorage`] (user id + `"true"`/`"false"` verification flag).
//! Flow position is never persisted; init recomputes `EmailInput` or
//! `Authenticated` from a single synchronous [`SessionStore::load`].
//!
//! ## Example
//!
//! ```ignore
//! use auth_flow::{AuthEvent, AuthFlowController, EmailStep, PasswordLoginStep};
//!
//! let mut controller = AuthFlowController::new(store);
//!
//! // Email-first entry point
//! if let Ok(event) = EmailStep::submit("user@example.com") {
//!     controller.handle(event);
//! }
//! controller.handle(AuthEvent::ChoosePassword);
//!
//! // Async step: capture an attempt, resolve the outcome later
//! let step = PasswordLoginStep::new(controller.pending_email().unwrap());
//! let attempt = controller.attempt();
//! if let Some(outcome) = step.submit(&api, "hunter2").await {
//!     controller.resolve(attempt, outcome);
//! }
//! ```

// Core modules
mod api;
mod controller;
mod event;
mod identity;
mod session;
mod state;
mod steps;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Whole-flow journey tests (test-only)
#[cfg(test)]
mod flow_tests;

// Re-export API collaborator types
pub use api::{ApiError, AuthApi};

// Re-export controller types
pub use controller::{Attempt, AuthFlowController};

// Re-export event types
pub use event::AuthEvent;

// Re-export identity and flow position
pub use identity::Identity;
pub use state::FlowStep;

// Re-export session persistence types
pub use session::{
    KeyValueStorage, KvSessionStore, SessionStore, StorageError, USER_ID_KEY, USER_VERIFIED_KEY,
};

// Re-export step drivers
pub use steps::{EmailStep, PasswordLoginStep, RegisterStep, RequestOtpStep, VerifyOtpStep};

// Re-export commonly used external types
pub use async_trait::async_trait;
