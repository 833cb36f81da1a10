//! Auth events - outcomes reported by step drivers and the host.
//!
//! Events are the only way anything moves the flow. Step drivers classify
//! their API result into exactly one event; the host emits the navigation
//! events (`Back`, `Logout`). Failure events carry the backend's
//! human-readable message verbatim - it becomes the app error the user sees.

use crate::identity::Identity;

/// An outcome the controller can react to.
///
/// Every `*Failed` event keeps the flow on its current step and surfaces the
/// message, so the user retries without losing the entered email. Event/step
/// pairs outside the transition table are no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    /// A valid email was submitted at the entry point.
    EmailSubmitted(String),

    /// The user picked password sign-in.
    ChoosePassword,

    /// The user picked account registration.
    ChooseRegister,

    /// The user picked passcode sign-in.
    ChooseOtp,

    /// Navigate one step back; abandons any in-flight request for this step.
    Back,

    /// Password login or registration produced an identity.
    ///
    /// Registration deliberately reuses this event rather than a separate
    /// terminal path: a fresh account and a password login end the flow the
    /// same way.
    LoginSucceeded(Identity),

    /// Password login or registration failed.
    LoginFailed(String),

    /// The backend accepted the passcode request.
    RequestSucceeded,

    /// The backend refused to send a passcode.
    RequestFailed(String),

    /// The passcode checked out and produced an identity.
    VerificationSucceeded(Identity),

    /// The passcode was wrong or expired.
    VerificationFailed(String),

    /// The host (e.g. the sidebar) asked to end the session.
    Logout,
}
