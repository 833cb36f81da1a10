//! The authentication flow controller.
//!
//! One state machine, one authoritative transition table. The controller
//! holds the current [`FlowStep`], the email threaded between steps, the
//! latest app error, and the identity once authenticated. It reacts to
//! [`AuthEvent`]s and nothing else.
//!
//! # The Contract
//!
//! 1. **Init reads storage once.** Synchronously, before anything renders.
//!    Stored identity means `Authenticated`; otherwise `EmailInput`.
//!
//! 2. **Transitions are total.** Every event/step pair outside the table is
//!    a no-op. `handle` never errors and never panics.
//!
//! 3. **One event at a time.** `handle` takes `&mut self` and runs to
//!    completion; there is no interleaving to reason about.
//!
//! 4. **Missing context self-heals.** A guarded step with no pending email
//!    silently resets to `EmailInput` - a recovery, not a user-visible
//!    failure.
//!
//! # Stale outcomes
//!
//! API calls settle outside the controller. Capture an [`Attempt`] before
//! dispatching one and feed the outcome through [`AuthFlowController::resolve`]:
//! if the step changed in the meantime (the user navigated `Back`), the
//! outcome is dropped instead of corrupting the newer state.

use tracing::{debug, info, warn};

use crate::event::AuthEvent;
use crate::identity::Identity;
use crate::session::SessionStore;
use crate::state::FlowStep;

/// Token tying an async outcome to the flow position it was dispatched from.
///
/// Cheap to copy; capture one per user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    generation: u64,
}

/// The email-first authentication flow state machine.
///
/// Generic over the [`SessionStore`] so tests run against an in-memory fake
/// and the host can plug in any durable backend.
pub struct AuthFlowController<S: SessionStore> {
    store: S,
    step: FlowStep,
    pending_email: Option<String>,
    error: Option<String>,
    identity: Option<Identity>,
    /// Advances whenever the step changes; stale [`Attempt`]s are rejected.
    generation: u64,
}

impl<S: SessionStore> AuthFlowController<S> {
    /// Build the controller, consulting the session store exactly once.
    pub fn new(store: S) -> Self {
        let identity = store.load();
        let step = match &identity {
            Some(identity) => {
                info!(user_id = %identity.id, "restored persisted session");
                FlowStep::Authenticated
            }
            None => FlowStep::EmailInput,
        };
        Self {
            store,
            step,
            pending_email: None,
            error: None,
            identity,
            generation: 0,
        }
    }

    /// The step to render, after the missing-email guard check.
    ///
    /// This is the render-time entry point: if the current step requires the
    /// threaded email and it is gone, the flow deterministically resets to
    /// `EmailInput` before anything is shown.
    pub fn current_step(&mut self) -> FlowStep {
        self.recover_if_unguarded();
        self.step
    }

    /// Most recent user-facing error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The email captured at `EmailInput`, threaded through the flow.
    pub fn pending_email(&self) -> Option<&str> {
        self.pending_email.as_deref()
    }

    /// The authenticated identity, once `Authenticated`.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Read-only host surface: the signed-in user's id.
    pub fn current_user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }

    /// Read-only host surface: the signed-in user's verification flag.
    pub fn is_user_verified(&self) -> bool {
        self.identity
            .as_ref()
            .map(|identity| identity.is_verified)
            .unwrap_or(false)
    }

    /// Whether the flow reached its terminal step.
    pub fn is_authenticated(&self) -> bool {
        self.step == FlowStep::Authenticated
    }

    /// Capture the current flow position for a soon-to-be-dispatched action.
    pub fn attempt(&self) -> Attempt {
        Attempt {
            generation: self.generation,
        }
    }

    /// Apply an outcome, unless the flow moved on since `attempt` was taken.
    ///
    /// Returns `true` if the event was handled, `false` if it was dropped as
    /// stale. `Back` is the only cancellation primitive: it advances the
    /// generation, so whatever the abandoned request eventually reports
    /// lands here and goes nowhere.
    pub fn resolve(&mut self, attempt: Attempt, event: AuthEvent) -> bool {
        if attempt.generation != self.generation {
            debug!(?event, step = ?self.step, "dropping stale outcome for an abandoned step");
            return false;
        }
        self.handle(event);
        true
    }

    /// Process one event to completion.
    ///
    /// The single transition table of the flow. Events with no row for the
    /// current step are ignored.
    pub fn handle(&mut self, event: AuthEvent) {
        self.recover_if_unguarded();

        match (self.step, event) {
            (FlowStep::EmailInput, AuthEvent::EmailSubmitted(email)) => {
                debug!(%email, "email captured, choosing method");
                self.pending_email = Some(email);
                self.error = None;
                self.goto(FlowStep::ChooseMethod);
            }

            (FlowStep::ChooseMethod, AuthEvent::ChoosePassword) => {
                self.goto(FlowStep::LoginWithPassword);
            }
            (FlowStep::ChooseMethod, AuthEvent::ChooseRegister) => {
                self.goto(FlowStep::RegisterWithPassword);
            }
            (FlowStep::ChooseMethod, AuthEvent::ChooseOtp) => {
                self.goto(FlowStep::RequestOtp);
            }
            (FlowStep::ChooseMethod, AuthEvent::Back) => {
                self.goto(FlowStep::EmailInput);
            }
            // Direct registration: a success reported from the method chooser
            // ends the flow exactly like a password login does.
            (FlowStep::ChooseMethod, AuthEvent::LoginSucceeded(identity)) => {
                self.complete(identity);
            }

            (
                FlowStep::LoginWithPassword | FlowStep::RegisterWithPassword,
                AuthEvent::LoginSucceeded(identity),
            ) => {
                self.complete(identity);
            }
            (
                FlowStep::LoginWithPassword | FlowStep::RegisterWithPassword,
                AuthEvent::LoginFailed(message),
            ) => {
                self.fail(message);
            }
            (
                FlowStep::LoginWithPassword | FlowStep::RegisterWithPassword,
                AuthEvent::Back,
            ) => {
                self.goto(FlowStep::ChooseMethod);
            }

            (FlowStep::RequestOtp, AuthEvent::RequestSucceeded) => {
                self.error = None;
                self.goto(FlowStep::VerifyOtp);
            }
            (FlowStep::RequestOtp, AuthEvent::RequestFailed(message)) => {
                self.fail(message);
            }
            (FlowStep::RequestOtp, AuthEvent::Back) => {
                self.goto(FlowStep::ChooseMethod);
            }

            (FlowStep::VerifyOtp, AuthEvent::VerificationSucceeded(identity)) => {
                self.complete(identity);
            }
            (FlowStep::VerifyOtp, AuthEvent::VerificationFailed(message)) => {
                self.fail(message);
            }
            (FlowStep::VerifyOtp, AuthEvent::Back) => {
                self.goto(FlowStep::RequestOtp);
            }

            (FlowStep::Authenticated, AuthEvent::Logout) => {
                self.reset_session();
            }

            (step, event) => {
                debug!(?step, ?event, "no transition for event in this step; ignoring");
            }
        }
    }

    /// Host surface: end the session from anywhere the host exposes it.
    pub fn logout(&mut self) {
        self.handle(AuthEvent::Logout);
    }

    /// Host surface: report an application-level error into the same channel
    /// auth failures use. Independent of the flow position.
    pub fn set_app_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Host surface: clear the error channel (e.g. after a later success).
    pub fn clear_app_error(&mut self) {
        self.error = None;
    }

    fn recover_if_unguarded(&mut self) {
        if self.step.requires_pending_email() && self.pending_email.is_none() {
            warn!(step = ?self.step, "pending email missing where required; resetting flow");
            self.goto(FlowStep::EmailInput);
        }
    }

    fn goto(&mut self, step: FlowStep) {
        if self.step != step {
            self.step = step;
            self.generation = self.generation.wrapping_add(1);
        }
    }

    fn fail(&mut self, message: String) {
        // Stay on the current step; the user retries with context intact.
        self.error = Some(message);
    }

    fn complete(&mut self, identity: Identity) {
        if let Err(err) = self.store.save(&identity) {
            // The session just won't survive a reload; authentication itself
            // already happened.
            warn!(error = %err, user_id = %identity.id, "failed to persist session");
        }
        info!(user_id = %identity.id, "authenticated");
        self.error = None;
        self.identity = Some(identity);
        self.goto(FlowStep::Authenticated);
    }

    fn reset_session(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear persisted session");
        }
        info!("logged out");
        self.identity = None;
        self.pending_email = None;
        self.error = None;
        self.goto(FlowStep::EmailInput);
    }
}
