//! Flow position - the tagged variant that says which form is on screen.

/// One step of the authentication flow.
///
/// Exactly one step is active at a time. `Authenticated` is terminal for the
/// session; every other step is a transient position in the pre-auth flow.
///
/// Flow position is never persisted. On process start it is recomputed to
/// either `EmailInput` (no stored identity) or `Authenticated` (identity
/// found), never restored mid-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Email-first entry point; the only pre-auth step with no context.
    EmailInput,
    /// Pick how to sign in with the captured email.
    ChooseMethod,
    /// Create an account for the captured email.
    RegisterWithPassword,
    /// Sign in with a password.
    LoginWithPassword,
    /// Ask the backend to send a one-time passcode.
    RequestOtp,
    /// Enter the passcode that was sent.
    VerifyOtp,
    /// Terminal: the session has an identity.
    Authenticated,
}

impl FlowStep {
    /// Whether this step can only render with a pending email present.
    ///
    /// Every step except the entry point and the terminal state carries the
    /// email captured at `EmailInput`. A step that requires the email but
    /// has none is an invariant violation the controller self-heals from.
    pub fn requires_pending_email(&self) -> bool {
        !matches!(self, FlowStep::EmailInput | FlowStep::Authenticated)
    }
}
