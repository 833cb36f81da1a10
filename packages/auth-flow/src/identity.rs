//! Authenticated user identity.

/// The authenticated user's durable identity.
///
/// `id` is the only field the host may rely on being stable across sessions.
/// The EntaGen backend registers users keyed by their email address, so `id`
/// and `email` usually carry the same value; the session store persists only
/// the id and reconstructs the email from it on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Unique user identifier, stable across sessions.
    pub id: String,
    /// Email address the user signed in with.
    pub email: String,
    /// Whether the user has completed verification (e.g. a passcode login).
    pub is_verified: bool,
}

impl Identity {
    /// Create an identity whose id is the email itself (backend convention).
    pub fn from_email(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            id: email.clone(),
            email,
            is_verified: false,
        }
    }

    /// Mark the identity as verified.
    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_email_uses_email_as_id() {
        let identity = Identity::from_email("a@b.com");
        assert_eq!(identity.id, "a@b.com");
        assert_eq!(identity.email, "a@b.com");
        assert!(!identity.is_verified);
    }

    #[test]
    fn test_verified_sets_flag() {
        let identity = Identity::from_email("a@b.com").verified();
        assert!(identity.is_verified);
    }
}
