// ABOUTME: Authenticated-user session context shared with views.
// ABOUTME: Created at startup, updated on sign-in/out, dropped at shutdown.

use serde::{Deserialize, Serialize};

/// Identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Current authentication state.
///
/// Starts out loading until the initial session probe either signs a user
/// in or calls [`SessionContext::finish_loading`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    user: Option<User>,
    loading: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in user, or an error for views that need one
    pub fn require_user(&self) -> Result<&User, SessionError> {
        if self.loading {
            return Err(SessionError::StillLoading);
        }
        self.user.as_ref().ok_or(SessionError::NotAuthenticated)
    }

    pub fn sign_in(&mut self, user: User) {
        tracing::info!("Signed in as {}", user.email);
        self.user = Some(user);
        self.loading = false;
    }

    /// Returns the user that was signed out, if any
    pub fn sign_out(&mut self) -> Option<User> {
        self.loading = false;
        let user = self.user.take();
        if let Some(user) = &user {
            tracing::info!("Signed out {}", user.email);
        }
        user
    }

    /// End the initial probe without a session
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Session is still loading")]
    StillLoading,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn starts_loading_without_user() {
        let session = SessionContext::new();
        assert!(session.is_loading());
        assert!(session.user().is_none());
        assert_eq!(session.require_user(), Err(SessionError::StillLoading));
    }

    #[test]
    fn probe_without_session_gates_views() {
        let mut session = SessionContext::new();
        session.finish_loading();
        assert_eq!(session.require_user(), Err(SessionError::NotAuthenticated));
    }

    #[test]
    fn sign_in_then_out() {
        let mut session = SessionContext::new();
        session.sign_in(user());
        assert!(!session.is_loading());
        assert_eq!(session.require_user().unwrap().email, "ada@example.com");

        let signed_out = session.sign_out();
        assert_eq!(signed_out, Some(user()));
        assert!(!session.is_signed_in());
        assert_eq!(session.sign_out(), None);
    }
}
