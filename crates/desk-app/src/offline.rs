// ABOUTME: Local stand-in for the hosted auth service.
// ABOUTME: Issues sessions for any non-empty code so the shell works offline.

use desk_auth::{AuthBackend, BackendError, Session};
use desk_core::User;

pub struct OfflineBackend;

impl OfflineBackend {
    fn session_for(subject: &str, refresh_token: &str) -> Session {
        Session {
            user: User {
                id: format!("offline-{subject}"),
                email: format!("{subject}@offline.local"),
                name: subject.to_string(),
                avatar_url: None,
            },
            access_token: subject.to_string(),
            refresh_token: refresh_token.to_string(),
        }
    }
}

impl AuthBackend for OfflineBackend {
    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, BackendError> {
        if code.trim().is_empty() {
            return Err(BackendError::Rejected("Empty authorization code".to_string()));
        }
        Ok(Self::session_for(code, ""))
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<Option<Session>, BackendError> {
        Ok(Some(Self::session_for(access_token, refresh_token)))
    }
}
