// ABOUTME: Completes an OAuth callback against the hosted auth backend.
// ABOUTME: Every outcome is a redirect; failures go to the login page.

use std::future::Future;

use desk_core::User;
use url::Url;

use crate::callback::{AuthError, AuthErrorKind, CallbackFlow, FragmentParams};
use crate::redirect::RedirectConfig;

/// Session issued by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend answered and refused
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached or answered garbage
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Hosted authentication service
pub trait AuthBackend {
    /// Trade an authorization code for a session
    fn exchange_code_for_session(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Session, BackendError>> + Send;

    /// Install tokens from an implicit-flow fragment
    fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> impl Future<Output = Result<Option<Session>, BackendError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    /// Where to send the browser
    pub location: String,
    /// Present when the user is now signed in
    pub session: Option<Session>,
}

pub struct CallbackHandler<B> {
    backend: B,
    redirects: RedirectConfig,
}

impl<B: AuthBackend> CallbackHandler<B> {
    pub fn new(backend: B, redirects: RedirectConfig) -> Self {
        Self { backend, redirects }
    }

    pub fn redirects(&self) -> &RedirectConfig {
        &self.redirects
    }

    /// Handle one callback request. `forwarded_host` is the
    /// `x-forwarded-host` header, if a proxy set one.
    pub async fn handle(&self, url: &Url, forwarded_host: Option<&str>) -> CallbackOutcome {
        let environment = self.redirects.environment_for(url.host_str());
        let default_next = self.redirects.landing_path(environment);

        let result = match CallbackFlow::from_url(url, default_next) {
            CallbackFlow::Code { code, next } => self.complete_code(&code).await.map(|s| (s, next)),
            CallbackFlow::Implicit { params, next } => {
                self.complete_implicit(&params).await.map(|s| (s, next))
            }
            CallbackFlow::Error(error) => Err(error),
        };

        match result {
            Ok((session, next)) => {
                tracing::info!("OAuth callback signed in {}", session.user.email);
                CallbackOutcome {
                    location: self.redirects.success_location(url, forwarded_host, &next),
                    session: Some(session),
                }
            }
            Err(error) => {
                tracing::error!("OAuth callback failed: {}", error);
                CallbackOutcome {
                    location: self.redirects.error_location(url, &error),
                    session: None,
                }
            }
        }
    }

    async fn complete_code(&self, code: &str) -> Result<Session, AuthError> {
        self.backend
            .exchange_code_for_session(code)
            .await
            .map_err(|e| backend_error(AuthErrorKind::Exchange, e))
    }

    async fn complete_implicit(&self, params: &FragmentParams) -> Result<Session, AuthError> {
        let (access, refresh) = params.tokens()?;
        self.backend
            .set_session(access, refresh)
            .await
            .map_err(|e| backend_error(AuthErrorKind::Session, e))?
            .ok_or_else(|| AuthError::callback("no_session_created"))
    }
}

fn backend_error(kind: AuthErrorKind, error: BackendError) -> AuthError {
    match error {
        BackendError::Rejected(message) => AuthError::new(kind, message),
        BackendError::Transport(detail) => {
            tracing::warn!("Auth backend transport failure: {}", detail);
            AuthError::callback("unexpected_error")
        }
    }
}
