// ABOUTME: Classifies an OAuth callback URL into one of its flows.
// ABOUTME: Authorization code, implicit (tokens in fragment), or provider error.

use std::fmt;

use url::Url;

/// Failure category carried to the login page as `?error=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// The provider reported an error
    OAuth,
    /// Code exchange rejected by the backend
    Exchange,
    /// Implicit-flow tokens rejected by the backend
    Session,
    /// Malformed callback or unexpected failure
    Callback,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorKind::OAuth => "oauth_error",
            AuthErrorKind::Exchange => "auth_exchange_error",
            AuthErrorKind::Session => "auth_session_error",
            AuthErrorKind::Callback => "auth_callback_error",
        }
    }
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn callback(message: &str) -> Self {
        Self::new(AuthErrorKind::Callback, message)
    }
}

/// Parameters of an implicit-flow fragment (`#access_token=...`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentParams {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub error: Option<String>,
}

impl FragmentParams {
    pub fn parse(fragment: &str) -> Self {
        let mut params = FragmentParams::default();
        for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "access_token" => params.access_token = Some(value),
                "refresh_token" => params.refresh_token = Some(value),
                "expires_in" => params.expires_in = value.parse().ok(),
                "token_type" => params.token_type = Some(value),
                "error" => params.error = Some(value),
                _ => {}
            }
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        *self == FragmentParams::default()
    }

    /// Access and refresh token to install, or why the fragment is unusable
    pub fn tokens(&self) -> Result<(&str, &str), AuthError> {
        if self.is_empty() {
            return Err(AuthError::callback("no_fragment"));
        }
        if let Some(error) = &self.error {
            return Err(AuthError::new(AuthErrorKind::OAuth, error.as_str()));
        }
        let access = self
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::callback("no_access_token"))?;
        Ok((access, self.refresh_token.as_deref().unwrap_or("")))
    }
}

/// One callback, classified once at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackFlow {
    Code { code: String, next: String },
    Implicit { params: FragmentParams, next: String },
    Error(AuthError),
}

impl CallbackFlow {
    /// Classify a callback URL. `default_next` is used when `next` is
    /// missing or does not name a local path.
    pub fn from_url(url: &Url, default_next: &str) -> Self {
        let mut code = None;
        let mut error = None;
        let mut next = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => code = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "next" => next = Some(value.into_owned()),
                _ => {}
            }
        }
        let next = next
            .filter(|n| is_local_path(n))
            .unwrap_or_else(|| default_next.to_string());

        if let Some(error) = error {
            return CallbackFlow::Error(AuthError::new(AuthErrorKind::OAuth, error));
        }
        if let Some(code) = code.filter(|c| !c.is_empty()) {
            return CallbackFlow::Code { code, next };
        }
        if let Some(fragment) = url.fragment() {
            return CallbackFlow::Implicit {
                params: FragmentParams::parse(fragment),
                next,
            };
        }
        CallbackFlow::Error(AuthError::callback("missing_parameters"))
    }
}

/// Rejects absolute and protocol-relative targets so `next` cannot leave the site
pub(crate) fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
