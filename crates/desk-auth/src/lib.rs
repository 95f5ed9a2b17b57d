// ABOUTME: OAuth callback handling for desk sign-in.
// ABOUTME: Dispatches callback flows and builds environment-aware redirects.

pub mod callback;
pub mod handler;
pub mod redirect;

pub use callback::{AuthError, AuthErrorKind, CallbackFlow, FragmentParams};
pub use handler::{AuthBackend, BackendError, CallbackHandler, CallbackOutcome, Session};
pub use redirect::{ConfigIssue, RedirectConfig};
