// ABOUTME: Environment-dependent redirect URLs for the OAuth round trip.
// ABOUTME: Builds provider redirect, post-login, and error locations; checks deployment config.

use desk_core::{AuthSettings, Environment};
use url::Url;

use crate::callback::{is_local_path, AuthError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigIssue {
    #[error("site_url points to localhost ({0}); OAuth would redirect to localhost in production")]
    SiteUrlPointsToLocalhost(String),

    #[error("site_url is not set; production redirects fall back to the request origin")]
    MissingSiteUrl,

    #[error("site_url is not a valid URL: {0}")]
    InvalidSiteUrl(String),

    #[error("redirect path {0:?} must start with '/'")]
    RedirectPathNotAbsolute(String),
}

#[derive(Debug, Clone)]
pub struct RedirectConfig {
    environment: Option<Environment>,
    site_url: Option<String>,
    dev_redirect_path: String,
    prod_redirect_path: String,
    callback_path: String,
    login_path: String,
}

impl From<&AuthSettings> for RedirectConfig {
    fn from(settings: &AuthSettings) -> Self {
        Self {
            environment: settings.environment,
            site_url: settings.site_url.clone(),
            dev_redirect_path: settings.dev_redirect_path.clone(),
            prod_redirect_path: settings.prod_redirect_path.clone(),
            callback_path: settings.callback_path.clone(),
            login_path: settings.login_path.clone(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self::from(&AuthSettings::default())
    }
}

impl RedirectConfig {
    /// Configured environment, else detected from the request host
    pub fn environment_for(&self, host: Option<&str>) -> Environment {
        self.environment
            .unwrap_or_else(|| host.map_or(Environment::Production, Environment::from_hostname))
    }

    /// Where users land after signing in
    pub fn landing_path(&self, environment: Environment) -> &str {
        match environment {
            Environment::Development => &self.dev_redirect_path,
            Environment::Production => &self.prod_redirect_path,
        }
    }

    /// URL handed to the provider as `redirectTo`: `<site>/auth/callback?next=<landing>`
    pub fn oauth_redirect_url(&self, origin: &Url) -> Url {
        let environment = self.environment_for(origin.host_str());
        let base = self
            .site_url
            .as_deref()
            .and_then(|site| Url::parse(site).ok())
            .unwrap_or_else(|| origin.clone());
        let mut url = base.join(&self.callback_path).unwrap_or(base);
        url.set_query(Some(&format!("next={}", self.landing_path(environment))));
        url.set_fragment(None);
        url
    }

    /// Location after a successful sign-in
    pub fn success_location(
        &self,
        origin: &Url,
        forwarded_host: Option<&str>,
        next: &str,
    ) -> String {
        let origin_str = origin.origin().ascii_serialization();
        match (self.environment_for(origin.host_str()), forwarded_host) {
            (Environment::Development, _) => format!("{origin_str}{next}"),
            (Environment::Production, Some(host)) if !host.is_empty() => {
                format!("https://{host}{next}")
            }
            (Environment::Production, _) => format!("{origin_str}{next}"),
        }
    }

    /// Login page carrying the error kind and message
    pub fn error_location(&self, origin: &Url, error: &AuthError) -> String {
        let mut url = origin.join(&self.login_path).unwrap_or_else(|_| origin.clone());
        url.set_fragment(None);
        url.query_pairs_mut()
            .clear()
            .append_pair("error", error.kind.as_str())
            .append_pair("message", &error.message);
        url.to_string()
    }

    /// Deployment problems worth warning about at startup
    pub fn diagnose(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for path in [&self.dev_redirect_path, &self.prod_redirect_path] {
            if !is_local_path(path) {
                issues.push(ConfigIssue::RedirectPathNotAbsolute(path.clone()));
            }
        }
        if self.environment != Some(Environment::Production) {
            return issues;
        }
        match self.site_url.as_deref() {
            None => issues.push(ConfigIssue::MissingSiteUrl),
            Some(site) => match Url::parse(site) {
                Ok(url) => {
                    if url
                        .host_str()
                        .is_some_and(|h| Environment::from_hostname(h) == Environment::Development)
                    {
                        issues.push(ConfigIssue::SiteUrlPointsToLocalhost(site.to_string()));
                    }
                }
                Err(_) => issues.push(ConfigIssue::InvalidSiteUrl(site.to_string())),
            },
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::AuthErrorKind;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn oauth_redirect_for_local_development() {
        let config = RedirectConfig::default();
        assert_eq!(
            config.oauth_redirect_url(&url("http://localhost:3000")).as_str(),
            "http://localhost:3000/auth/callback?next=/project"
        );
    }

    #[test]
    fn oauth_redirect_for_production_prefers_site_url() {
        let settings = AuthSettings {
            site_url: Some("https://desk.example.com".to_string()),
            ..AuthSettings::default()
        };
        let config = RedirectConfig::from(&settings);
        assert_eq!(
            config
                .oauth_redirect_url(&url("https://desk-preview.example.net"))
                .as_str(),
            "https://desk.example.com/auth/callback?next=/dashboard"
        );
    }

    #[test]
    fn forced_environment_overrides_host() {
        let settings = AuthSettings {
            environment: Some(Environment::Development),
            ..AuthSettings::default()
        };
        let config = RedirectConfig::from(&settings);
        assert_eq!(
            config.environment_for(Some("desk.example.com")),
            Environment::Development
        );
    }

    #[test]
    fn success_location_by_environment() {
        let config = RedirectConfig::default();
        assert_eq!(
            config.success_location(&url("http://localhost:3000/auth/callback"), Some("proxy"), "/project"),
            "http://localhost:3000/project"
        );
        assert_eq!(
            config.success_location(
                &url("http://internal:8080/auth/callback"),
                Some("desk.example.com"),
                "/dashboard"
            ),
            "https://desk.example.com/dashboard"
        );
        assert_eq!(
            config.success_location(&url("https://desk.example.com/auth/callback"), None, "/dashboard"),
            "https://desk.example.com/dashboard"
        );
    }

    #[test]
    fn error_location_encodes_message() {
        let config = RedirectConfig::default();
        let error = AuthError::new(AuthErrorKind::Exchange, "code expired & reused");
        assert_eq!(
            config.error_location(&url("https://desk.example.com/auth/callback?code=x"), &error),
            "https://desk.example.com/login?error=auth_exchange_error&message=code+expired+%26+reused"
        );
    }

    #[test]
    fn diagnose_flags_localhost_in_production() {
        let settings = AuthSettings {
            environment: Some(Environment::Production),
            site_url: Some("http://localhost:3000".to_string()),
            ..AuthSettings::default()
        };
        assert_eq!(
            RedirectConfig::from(&settings).diagnose(),
            vec![ConfigIssue::SiteUrlPointsToLocalhost(
                "http://localhost:3000".to_string()
            )]
        );

        let missing = AuthSettings {
            environment: Some(Environment::Production),
            ..AuthSettings::default()
        };
        assert_eq!(
            RedirectConfig::from(&missing).diagnose(),
            vec![ConfigIssue::MissingSiteUrl]
        );
    }

    #[test]
    fn diagnose_flags_relative_paths() {
        let settings = AuthSettings {
            dev_redirect_path: "project".to_string(),
            ..AuthSettings::default()
        };
        assert_eq!(
            RedirectConfig::from(&settings).diagnose(),
            vec![ConfigIssue::RedirectPathNotAbsolute("project".to_string())]
        );
        assert!(RedirectConfig::default().diagnose().is_empty());
    }
}
