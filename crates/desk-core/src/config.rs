// ABOUTME: Layout, auth redirect, and container settings for desk.
// ABOUTME: Loads and saves TOML config files and applies DESK_* environment overrides.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ContentType;

/// Deployment environment, selects the post-login landing path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Hostnames that count as a local development origin
    pub fn from_hostname(host: &str) -> Self {
        match host {
            "localhost" | "127.0.0.1" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Pane layout limits (percentages of the parent split)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Smallest size a pane may be dragged to
    pub min_size: f64,
    /// Largest size a pane may be dragged to
    pub max_size: f64,
    /// Content shown by freshly split panes
    pub default_content: ContentType,
    /// Resize handle thickness in normalized units, used for hit testing
    pub handle_thickness: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_size: 10.0,
            max_size: 90.0,
            default_content: ContentType::Dashboard,
            handle_thickness: 0.01,
        }
    }
}

/// OAuth redirect settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Forced environment; detected from the request origin when unset
    pub environment: Option<Environment>,
    /// Public site URL used to build the provider redirect
    pub site_url: Option<String>,
    pub dev_redirect_path: String,
    pub prod_redirect_path: String,
    pub callback_path: String,
    pub login_path: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            environment: None,
            site_url: None,
            dev_redirect_path: "/project".to_string(),
            prod_redirect_path: "/dashboard".to_string(),
            callback_path: "/auth/callback".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pane layout limits
    pub layout: LayoutSettings,

    /// OAuth callback and redirect settings
    pub auth: AuthSettings,

    /// Workspace container dimensions in pixels (drag deltas are relative to these)
    pub container_width: u32,
    pub container_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutSettings::default(),
            auth: AuthSettings::default(),
            container_width: 1200,
            container_height: 800,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/desk/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("desk").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `DESK_ENV` and `DESK_SITE_URL` on top of the file settings
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(value) = var("DESK_ENV") {
            match Environment::parse(&value) {
                Some(env) => self.auth.environment = Some(env),
                None => tracing::warn!("Unrecognized DESK_ENV value: {}", value),
            }
        }
        if let Some(url) = var("DESK_SITE_URL") {
            let url = url.trim();
            self.auth.site_url = if url.is_empty() {
                None
            } else {
                Some(url.trim_end_matches('/').to_string())
            };
        }
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.layout.min_size = 15.0;
        config.layout.default_content = ContentType::Terminal;
        config.auth.environment = Some(Environment::Production);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.layout.min_size, 15.0);
        assert_eq!(loaded.layout.default_content, ContentType::Terminal);
        assert_eq!(loaded.auth.environment, Some(Environment::Production));
        assert_eq!(loaded.auth.dev_redirect_path, "/project");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("[layout]\nmax_size = 80.0\n").unwrap();
        assert_eq!(config.layout.max_size, 80.0);
        assert_eq!(config.layout.min_size, 10.0);
        assert_eq!(config.auth.prod_redirect_path, "/dashboard");
        assert_eq!(config.container_width, 1200);
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| match key {
            "DESK_ENV" => Some("prod".to_string()),
            "DESK_SITE_URL" => Some("https://desk.example.com/".to_string()),
            _ => None,
        });
        assert_eq!(config.auth.environment, Some(Environment::Production));
        assert_eq!(
            config.auth.site_url.as_deref(),
            Some("https://desk.example.com")
        );
    }

    #[test]
    fn unknown_env_value_is_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|key| (key == "DESK_ENV").then(|| "staging".to_string()));
        assert_eq!(config.auth.environment, None);
    }

    #[test]
    fn environment_from_hostname() {
        assert_eq!(Environment::from_hostname("localhost"), Environment::Development);
        assert_eq!(Environment::from_hostname("127.0.0.1"), Environment::Development);
        assert_eq!(
            Environment::from_hostname("desk.example.com"),
            Environment::Production
        );
    }
}
