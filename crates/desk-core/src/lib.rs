// ABOUTME: Shared types and configuration for desk.
// ABOUTME: Defines content types, config file handling, sessions, and projects.

pub mod config;
pub mod content;
pub mod project;
pub mod session;

pub use config::{AuthSettings, Config, ConfigError, Environment, LayoutSettings};
pub use content::{ContentType, ContentTypeError};
pub use project::{MemoryProjectStore, NewProject, Project, ProjectBoard, ProjectError, ProjectStore};
pub use session::{SessionContext, SessionError, User};
