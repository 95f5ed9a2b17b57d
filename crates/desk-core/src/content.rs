// ABOUTME: Content types a workspace pane can display.
// ABOUTME: Closed set with labels, cycling, and strict parsing from tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which view a pane renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Project overview widgets - default for new panes
    #[default]
    Dashboard,
    /// Code editor
    Editor,
    /// Rendered application preview
    Preview,
    /// Shell session
    Terminal,
    /// File tree
    Explorer,
    /// Workspace preferences
    Settings,
}

impl ContentType {
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Dashboard,
            ContentType::Editor,
            ContentType::Preview,
            ContentType::Terminal,
            ContentType::Explorer,
            ContentType::Settings,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Dashboard => "Dashboard",
            ContentType::Editor => "Editor",
            ContentType::Preview => "Preview",
            ContentType::Terminal => "Terminal",
            ContentType::Explorer => "Explorer",
            ContentType::Settings => "Settings",
        }
    }

    /// Serialized tag, as accepted by `from_str`
    pub fn tag(&self) -> &'static str {
        match self {
            ContentType::Dashboard => "dashboard",
            ContentType::Editor => "editor",
            ContentType::Preview => "preview",
            ContentType::Terminal => "terminal",
            ContentType::Explorer => "explorer",
            ContentType::Settings => "settings",
        }
    }

    pub fn next(&self) -> ContentType {
        let all = ContentType::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> ContentType {
        let all = ContentType::all();
        let idx = all.iter().position(|c| c == self).unwrap_or(0);
        if idx == 0 {
            all[all.len() - 1]
        } else {
            all[idx - 1]
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct ContentTypeError(pub String);

impl FromStr for ContentType {
    type Err = ContentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::all()
            .iter()
            .copied()
            .find(|c| c.tag() == s)
            .ok_or_else(|| ContentTypeError(s.to_string()))
    }
}
