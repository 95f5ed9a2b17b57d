// ABOUTME: Project records and the store contract the dashboard consumes.
// ABOUTME: Includes recency ordering, an in-memory store, and the list view state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::session::SessionContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

/// Input for [`ProjectStore::create`]
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Trimmed name and description; blank descriptions become `None`
    pub fn normalized(&self) -> Result<(String, Option<String>), ProjectError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProjectError::EmptyName);
        }
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok((name.to_string(), description))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    #[error("Project name must not be empty")]
    EmptyName,

    #[error("Project not found: {0}")]
    NotFound(Uuid),
}

/// Backing store for projects, scoped by owner
pub trait ProjectStore {
    fn create(&mut self, owner_id: &str, project: NewProject) -> Result<Project, ProjectError>;

    /// Projects of `owner_id`, most recently used first
    fn list(&self, owner_id: &str) -> Result<Vec<Project>, ProjectError>;

    /// Record that the project was opened at `at`
    fn touch(&mut self, owner_id: &str, project_id: Uuid, at: DateTime<Utc>)
        -> Result<(), ProjectError>;
}

/// Most recently accessed first, never-accessed last, then newest created first
pub fn compare_recent(a: &Project, b: &Project) -> Ordering {
    match (a.last_accessed_at, b.last_accessed_at) {
        (Some(a_at), Some(b_at)) => b_at.cmp(&a_at).then(b.created_at.cmp(&a.created_at)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

/// Process-local store, used for development and tests
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    projects: Vec<Project>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryProjectStore {
    fn create(&mut self, owner_id: &str, project: NewProject) -> Result<Project, ProjectError> {
        let (name, description) = project.normalized()?;
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            name,
            description,
            created_at: now,
            updated_at: now,
            last_accessed_at: None,
        };
        self.projects.push(project.clone());
        Ok(project)
    }

    fn list(&self, owner_id: &str) -> Result<Vec<Project>, ProjectError> {
        let mut owned: Vec<Project> = self
            .projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(compare_recent);
        Ok(owned)
    }

    fn touch(
        &mut self,
        owner_id: &str,
        project_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), ProjectError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == project_id && p.owner_id == owner_id)
            .ok_or(ProjectError::NotFound(project_id))?;
        project.last_accessed_at = Some(at);
        Ok(())
    }
}

/// Project list as shown on the dashboard: loaded projects plus the last error
#[derive(Debug)]
pub struct ProjectBoard<S> {
    store: S,
    projects: Vec<Project>,
    error: Option<String>,
}

impl<S: ProjectStore> ProjectBoard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            projects: Vec::new(),
            error: None,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Reload from the store; signed-out sessions see an empty list
    pub fn refresh(&mut self, session: &SessionContext) {
        let Some(user) = session.user() else {
            self.projects.clear();
            return;
        };
        self.error = None;
        match self.store.list(&user.id) {
            Ok(projects) => self.projects = projects,
            Err(e) => {
                tracing::error!("Failed to fetch projects: {}", e);
                self.error = Some("Failed to fetch projects".to_string());
            }
        }
    }

    /// Create a project and put it at the front of the list
    pub fn create(&mut self, session: &SessionContext, project: NewProject) -> Option<Project> {
        let Some(user) = session.user() else {
            self.error = Some("User not authenticated".to_string());
            return None;
        };
        self.error = None;
        match self.store.create(&user.id, project) {
            Ok(created) => {
                tracing::info!("Created project {} ({})", created.name, created.id);
                self.projects.insert(0, created.clone());
                Some(created)
            }
            Err(e) => {
                tracing::error!("Failed to create project: {}", e);
                self.error = Some("Failed to create project".to_string());
                None
            }
        }
    }

    /// Mark a project as just opened. Failures are logged and otherwise ignored.
    pub fn touch(&mut self, session: &SessionContext, project_id: Uuid) {
        let Some(user) = session.user() else {
            return;
        };
        let now = Utc::now();
        if let Err(e) = self.store.touch(&user.id, project_id, now) {
            tracing::warn!("Failed to update last accessed time: {}", e);
            return;
        }
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id) {
            project.last_accessed_at = Some(now);
        }
        self.projects.sort_by(compare_recent);
    }
}
