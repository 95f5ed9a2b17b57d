// ABOUTME: Main application entry point.
// ABOUTME: Line-driven shell over sign-in, projects, and the pane workspace.

mod command;
mod offline;

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use command::{Command, HELP};
use desk_auth::{CallbackHandler, RedirectConfig};
use desk_core::{Config, MemoryProjectStore, NewProject, Project, ProjectBoard, SessionContext};
use desk_layout::{DragController, Extent, LayoutTree, Node, NodeId, PointerPosition};
use url::Url;
use offline::OfflineBackend;

/// An open project and its pane layout
struct Workspace {
    project: Project,
    layout: LayoutTree,
    drag: DragController,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct App {
    config: Config,
    session: SessionContext,
    projects: ProjectBoard<MemoryProjectStore>,
    auth: CallbackHandler<OfflineBackend>,
    workspace: Option<Workspace>,
}

impl App {
    fn new(config: Config) -> Self {
        let redirects = RedirectConfig::from(&config.auth);
        for issue in redirects.diagnose() {
            tracing::warn!("Auth config: {}", issue);
        }

        // No stored session to restore, the probe ends immediately
        let mut session = SessionContext::new();
        session.finish_loading();

        Self {
            session,
            projects: ProjectBoard::new(MemoryProjectStore::new()),
            auth: CallbackHandler::new(OfflineBackend, redirects),
            workspace: None,
            config,
        }
    }

    fn container(&self) -> Extent {
        Extent {
            width: self.config.container_width as f64,
            height: self.config.container_height as f64,
        }
    }

    /// URL the provider should send the browser back to after sign-in
    fn provider_redirect(&self, origin: &Url) -> Url {
        self.auth.redirects().oauth_redirect_url(origin)
    }

    fn workspace(&mut self) -> Result<&mut Workspace> {
        self.session.require_user()?;
        self.workspace
            .as_mut()
            .ok_or_else(|| anyhow!("No project open, use `open <index>`"))
    }

    async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Callback(url) => {
                let outcome = self.auth.handle(&url, None).await;
                if let Some(session) = outcome.session {
                    self.session.sign_in(session.user);
                    self.projects.refresh(&self.session);
                }
                println!("redirect: {}", outcome.location);
            }
            Command::Login(origin) => {
                println!("redirect_to: {}", self.provider_redirect(&origin));
            }
            Command::Logout => {
                self.session.sign_out();
                self.workspace = None;
                self.projects.refresh(&self.session);
                println!("signed out");
            }
            Command::Projects => {
                self.session.require_user()?;
                self.print_projects();
            }
            Command::New { name, description } => {
                let created = self
                    .projects
                    .create(&self.session, NewProject::new(name, description));
                match created {
                    Some(project) => println!("created {} ({})", project.name, project.id),
                    None => println!(
                        "error: {}",
                        self.projects.error().unwrap_or("Failed to create project")
                    ),
                }
            }
            Command::Open(index) => {
                self.session.require_user()?;
                let project = self
                    .projects
                    .projects()
                    .get(index)
                    .cloned()
                    .with_context(|| format!("No project at index {index}"))?;
                self.projects.touch(&self.session, project.id);
                let layout = LayoutTree::with_settings(&self.config.layout)?;
                tracing::info!("Opened workspace for {}", project.name);
                println!("opened {}", project.name);
                self.workspace = Some(Workspace {
                    project,
                    layout,
                    drag: DragController::new(),
                });
                self.print_panes()?;
            }
            Command::Split { pane, direction } => {
                let ws = self.workspace()?;
                match ws.layout.split_with(pane, direction) {
                    Some(new_pane) => println!("split {pane}, new pane {new_pane}"),
                    None => println!("{pane} is not a pane"),
                }
                self.print_panes()?;
            }
            Command::Close(pane) => {
                let ws = self.workspace()?;
                if !ws.layout.close(pane) {
                    println!("cannot close {pane}");
                }
                self.print_panes()?;
            }
            Command::Content { pane, content } => {
                let ws = self.workspace()?;
                if !ws.layout.set_content(pane, content) {
                    println!("{pane} is not a pane");
                }
                self.print_panes()?;
            }
            Command::Cycle { pane, back } => {
                let ws = self.workspace()?;
                match ws.layout.content_of(pane) {
                    Some(current) => {
                        let content = if back { current.prev() } else { current.next() };
                        ws.layout.set_content(pane, content);
                    }
                    None => println!("{pane} is not a pane"),
                }
                self.print_panes()?;
            }
            Command::Resize {
                split,
                handle,
                delta,
            } => {
                let ws = self.workspace()?;
                if !ws.layout.resize(split, handle, delta) {
                    println!("resize rejected");
                }
                self.print_sizes(split)?;
            }
            Command::Drag {
                split,
                handle,
                from,
                to,
            } => {
                let container = self.container();
                let ws = self.workspace()?;
                // Only the split's own axis is read, so both coordinates can carry the value
                if !ws.drag.pointer_down(&ws.layout, split, handle, PointerPosition::new(from, from)) {
                    println!("no handle {handle} on split {split}");
                    return Ok(Flow::Continue);
                }
                ws.drag
                    .pointer_move(&mut ws.layout, PointerPosition::new(to, to), container);
                ws.drag.pointer_up();
                self.print_sizes(split)?;
            }
            Command::Grab { x, y, to_x, to_y } => {
                let container = self.container();
                let thickness = self.config.layout.handle_thickness;
                let ws = self.workspace()?;
                if !(container.width > 0.0 && container.height > 0.0) {
                    bail!("Container size must be positive");
                }
                let hit = ws.layout.handle_at(
                    (x / container.width) as f32,
                    (y / container.height) as f32,
                    thickness,
                );
                let Some(hit) = hit else {
                    println!("no handle at ({x}, {y})");
                    return Ok(Flow::Continue);
                };
                ws.drag
                    .pointer_down(&ws.layout, hit.split, hit.index, PointerPosition::new(x, y));
                ws.drag
                    .pointer_move(&mut ws.layout, PointerPosition::new(to_x, to_y), container);
                ws.drag.pointer_up();
                self.print_sizes(hit.split)?;
            }
            Command::Tree => {
                let ws = self.workspace()?;
                println!("{}", serde_json::to_string_pretty(ws.layout.root())?);
            }
            Command::Rects => {
                let ws = self.workspace()?;
                let rects = ws.layout.pane_rects();
                for pane in ws.layout.panes() {
                    let Some(rect) = rects.get(&pane) else {
                        continue;
                    };
                    println!(
                        "pane {pane}: x={:.3} y={:.3} w={:.3} h={:.3}",
                        rect.x, rect.y, rect.width, rect.height
                    );
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn print_projects(&self) {
        if let Some(error) = self.projects.error() {
            println!("error: {error}");
        }
        if self.projects.projects().is_empty() {
            println!("no projects, create one with `new <name>`");
        }
        for (index, project) in self.projects.projects().iter().enumerate() {
            let accessed = project
                .last_accessed_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "{index}: {} - {} (opened {accessed})",
                project.name,
                project.description.as_deref().unwrap_or("no description"),
            );
        }
    }

    fn print_panes(&mut self) -> Result<()> {
        let ws = self.workspace()?;
        println!("[{}]", ws.project.name);
        for pane in ws.layout.panes() {
            let content = ws.layout.content_of(pane).unwrap_or_default();
            let close = if ws.layout.can_close(pane) { " [x]" } else { "" };
            println!("  pane {pane}: {}{close}", content.label());
        }
        Ok(())
    }

    fn print_sizes(&mut self, split: NodeId) -> Result<()> {
        let ws = self.workspace()?;
        match ws.layout.find(split).and_then(Node::as_split) {
            Some(node) => {
                let sizes: Vec<String> = node.sizes().iter().map(|s| format!("{s:.1}")).collect();
                println!("split {split}: [{}]", sizes.join(", "));
            }
            None => println!("{split} is not a split"),
        }
        Ok(())
    }

    async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    println!("error: {e:#}");
                    continue;
                }
            };
            match self.execute(command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => println!("error: {e:#}"),
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting desk");

    let config = Config::load_or_default();
    let mut app = App::new(config);
    app.run().await?;

    tracing::info!("Exiting desk");
    Ok(())
}
