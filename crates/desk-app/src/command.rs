// ABOUTME: Parses shell input lines into workspace commands.
// ABOUTME: Validates ids, numbers, content types, and callback URLs up front.

use anyhow::{anyhow, bail, Context, Result};
use desk_core::ContentType;
use desk_layout::{Direction, NodeId};
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Callback(Url),
    Login(Url),
    Logout,
    Projects,
    New {
        name: String,
        description: Option<String>,
    },
    Open(usize),
    Split {
        pane: NodeId,
        direction: Direction,
    },
    Close(NodeId),
    Content {
        pane: NodeId,
        content: ContentType,
    },
    Cycle {
        pane: NodeId,
        back: bool,
    },
    Resize {
        split: NodeId,
        handle: usize,
        delta: f64,
    },
    Drag {
        split: NodeId,
        handle: usize,
        from: f64,
        to: f64,
    },
    /// Drag whichever handle lies under a container pixel
    Grab {
        x: f64,
        y: f64,
        to_x: f64,
        to_y: f64,
    },
    Tree,
    Rects,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  login <origin>                     show the provider redirect URL for an origin
  callback <url>                     complete an OAuth callback
  logout                             sign out
  projects                           list projects
  new <name> [description...]        create a project
  open <index>                       open a project workspace
  split <pane> | vsplit <pane>       split a pane side by side / stacked
  close <pane>                       close a pane
  content <pane> <type>              show dashboard|editor|preview|terminal|explorer|settings
  cycle <pane> [back]                switch to the next or previous content type
  resize <split> <handle> <delta>    move a handle by delta percent
  drag <split> <handle> <from> <to>  drag a handle between pixel positions
  grab <x> <y> <to-x> <to-y>         drag the handle under a pixel to another pixel
  tree | rects                       print the layout
  help | quit";

impl Command {
    /// Parse one input line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb, args.as_slice()) {
            ("callback", [url]) => {
                Command::Callback(Url::parse(url).with_context(|| format!("Invalid URL: {url}"))?)
            }
            ("login", [origin]) => Command::Login(
                Url::parse(origin).with_context(|| format!("Invalid URL: {origin}"))?,
            ),
            ("logout", []) => Command::Logout,
            ("projects", []) => Command::Projects,
            ("new", [name, rest @ ..]) => Command::New {
                name: name.to_string(),
                description: (!rest.is_empty()).then(|| rest.join(" ")),
            },
            ("open", [index]) => Command::Open(number(index, "project index")?),
            ("split", [pane]) => Command::Split {
                pane: node(pane)?,
                direction: Direction::Horizontal,
            },
            ("vsplit", [pane]) => Command::Split {
                pane: node(pane)?,
                direction: Direction::Vertical,
            },
            ("close", [pane]) => Command::Close(node(pane)?),
            ("content", [pane, content]) => Command::Content {
                pane: node(pane)?,
                content: content.parse()?,
            },
            ("cycle", [pane]) => Command::Cycle {
                pane: node(pane)?,
                back: false,
            },
            ("cycle", [pane, "back"]) => Command::Cycle {
                pane: node(pane)?,
                back: true,
            },
            ("resize", [split, handle, delta]) => Command::Resize {
                split: node(split)?,
                handle: number(handle, "handle index")?,
                delta: float(delta)?,
            },
            ("drag", [split, handle, from, to]) => Command::Drag {
                split: node(split)?,
                handle: number(handle, "handle index")?,
                from: float(from)?,
                to: float(to)?,
            },
            ("grab", [x, y, to_x, to_y]) => Command::Grab {
                x: float(x)?,
                y: float(y)?,
                to_x: float(to_x)?,
                to_y: float(to_y)?,
            },
            ("tree", []) => Command::Tree,
            ("rects", []) => Command::Rects,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => bail!("Unrecognized command: {line} (try `help`)"),
        };
        Ok(Some(command))
    }
}

fn node(word: &str) -> Result<NodeId> {
    Ok(NodeId(number(word, "node id")?))
}

fn number<T: std::str::FromStr>(word: &str, what: &str) -> Result<T> {
    word.parse()
        .map_err(|_| anyhow!("Invalid {what}: {word}"))
}

fn float(word: &str) -> Result<f64> {
    let value: f64 = word.parse().map_err(|_| anyhow!("Invalid number: {word}"))?;
    if !value.is_finite() {
        bail!("Invalid number: {word}");
    }
    Ok(value)
}
