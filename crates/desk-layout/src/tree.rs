// ABOUTME: Split-pane tree for the workspace layout.
// ABOUTME: Supports splitting, closing, content changes, and proportional resizing.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use desk_core::{ContentType, LayoutSettings};
use serde::{Deserialize, Serialize};

/// Tolerance for the "sizes sum to 100" invariant
pub const SIZE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Children laid out left to right
    Horizontal,
    /// Children laid out top to bottom
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pane {
    pub id: NodeId,
    pub content: ContentType,
}

/// Internal node. Sizes are percentages parallel to `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    id: NodeId,
    direction: Direction,
    children: Vec<Arc<Node>>,
    sizes: Vec<f64>,
}

impl Split {
    /// Build a split node. Invariants are checked when the node becomes part
    /// of a [`LayoutTree`].
    pub fn new(id: NodeId, direction: Direction, children: Vec<Node>, sizes: Vec<f64>) -> Self {
        Self {
            id,
            direction,
            children: children.into_iter().map(Arc::new).collect(),
            sizes,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn children(&self) -> &[Arc<Node>] {
        &self.children
    }

    pub fn sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Copy of this split without child `index`, sizes spread evenly.
    /// Collapses to the remaining child when only one is left.
    fn without_child(&self, index: usize) -> Arc<Node> {
        let mut children = self.children.clone();
        children.remove(index);
        if children.len() == 1 {
            return children.remove(0);
        }
        let even = 100.0 / children.len() as f64;
        Arc::new(Node::Split(Split {
            id: self.id,
            direction: self.direction,
            sizes: vec![even; children.len()],
            children,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Pane(Pane),
    Split(Split),
}

impl Node {
    pub fn pane(id: NodeId, content: ContentType) -> Self {
        Node::Pane(Pane { id, content })
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Pane(pane) => pane.id,
            Node::Split(split) => split.id,
        }
    }

    pub fn as_pane(&self) -> Option<&Pane> {
        match self {
            Node::Pane(pane) => Some(pane),
            Node::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&Split> {
        match self {
            Node::Split(split) => Some(split),
            Node::Pane(_) => None,
        }
    }
}

/// Bounds a resize may push a single size to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    min: f64,
    max: f64,
}

impl SizeLimits {
    pub fn new(min: f64, max: f64) -> Result<Self, LayoutError> {
        if !(min > 0.0 && max <= 100.0 && min < max) {
            return Err(LayoutError::InvalidLimits { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Move the boundary after `handle` by `delta` percent.
    ///
    /// The two adjacent sizes keep their sum, each stays within the limits.
    /// Returns `None` when the handle is out of range or the pair cannot
    /// satisfy the limits at all.
    pub fn resize(&self, sizes: &[f64], handle: usize, delta: f64) -> Option<Vec<f64>> {
        if !delta.is_finite() {
            return None;
        }
        let right = handle.checked_add(1)?;
        if right >= sizes.len() {
            return None;
        }
        let total = sizes[handle] + sizes[right];
        let lo = self.min.max(total - self.max);
        let hi = self.max.min(total - self.min);
        if !(lo <= hi) {
            return None;
        }
        let left_size = (sizes[handle] + delta).clamp(lo, hi);
        let mut next = sizes.to_vec();
        next[handle] = left_size;
        next[right] = total - left_size;
        Some(next)
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Split {0} has {1} children, needs at least 2")]
    TooFewChildren(NodeId, usize),

    #[error("Split {id} has {children} children but {sizes} sizes")]
    SizeCountMismatch {
        id: NodeId,
        children: usize,
        sizes: usize,
    },

    #[error("Split {id} has invalid size {size}")]
    InvalidSize { id: NodeId, size: f64 },

    #[error("Split {id} sizes sum to {sum}, expected 100")]
    SizeSum { id: NodeId, sum: f64 },

    #[error("Duplicate node id {0}")]
    DuplicateId(NodeId),

    #[error("Invalid size limits: min {min}, max {max}")]
    InvalidLimits { min: f64, max: f64 },

    #[error("No node ids left above {0}")]
    IdSpaceExhausted(NodeId),
}

/// The pane tree backing one workspace view.
///
/// Every mutation publishes a new root; untouched subtrees are shared with
/// the previous root, so a [`LayoutTree::snapshot`] taken earlier never
/// observes a change.
#[derive(Debug, Clone)]
pub struct LayoutTree {
    root: Arc<Node>,
    next_id: u64,
    limits: SizeLimits,
    default_content: ContentType,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Node::pane(NodeId(0), ContentType::default())),
            next_id: 1,
            limits: SizeLimits::default(),
            default_content: ContentType::default(),
        }
    }

    pub fn with_settings(settings: &LayoutSettings) -> Result<Self, LayoutError> {
        let limits = SizeLimits::new(settings.min_size, settings.max_size)?;
        Ok(Self {
            root: Arc::new(Node::pane(NodeId(0), settings.default_content)),
            next_id: 1,
            limits,
            default_content: settings.default_content,
        })
    }

    /// Adopt an existing tree after checking its invariants
    pub fn from_root(root: Node, limits: SizeLimits) -> Result<Self, LayoutError> {
        validate_node(&root)?;
        let max_id = max_id(&root);
        let next_id = max_id
            .checked_add(1)
            .ok_or(LayoutError::IdSpaceExhausted(NodeId(max_id)))?;
        Ok(Self {
            root: Arc::new(root),
            next_id,
            limits,
            default_content: ContentType::default(),
        })
    }

    /// Content given to panes created by later splits
    pub fn with_default_content(mut self, content: ContentType) -> Self {
        self.default_content = content;
        self
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Shared handle to the current root
    pub fn snapshot(&self) -> Arc<Node> {
        Arc::clone(&self.root)
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    /// Check every structural and size invariant of the current tree
    pub fn validate(&self) -> Result<(), LayoutError> {
        validate_node(&self.root)
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        find_node(&self.root, id)
    }

    /// Parent split of `id` and the child's index in it
    pub fn parent_of(&self, id: NodeId) -> Option<(&Split, usize)> {
        find_parent(&self.root, id)
    }

    pub fn content_of(&self, id: NodeId) -> Option<ContentType> {
        self.find(id).and_then(Node::as_pane).map(|p| p.content)
    }

    /// Whether closing `id` would do anything (the last pane cannot be closed)
    pub fn can_close(&self, id: NodeId) -> bool {
        self.parent_of(id).is_some()
    }

    /// Get all pane IDs in depth-first order
    pub fn panes(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        collect_panes(&self.root, &mut result);
        result
    }

    pub fn pane_count(&self) -> usize {
        self.panes().len()
    }

    /// Split a pane horizontally, returns the new pane's ID
    pub fn split(&mut self, pane: NodeId) -> Option<NodeId> {
        self.split_with(pane, Direction::Horizontal)
    }

    /// Replace a pane with a split holding it and a fresh pane
    pub fn split_with(&mut self, pane: NodeId, direction: Direction) -> Option<NodeId> {
        let Some(next_id) = self.next_id.checked_add(2) else {
            tracing::warn!("Ignoring split of {}: node ids exhausted", pane);
            return None;
        };
        let new_pane = NodeId(self.next_id);
        let split_id = NodeId(self.next_id + 1);
        let content = self.default_content;

        let root = rebuild(&self.root, pane, &mut |node: &Arc<Node>| {
            node.as_pane()?;
            Some(Arc::new(Node::Split(Split {
                id: split_id,
                direction,
                children: vec![Arc::clone(node), Arc::new(Node::pane(new_pane, content))],
                sizes: vec![50.0, 50.0],
            })))
        });
        let Some(root) = root else {
            tracing::trace!("Ignoring split of {}: not a pane", pane);
            return None;
        };

        self.root = root;
        self.next_id = next_id;
        tracing::debug!("Split pane {} into {} ({:?}), new pane {}", pane, split_id, direction, new_pane);
        Some(new_pane)
    }

    /// Close a node, returns whether the tree changed
    pub fn close(&mut self, id: NodeId) -> bool {
        let Some((parent, index)) = self.parent_of(id) else {
            tracing::trace!("Ignoring close of {}: no parent split", id);
            return false;
        };
        let parent_id = parent.id;

        let root = rebuild(&self.root, parent_id, &mut |node: &Arc<Node>| {
            node.as_split().map(|split| split.without_child(index))
        });
        match root {
            Some(root) => {
                self.root = root;
                tracing::debug!("Closed {}, remaining panes: {}", id, self.pane_count());
                true
            }
            None => false,
        }
    }

    /// Change what a pane displays, returns whether `pane` is a pane
    pub fn set_content(&mut self, pane: NodeId, content: ContentType) -> bool {
        let root = rebuild(&self.root, pane, &mut |node: &Arc<Node>| {
            let current = node.as_pane()?;
            Some(Arc::new(Node::pane(current.id, content)))
        });
        let Some(root) = root else {
            tracing::trace!("Ignoring content change of {}: not a pane", pane);
            return false;
        };
        self.root = root;
        tracing::debug!("Pane {} now shows {}", pane, content);
        true
    }

    /// Move the boundary after child `handle` of `split` by `delta` percent
    pub fn resize(&mut self, split: NodeId, handle: usize, delta: f64) -> bool {
        let Some(start) = self.find(split).and_then(Node::as_split) else {
            return false;
        };
        let start = start.sizes.clone();
        self.resize_from(split, handle, &start, delta)
    }

    /// Resize relative to `start_sizes` rather than the current sizes.
    ///
    /// Used by drags so the result depends only on the cumulative delta.
    pub fn resize_from(
        &mut self,
        split: NodeId,
        handle: usize,
        start_sizes: &[f64],
        delta: f64,
    ) -> bool {
        let limits = self.limits;
        let root = rebuild(&self.root, split, &mut |node: &Arc<Node>| {
            let current = node.as_split()?;
            if current.sizes.len() != start_sizes.len() {
                return None;
            }
            let sizes = limits.resize(start_sizes, handle, delta)?;
            Some(Arc::new(Node::Split(Split {
                sizes,
                ..current.clone()
            })))
        });
        let Some(root) = root else {
            tracing::trace!("Rejected resize of {} at handle {} by {}", split, handle, delta);
            return false;
        };
        self.root = root;
        true
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the path from `node` down to `target`, replacing the target with
/// whatever `edit` returns. Subtrees off the path are shared, not copied.
fn rebuild(
    node: &Arc<Node>,
    target: NodeId,
    edit: &mut dyn FnMut(&Arc<Node>) -> Option<Arc<Node>>,
) -> Option<Arc<Node>> {
    if node.id() == target {
        return edit(node);
    }
    let Node::Split(split) = node.as_ref() else {
        return None;
    };
    for (index, child) in split.children.iter().enumerate() {
        if let Some(replacement) = rebuild(child, target, edit) {
            let mut children = split.children.clone();
            children[index] = replacement;
            return Some(Arc::new(Node::Split(Split {
                children,
                ..split.clone()
            })));
        }
    }
    None
}

fn find_node(node: &Node, id: NodeId) -> Option<&Node> {
    if node.id() == id {
        return Some(node);
    }
    match node {
        Node::Pane(_) => None,
        Node::Split(split) => split.children.iter().find_map(|c| find_node(c, id)),
    }
}

fn find_parent(node: &Node, id: NodeId) -> Option<(&Split, usize)> {
    let Node::Split(split) = node else {
        return None;
    };
    if let Some(index) = split.children.iter().position(|c| c.id() == id) {
        return Some((split, index));
    }
    split.children.iter().find_map(|c| find_parent(c, id))
}

fn collect_panes(node: &Node, out: &mut Vec<NodeId>) {
    match node {
        Node::Pane(pane) => out.push(pane.id),
        Node::Split(split) => {
            for child in &split.children {
                collect_panes(child, out);
            }
        }
    }
}

fn max_id(node: &Node) -> u64 {
    match node {
        Node::Pane(pane) => pane.id.0,
        Node::Split(split) => split
            .children
            .iter()
            .map(|c| max_id(c))
            .fold(split.id.0, u64::max),
    }
}

fn validate_node(root: &Node) -> Result<(), LayoutError> {
    let mut seen = HashSet::new();
    validate_inner(root, &mut seen)
}

fn validate_inner(node: &Node, seen: &mut HashSet<NodeId>) -> Result<(), LayoutError> {
    if !seen.insert(node.id()) {
        return Err(LayoutError::DuplicateId(node.id()));
    }
    let Node::Split(split) = node else {
        return Ok(());
    };
    if split.children.len() < 2 {
        return Err(LayoutError::TooFewChildren(split.id, split.children.len()));
    }
    if split.sizes.len() != split.children.len() {
        return Err(LayoutError::SizeCountMismatch {
            id: split.id,
            children: split.children.len(),
            sizes: split.sizes.len(),
        });
    }
    if let Some(&size) = split.sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(LayoutError::InvalidSize { id: split.id, size });
    }
    let sum: f64 = split.sizes.iter().sum();
    if (sum - 100.0).abs() > SIZE_EPSILON {
        return Err(LayoutError::SizeSum { id: split.id, sum });
    }
    for child in &split.children {
        validate_inner(child, seen)?;
    }
    Ok(())
}
