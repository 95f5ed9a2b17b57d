// ABOUTME: Pointer-driven resize gesture for split handles.
// ABOUTME: Idle/Dragging state machine that applies sizes from the start snapshot.

use crate::tree::{Direction, LayoutTree, Node, NodeId};

/// Pointer position in container pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of the workspace container in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Cursor to show while a drag is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeCursor {
    ColResize,
    RowResize,
}

/// Snapshot taken at pointer-down
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub split: NodeId,
    pub handle: usize,
    pub direction: Direction,
    pub origin: PointerPosition,
    pub start_sizes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragController {
    #[default]
    Idle,
    Dragging(DragState),
}

impl DragController {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragController::Dragging(_))
    }

    pub fn state(&self) -> Option<&DragState> {
        match self {
            DragController::Dragging(state) => Some(state),
            DragController::Idle => None,
        }
    }

    pub fn cursor(&self) -> Option<ResizeCursor> {
        self.state().map(|state| match state.direction {
            Direction::Horizontal => ResizeCursor::ColResize,
            Direction::Vertical => ResizeCursor::RowResize,
        })
    }

    /// Start dragging `handle` of `split`. Returns false if already dragging
    /// or the handle does not exist.
    pub fn pointer_down(
        &mut self,
        tree: &LayoutTree,
        split: NodeId,
        handle: usize,
        at: PointerPosition,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(node) = tree.find(split).and_then(Node::as_split) else {
            return false;
        };
        if handle.checked_add(1).is_none_or(|right| right >= node.sizes().len()) {
            return false;
        }
        tracing::debug!("Drag started on split {} handle {}", split, handle);
        *self = DragController::Dragging(DragState {
            split,
            handle,
            direction: node.direction(),
            origin: at,
            start_sizes: node.sizes().to_vec(),
        });
        true
    }

    /// Apply the cumulative pointer movement. Returns whether sizes changed.
    pub fn pointer_move(&self, tree: &mut LayoutTree, at: PointerPosition, container: Extent) -> bool {
        let DragController::Dragging(state) = self else {
            return false;
        };
        let Some(split) = tree.find(state.split).and_then(Node::as_split) else {
            return false;
        };
        let (moved, extent) = match split.direction() {
            Direction::Horizontal => (at.x - state.origin.x, container.width),
            Direction::Vertical => (at.y - state.origin.y, container.height),
        };
        if !(extent > 0.0) {
            return false;
        }
        let delta = moved / extent * 100.0;
        tree.resize_from(state.split, state.handle, &state.start_sizes, delta)
    }

    /// End the gesture. Returns whether a drag was active.
    pub fn pointer_up(&mut self) -> bool {
        match std::mem::take(self) {
            DragController::Dragging(state) => {
                tracing::debug!("Drag ended on split {}", state.split);
                true
            }
            DragController::Idle => false,
        }
    }
}
