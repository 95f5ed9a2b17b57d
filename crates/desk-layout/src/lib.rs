// ABOUTME: Pane layout management for the project workspace.
// ABOUTME: Implements the split-pane tree, its geometry, and drag resizing.

mod drag;
mod geometry;
mod tree;

pub use drag::{DragController, DragState, Extent, PointerPosition, ResizeCursor};
pub use geometry::{HandleRect, Rect};
pub use tree::{Direction, LayoutError, LayoutTree, Node, NodeId, Pane, SizeLimits, Split, SIZE_EPSILON};
