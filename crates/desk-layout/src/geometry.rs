// ABOUTME: Resolves the pane tree into normalized rectangles.
// ABOUTME: Provides pane areas for rendering and handle areas for hit testing.

use std::collections::HashMap;

use crate::tree::{Direction, LayoutTree, Node, NodeId};

/// Rectangle in normalized coordinates (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn full() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Draggable boundary between children `index` and `index + 1` of `split`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleRect {
    pub split: NodeId,
    pub index: usize,
    pub direction: Direction,
    pub rect: Rect,
}

impl LayoutTree {
    /// Get all panes with their layout rectangles
    pub fn pane_rects(&self) -> HashMap<NodeId, Rect> {
        let mut result = HashMap::new();
        collect_rects(self.root(), Rect::full(), &mut result);
        result
    }

    /// Resize handles centred on each boundary, `thickness` wide
    pub fn handle_rects(&self, thickness: f32) -> Vec<HandleRect> {
        let mut result = Vec::new();
        collect_handles(self.root(), Rect::full(), thickness, &mut result);
        result
    }

    /// Innermost handle under the point, if any
    pub fn handle_at(&self, x: f32, y: f32, thickness: f32) -> Option<HandleRect> {
        self.handle_rects(thickness)
            .into_iter()
            .rev()
            .find(|h| h.rect.contains(x, y))
    }
}

/// Child rectangles of a split, in child order
fn child_rects(direction: Direction, sizes: &[f64], rect: Rect) -> Vec<Rect> {
    let mut offset = 0.0f32;
    sizes
        .iter()
        .map(|size| {
            let fraction = (*size / 100.0) as f32;
            let child = match direction {
                Direction::Horizontal => Rect {
                    x: rect.x + rect.width * offset,
                    y: rect.y,
                    width: rect.width * fraction,
                    height: rect.height,
                },
                Direction::Vertical => Rect {
                    x: rect.x,
                    y: rect.y + rect.height * offset,
                    width: rect.width,
                    height: rect.height * fraction,
                },
            };
            offset += fraction;
            child
        })
        .collect()
}

fn collect_rects(node: &Node, rect: Rect, out: &mut HashMap<NodeId, Rect>) {
    match node {
        Node::Pane(pane) => {
            out.insert(pane.id, rect);
        }
        Node::Split(split) => {
            let rects = child_rects(split.direction(), split.sizes(), rect);
            for (child, child_rect) in split.children().iter().zip(rects) {
                collect_rects(child, child_rect, out);
            }
        }
    }
}

fn collect_handles(node: &Node, rect: Rect, thickness: f32, out: &mut Vec<HandleRect>) {
    let Node::Split(split) = node else {
        return;
    };
    let rects = child_rects(split.direction(), split.sizes(), rect);
    let half = thickness / 2.0;
    for (index, pair) in rects.windows(2).enumerate() {
        let boundary = match split.direction() {
            Direction::Horizontal => Rect {
                x: pair[1].x - half,
                y: rect.y,
                width: thickness,
                height: rect.height,
            },
            Direction::Vertical => Rect {
                x: rect.x,
                y: pair[1].y - half,
                width: rect.width,
                height: thickness,
            },
        };
        out.push(HandleRect {
            split: split.id(),
            index,
            direction: split.direction(),
            rect: boundary,
        });
    }
    for (child, child_rect) in split.children().iter().zip(rects) {
        collect_handles(child, child_rect, thickness, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{SizeLimits, Split};
    use desk_core::ContentType;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn split_gives_equal_space() {
        let mut tree = LayoutTree::new();
        let first = NodeId(0);
        let second = tree.split(first).unwrap();

        let rects = tree.pane_rects();
        let first_rect = rects.get(&first).unwrap();
        let second_rect = rects.get(&second).unwrap();

        assert!(approx(first_rect.width, 0.5));
        assert!(approx(second_rect.width, 0.5));
        assert!(approx(second_rect.x, 0.5));
        assert!(approx(second_rect.height, 1.0));
    }

    #[test]
    fn nested_vertical_split_stacks_children() {
        let root = Node::Split(Split::new(
            NodeId(9),
            Direction::Horizontal,
            vec![
                Node::pane(NodeId(1), ContentType::Explorer),
                Node::Split(Split::new(
                    NodeId(8),
                    Direction::Vertical,
                    vec![
                        Node::pane(NodeId(2), ContentType::Editor),
                        Node::pane(NodeId(3), ContentType::Terminal),
                    ],
                    vec![75.0, 25.0],
                )),
            ],
            vec![20.0, 80.0],
        ));
        let tree = LayoutTree::from_root(root, SizeLimits::default()).unwrap();
        let rects = tree.pane_rects();

        let terminal = rects[&NodeId(3)];
        assert!(approx(terminal.x, 0.2));
        assert!(approx(terminal.y, 0.75));
        assert!(approx(terminal.width, 0.8));
        assert!(approx(terminal.height, 0.25));
    }

    #[test]
    fn handles_sit_on_boundaries() {
        let mut tree = LayoutTree::new();
        let second = tree.split(NodeId(0)).unwrap();
        tree.split_with(second, Direction::Vertical).unwrap();

        let handles = tree.handle_rects(0.02);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].split, tree.root().id());
        assert!(approx(handles[0].rect.x, 0.49));

        let inner = tree.handle_at(0.75, 0.5, 0.02).unwrap();
        assert_eq!(inner.direction, Direction::Vertical);
        assert_eq!(inner.index, 0);

        assert!(tree.handle_at(0.25, 0.25, 0.02).is_none());
    }
}
