//! Property-based invariant tests for the pane layout tree.
//!
//! 1. Every split keeps >= 2 children, matching sizes summing to 100
//! 2. Node ids stay unique across arbitrary operation sequences
//! 3. Splitting a pane and closing the new pane restores the tree
//! 4. Resizing by d then -d round-trips when nothing saturates
//! 5. Sizes never leave [min, max] through resizing

use desk_core::ContentType;
use desk_layout::{Direction, LayoutTree, Node, NodeId, SIZE_EPSILON};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Split(usize, bool),
    Close(usize),
    SetContent(usize, usize),
    Resize(usize, usize, f64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..64, any::<bool>()).prop_map(|(i, v)| Op::Split(i, v)),
        2 => (0usize..64).prop_map(Op::Close),
        1 => (0usize..64, 0usize..6).prop_map(|(i, c)| Op::SetContent(i, c)),
        3 => (0usize..64, 0usize..4, -120.0f64..120.0).prop_map(|(s, h, d)| Op::Resize(s, h, d)),
    ]
}

fn split_ids(node: &Node, out: &mut Vec<NodeId>) {
    if let Node::Split(split) = node {
        out.push(split.id());
        for child in split.children() {
            split_ids(child, out);
        }
    }
}

fn splits(tree: &LayoutTree) -> Vec<NodeId> {
    let mut out = Vec::new();
    split_ids(tree.root(), &mut out);
    out
}

fn apply(tree: &mut LayoutTree, op: &Op) {
    match op {
        Op::Split(i, vertical) => {
            let panes = tree.panes();
            let target = panes[i % panes.len()];
            let direction = if *vertical {
                Direction::Vertical
            } else {
                Direction::Horizontal
            };
            tree.split_with(target, direction);
        }
        Op::Close(i) => {
            let panes = tree.panes();
            tree.close(panes[i % panes.len()]);
        }
        Op::SetContent(i, c) => {
            let panes = tree.panes();
            tree.set_content(panes[i % panes.len()], ContentType::all()[*c]);
        }
        Op::Resize(s, handle, delta) => {
            let splits = splits(tree);
            if !splits.is_empty() {
                tree.resize(splits[s % splits.len()], *handle, *delta);
            }
        }
    }
}

fn build(ops: &[Op]) -> LayoutTree {
    let mut tree = LayoutTree::new();
    for op in ops {
        apply(&mut tree, op);
    }
    tree
}

fn all_ids(node: &Node, out: &mut Vec<NodeId>) {
    out.push(node.id());
    if let Node::Split(split) = node {
        for child in split.children() {
            all_ids(child, out);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1-2. Structural invariants survive any sequence
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_any_sequence(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut tree = LayoutTree::new();
        for op in &ops {
            apply(&mut tree, op);
            prop_assert!(tree.validate().is_ok(), "invalid after {:?}: {:?}", op, tree.validate());
        }
        for id in splits(&tree) {
            let split = tree.find(id).and_then(Node::as_split).unwrap();
            prop_assert_eq!(split.children().len(), split.sizes().len());
            prop_assert!(split.children().len() >= 2);
            let sum: f64 = split.sizes().iter().sum();
            prop_assert!((sum - 100.0).abs() <= SIZE_EPSILON);
        }
    }

    #[test]
    fn ids_are_unique(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let tree = build(&ops);
        let mut ids = Vec::new();
        all_ids(tree.root(), &mut ids);
        let count = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Split followed by closing the new pane is an identity
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn split_then_close_new_pane_restores(
        ops in prop::collection::vec(op_strategy(), 0..40),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = build(&ops);
        let before = tree.snapshot();
        let panes = tree.panes();
        let target = panes[pick.index(panes.len())];

        let new_pane = tree.split(target).unwrap();
        prop_assert!(tree.close(new_pane));
        prop_assert_eq!(tree.root(), before.as_ref());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4-5. Resize behavior
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resize_round_trips_without_saturation(delta in -39.0f64..39.0) {
        let mut tree = LayoutTree::new();
        tree.split(NodeId(0)).unwrap();
        let split = tree.root().id();

        prop_assert!(tree.resize(split, 0, delta));
        prop_assert!(tree.resize(split, 0, -delta));
        let sizes = tree.root().as_split().unwrap().sizes().to_vec();
        prop_assert!((sizes[0] - 50.0).abs() < 1e-9);
        prop_assert!((sizes[1] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn resize_stays_within_limits(
        ops in prop::collection::vec(op_strategy(), 0..40),
        deltas in prop::collection::vec(-150.0f64..150.0, 1..10),
    ) {
        let mut tree = build(&ops);
        tree.split(tree.panes()[0]).unwrap();
        let limits = tree.limits();
        for delta in deltas {
            for id in splits(&tree) {
                tree.resize(id, 0, delta);
                let split = tree.find(id).and_then(Node::as_split).unwrap();
                let sizes = split.sizes();
                prop_assert!(sizes[0] >= limits.min() - SIZE_EPSILON);
                prop_assert!(sizes[0] <= limits.max() + SIZE_EPSILON);
                prop_assert!(sizes[1] >= limits.min() - SIZE_EPSILON);
            }
        }
    }

    #[test]
    fn closing_sole_pane_is_noop(content in 0usize..6) {
        let mut tree = LayoutTree::new();
        tree.set_content(NodeId(0), ContentType::all()[content]);
        let before = tree.snapshot();
        prop_assert!(!tree.close(NodeId(0)));
        prop_assert_eq!(tree.root(), before.as_ref());
    }
}
