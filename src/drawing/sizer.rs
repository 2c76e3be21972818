//! Shape sizing.
//!
//! Path geometries are cropped to their own bounds when rendered, so an icon
//! drawn in the middle of a 512x512 canvas would lose its padding. Two empty
//! closed figures at the canvas corners force every geometry's bounding box
//! to cover the declared size.

use super::{DrawingNode, Group, PathFigure, Point};
use crate::debug;

/// Size declared by the first child group carrying a clip rectangle.
///
/// Returns `None` when there is no such group or the size is not positive.
pub fn canvas_size(group: &Group) -> Option<(f64, f64)> {
    let clip = group.children.iter().find_map(|child| match child {
        DrawingNode::Group(g) => g.clip,
        DrawingNode::Shape(_) => None,
    })?;
    (clip.width > 0.0 && clip.height > 0.0).then_some((clip.width, clip.height))
}

/// Prepend corner anchors at `(W,H)` and `(0,0)` to every path geometry.
///
/// Nodes without a usable canvas size are left untouched.
pub fn set_size_to_geometries(node: &mut DrawingNode) {
    let DrawingNode::Group(group) = &*node else {
        return;
    };
    let Some((width, height)) = canvas_size(group) else {
        debug!("size"; "no canvas clip, sizing skipped");
        return;
    };

    let geometries = node.geometries_mut();
    debug!("size"; "anchoring {} geometries to {}x{}", geometries.len(), width, height);
    for geometry in geometries {
        let anchors = [
            PathFigure::anchor(Point::new(width, height)),
            PathFigure::anchor(Point::new(0.0, 0.0)),
        ];
        geometry.figures.splice(0..0, anchors);
    }
}
