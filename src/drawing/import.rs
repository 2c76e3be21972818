//! SVG -> drawing tree, using usvg as the rendering front end.
//!
//! The produced tree mirrors what a vector renderer hands to a XAML writer:
//!
//! ```text
//! Group                       (root, no clip)
//! └── Group clip=0,0,w,h      (canvas)
//!     ├── Shape ...
//!     └── Group opacity=..    (nested svg groups)
//! ```
//!
//! Coordinates are flattened to absolute space, so no transform survives.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use usvg::tiny_skia_path::PathSegment as SkiaSegment;

use super::{
    DrawingNode, FillRule, Group, PathFigure, PathGeometry, PathSegment, Pen, Point, Rect, Shape,
    SolidBrush,
};
use crate::debug;

/// Read and import an SVG (or gzip-compressed SVGZ) file.
pub fn import_file(path: &Path) -> Result<DrawingNode> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    import_svg(&data).with_context(|| format!("Failed to convert {}", path.display()))
}

/// Import SVG content into a drawing tree.
pub fn import_svg(data: &[u8]) -> Result<DrawingNode> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())
        .context("Failed to parse SVG")?;

    let size = tree.size();
    let canvas = Group {
        clip: Some(Rect::new(
            0.0,
            0.0,
            f64::from(size.width()),
            f64::from(size.height()),
        )),
        children: convert_children(tree.root()),
        ..Default::default()
    };

    Ok(DrawingNode::Group(Group {
        children: vec![DrawingNode::Group(canvas)],
        ..Default::default()
    }))
}

fn convert_children(group: &usvg::Group) -> Vec<DrawingNode> {
    group.children().iter().filter_map(convert_node).collect()
}

fn convert_node(node: &usvg::Node) -> Option<DrawingNode> {
    match node {
        usvg::Node::Group(group) => {
            let children = convert_children(group);
            if children.is_empty() {
                return None;
            }
            let opacity = f64::from(group.opacity().get());
            Some(DrawingNode::Group(Group {
                opacity: (opacity < 1.0).then_some(opacity),
                children,
                ..Default::default()
            }))
        }
        usvg::Node::Path(path) => convert_path(path).map(DrawingNode::Shape),
        _ => {
            debug!("import"; "skipping unsupported node `{}`", node.id());
            None
        }
    }
}

fn convert_path(path: &usvg::Path) -> Option<Shape> {
    if !path.is_visible() {
        return None;
    }

    let fill = path.fill().and_then(|fill| {
        let brush = solid_brush(fill.paint(), fill.opacity().get());
        brush.map(|b| (b, fill.rule()))
    });
    let pen = path.stroke().and_then(|stroke| {
        solid_brush(stroke.paint(), stroke.opacity().get()).map(|brush| Pen {
            brush,
            thickness: f64::from(stroke.width().get()),
        })
    });
    if fill.is_none() && pen.is_none() {
        debug!("import"; "skipping path `{}` without solid paint", path.id());
        return None;
    }

    let data = path.data().clone().transform(path.abs_transform())?;
    let fill_rule = match fill.map(|(_, rule)| rule) {
        Some(usvg::FillRule::NonZero) => FillRule::Nonzero,
        _ => FillRule::EvenOdd,
    };

    Some(Shape {
        fill: fill.map(|(brush, _)| brush),
        pen,
        geometry: PathGeometry {
            fill_rule,
            figures: convert_figures(&data),
        },
    })
}

fn solid_brush(paint: &usvg::Paint, opacity: f32) -> Option<SolidBrush> {
    match paint {
        usvg::Paint::Color(c) => Some(SolidBrush {
            color: 0xFF00_0000
                | (u32::from(c.red) << 16)
                | (u32::from(c.green) << 8)
                | u32::from(c.blue),
            opacity: f64::from(opacity),
        }),
        _ => {
            debug!("import"; "gradient and pattern paints are not converted");
            None
        }
    }
}

fn convert_figures(data: &usvg::tiny_skia_path::Path) -> Vec<PathFigure> {
    let mut figures: Vec<PathFigure> = Vec::new();
    let point = |p: usvg::tiny_skia_path::Point| Point::new(f64::from(p.x), f64::from(p.y));

    for segment in data.segments() {
        match segment {
            SkiaSegment::MoveTo(p) => figures.push(PathFigure {
                start: point(p),
                ..Default::default()
            }),
            SkiaSegment::LineTo(p) => push_segment(&mut figures, PathSegment::Line(point(p))),
            SkiaSegment::QuadTo(c, p) => {
                push_segment(&mut figures, PathSegment::Quadratic(point(c), point(p)))
            }
            SkiaSegment::CubicTo(c1, c2, p) => push_segment(
                &mut figures,
                PathSegment::Cubic(point(c1), point(c2), point(p)),
            ),
            SkiaSegment::Close => {
                if let Some(figure) = figures.last_mut() {
                    figure.closed = true;
                }
            }
        }
    }
    figures
}

fn push_segment(figures: &mut Vec<PathFigure>, segment: PathSegment) {
    if figures.is_empty() {
        figures.push(PathFigure::default());
    }
    if let Some(figure) = figures.last_mut() {
        figure.segments.push(segment);
    }
}
