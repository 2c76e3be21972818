//! Drawing-object tree.
//!
//! This is the in-memory form an SVG file is converted into before it is
//! written out as markup: groups with optional clip rectangles, and shapes
//! carrying a fill, an optional pen and a path geometry.
//!
//! # Architecture
//!
//! ```text
//! SVG bytes
//!     │
//!     ▼
//! ┌────────┐
//! │ import │ ──► usvg tree -> DrawingNode tree
//! └───┬────┘
//!     ▼
//! ┌───────┐
//! │ sizer │ ──► corner anchors so bounds match the canvas
//! └───┬───┘
//!     ▼
//! ┌────────┐
//! │ writer │ ──► markup::Document (XAML dialect)
//! └────────┘
//! ```

mod import;
mod sizer;
mod writer;

pub use import::import_file;
pub use sizer::set_size_to_geometries;
pub use writer::{write_dictionary, write_drawing_group, write_drawing_image};

use std::fmt::Write as _;

/// A point in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle (left, top, width, height).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Parse the `"x,y,width,height"` form used by `RectangleGeometry.Rect`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value
            .split([',', ' '])
            .filter(|s| !s.is_empty())
            .map(|s| s.trim().parse::<f64>().ok());
        let rect = Self::new(
            parts.next()??,
            parts.next()??,
            parts.next()??,
            parts.next()??,
        );
        parts.next().is_none().then_some(rect)
    }
}

/// Fill rule of a path geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    EvenOdd,
    Nonzero,
}

impl FillRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EvenOdd => "EvenOdd",
            Self::Nonzero => "Nonzero",
        }
    }
}

/// One segment of a figure; the start point is the previous segment's end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line(Point),
    Quadratic(Point, Point),
    Cubic(Point, Point, Point),
}

/// A connected run of segments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathFigure {
    pub start: Point,
    pub segments: Vec<PathSegment>,
    pub closed: bool,
}

impl PathFigure {
    /// A closed figure with no segments, used as a bounding-box anchor.
    pub fn anchor(at: Point) -> Self {
        Self {
            start: at,
            segments: Vec::new(),
            closed: true,
        }
    }
}

/// A path geometry: fill rule plus figures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    pub fill_rule: FillRule,
    pub figures: Vec<PathFigure>,
}

impl PathGeometry {
    /// Bounding box over every point, control points included.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.figures.iter().flat_map(|figure| {
            std::iter::once(figure.start).chain(figure.segments.iter().flat_map(|s| match *s {
                PathSegment::Line(p) => vec![p],
                PathSegment::Quadratic(c, p) => vec![c, p],
                PathSegment::Cubic(c1, c2, p) => vec![c1, c2, p],
            }))
        });
        let first = points.next()?;
        let (mut min, mut max) = (first, first);
        for p in points {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Figures in path mini-language: `M0,0 L4,4 C.. z`.
    pub fn figures_string(&self) -> String {
        let mut out = String::new();
        for figure in &self.figures {
            if !out.is_empty() {
                out.push(' ');
            }
            let _ = write!(out, "M{}", fmt_point(figure.start));
            for segment in &figure.segments {
                let _ = match *segment {
                    PathSegment::Line(p) => write!(out, " L{}", fmt_point(p)),
                    PathSegment::Quadratic(c, p) => {
                        write!(out, " Q{} {}", fmt_point(c), fmt_point(p))
                    }
                    PathSegment::Cubic(c1, c2, p) => write!(
                        out,
                        " C{} {} {}",
                        fmt_point(c1),
                        fmt_point(c2),
                        fmt_point(p)
                    ),
                };
            }
            if figure.closed {
                out.push('z');
            }
        }
        out
    }
}

/// A solid color brush. `color` is packed `0xAARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidBrush {
    pub color: u32,
    pub opacity: f64,
}

impl SolidBrush {
    pub fn opaque(color: u32) -> Self {
        Self {
            color,
            opacity: 1.0,
        }
    }

    /// `#AARRGGBB` literal.
    pub fn hex(&self) -> String {
        format!("#{:08X}", self.color)
    }
}

/// A stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub brush: SolidBrush,
    pub thickness: f64,
}

/// Leaf drawing: fill, pen and geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub fill: Option<SolidBrush>,
    pub pen: Option<Pen>,
    pub geometry: PathGeometry,
}

/// Container drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub key: Option<String>,
    pub clip: Option<Rect>,
    pub opacity: Option<f64>,
    pub children: Vec<DrawingNode>,
}

/// A node of the drawing tree. Each node is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingNode {
    Group(Group),
    Shape(Shape),
}

impl DrawingNode {
    /// Every path geometry in this subtree, in document order.
    pub fn geometries_mut(&mut self) -> Vec<&mut PathGeometry> {
        let mut out = Vec::new();
        collect_geometries(self, &mut out);
        out
    }
}

fn collect_geometries<'a>(node: &'a mut DrawingNode, out: &mut Vec<&'a mut PathGeometry>) {
    match node {
        DrawingNode::Group(group) => {
            for child in &mut group.children {
                collect_geometries(child, out);
            }
        }
        DrawingNode::Shape(shape) => out.push(&mut shape.geometry),
    }
}

/// Format a number with at most three decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

fn fmt_point(p: Point) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}
