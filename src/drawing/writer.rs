//! Drawing tree -> markup.
//!
//! Output follows what a generic object writer produces, property elements
//! and all, so the normalizer has something to simplify:
//!
//! ```xml
//! <DrawingGroup xmlns="..." xmlns:x="...">
//!   <DrawingGroup>
//!     <DrawingGroup.ClipGeometry>
//!       <RectangleGeometry Rect="0,0,16,16" />
//!     </DrawingGroup.ClipGeometry>
//!     <GeometryDrawing Brush="#FF112233">
//!       <GeometryDrawing.Geometry>
//!         <PathGeometry FillRule="Nonzero" Figures="M16,16z M0,0z M2,2 L6,2z" />
//!       </GeometryDrawing.Geometry>
//!     </GeometryDrawing>
//!   </DrawingGroup>
//! </DrawingGroup>
//! ```

use super::{DrawingNode, FillRule, Group, Pen, Shape, SolidBrush, fmt_num};
use crate::markup::{Document, Element, KEY_ATTR, NS_PRESENTATION, NS_XAML, NodeId};

/// Render a drawing as a standalone `DrawingGroup` document.
pub fn write_drawing_group(node: &DrawingNode) -> Document {
    let mut doc = Document::new(with_namespaces(Element::new("DrawingGroup")));
    let root = doc.root();
    fill_root_group(&mut doc, root, node);
    doc
}

/// Render a drawing wrapped in a `DrawingImage`.
pub fn write_drawing_image(node: &DrawingNode) -> Document {
    let mut doc = Document::new(with_namespaces(Element::new("DrawingImage")));
    let root = doc.root();
    let property = doc.add(Element::new("DrawingImage.Drawing"));
    doc.append(root, property);
    let group = doc.add(Element::new("DrawingGroup"));
    doc.append(property, group);
    fill_root_group(&mut doc, group, node);
    doc
}

/// Render keyed drawings as a `ResourceDictionary`.
///
/// Entries are written inside a `ResourceDictionary.Entries` wrapper and
/// each top-level group carries its `x:Key`.
pub fn write_dictionary(entries: &[DrawingNode]) -> Document {
    let mut doc = Document::new(with_namespaces(Element::new("ResourceDictionary")));
    let root = doc.root();
    let wrapper = doc.add(Element::new("ResourceDictionary.Entries"));
    doc.append(root, wrapper);
    for entry in entries {
        append_node(&mut doc, wrapper, entry);
    }
    doc
}

fn with_namespaces(element: Element) -> Element {
    element
        .with_attr("xmlns", NS_PRESENTATION)
        .with_attr("xmlns:x", NS_XAML)
}

/// Copy group attributes and children onto an existing element.
fn fill_root_group(doc: &mut Document, id: NodeId, node: &DrawingNode) {
    match node {
        DrawingNode::Group(group) => {
            doc.get_mut(id).attrs.extend(group_element(group).attrs);
            append_group_children(doc, id, group);
        }
        DrawingNode::Shape(shape) => append_shape(doc, id, shape),
    }
}

fn append_node(doc: &mut Document, parent: NodeId, node: &DrawingNode) {
    match node {
        DrawingNode::Group(group) => {
            let id = child(doc, parent, group_element(group));
            append_group_children(doc, id, group);
        }
        DrawingNode::Shape(shape) => append_shape(doc, parent, shape),
    }
}

fn group_element(group: &Group) -> Element {
    let mut element = Element::new("DrawingGroup");
    if let Some(key) = &group.key {
        element = element.with_attr(KEY_ATTR, key.as_str());
    }
    if let Some(opacity) = group.opacity {
        element = element.with_attr("Opacity", fmt_num(opacity));
    }
    element
}

fn append_group_children(doc: &mut Document, id: NodeId, group: &Group) {
    if let Some(clip) = group.clip {
        let rect = format!(
            "{},{},{},{}",
            fmt_num(clip.x),
            fmt_num(clip.y),
            fmt_num(clip.width),
            fmt_num(clip.height)
        );
        let property = child(doc, id, Element::new("DrawingGroup.ClipGeometry"));
        child(
            doc,
            property,
            Element::new("RectangleGeometry").with_attr("Rect", rect),
        );
    }
    for node in &group.children {
        append_node(doc, id, node);
    }
}

fn append_shape(doc: &mut Document, parent: NodeId, shape: &Shape) {
    let mut element = Element::new("GeometryDrawing");
    let inline_fill = shape.fill.filter(|f| f.opacity >= 1.0);
    if let Some(fill) = inline_fill {
        element = element.with_attr("Brush", fill.hex());
    }
    let id = child(doc, parent, element);

    if let Some(fill) = shape.fill.filter(|_| inline_fill.is_none()) {
        let property = child(doc, id, Element::new("GeometryDrawing.Brush"));
        child(doc, property, brush_element(fill));
    }
    if let Some(pen) = shape.pen {
        let property = child(doc, id, Element::new("GeometryDrawing.Pen"));
        append_pen(doc, property, pen);
    }

    let geometry = &shape.geometry;
    let mut path = Element::new("PathGeometry");
    if geometry.fill_rule == FillRule::Nonzero {
        path = path.with_attr("FillRule", geometry.fill_rule.as_str());
    }
    path = path.with_attr("Figures", geometry.figures_string());
    let property = child(doc, id, Element::new("GeometryDrawing.Geometry"));
    child(doc, property, path);
}

fn append_pen(doc: &mut Document, parent: NodeId, pen: Pen) {
    let mut element = Element::new("Pen");
    if pen.brush.opacity >= 1.0 {
        element = element.with_attr("Brush", pen.brush.hex());
    }
    element = element.with_attr("Thickness", fmt_num(pen.thickness));
    let id = child(doc, parent, element);
    if pen.brush.opacity < 1.0 {
        let property = child(doc, id, Element::new("Pen.Brush"));
        child(doc, property, brush_element(pen.brush));
    }
}

fn brush_element(brush: SolidBrush) -> Element {
    Element::new("SolidColorBrush")
        .with_attr("Color", brush.hex())
        .with_attr("Opacity", fmt_num(brush.opacity))
}

fn child(doc: &mut Document, parent: NodeId, element: Element) -> NodeId {
    let id = doc.add(element);
    doc.append(parent, id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{PathFigure, PathGeometry, PathSegment, Point, Rect};

    fn shape(fill: Option<SolidBrush>, pen: Option<Pen>) -> DrawingNode {
        DrawingNode::Shape(Shape {
            fill,
            pen,
            geometry: PathGeometry {
                fill_rule: FillRule::Nonzero,
                figures: vec![PathFigure {
                    start: Point::new(0.0, 0.0),
                    segments: vec![PathSegment::Line(Point::new(4.0, 4.0))],
                    closed: true,
                }],
            },
        })
    }

    fn icon(key: Option<&str>, child: DrawingNode) -> DrawingNode {
        DrawingNode::Group(Group {
            key: key.map(str::to_string),
            children: vec![DrawingNode::Group(Group {
                clip: Some(Rect::new(0.0, 0.0, 16.0, 16.0)),
                children: vec![child],
                ..Default::default()
            })],
            ..Default::default()
        })
    }

    #[test]
    fn test_write_drawing_group_layout() {
        let node = icon(None, shape(Some(SolidBrush::opaque(0xFF112233)), None));
        let doc = write_drawing_group(&node);
        let root = doc.get(doc.root());
        assert_eq!(root.name, "DrawingGroup");
        assert_eq!(root.attr("xmlns"), Some(NS_PRESENTATION));

        let names: Vec<_> = doc
            .descendants(doc.root())
            .into_iter()
            .map(|id| doc.get(id).name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "DrawingGroup",
                "DrawingGroup.ClipGeometry",
                "RectangleGeometry",
                "GeometryDrawing",
                "GeometryDrawing.Geometry",
                "PathGeometry",
            ]
        );

        let rect = doc.descendants(doc.root())[2];
        assert_eq!(doc.get(rect).attr("Rect"), Some("0,0,16,16"));
        let drawing = doc.descendants(doc.root())[3];
        assert_eq!(doc.get(drawing).attr("Brush"), Some("#FF112233"));
        let path = doc.descendants(doc.root())[5];
        assert_eq!(doc.get(path).attr("FillRule"), Some("Nonzero"));
        assert_eq!(doc.get(path).attr("Figures"), Some("M0,0 L4,4z"));
    }

    #[test]
    fn test_translucent_fill_and_pen_use_brush_elements() {
        let fill = SolidBrush {
            color: 0xFF00FF00,
            opacity: 0.5,
        };
        let pen = Pen {
            brush: SolidBrush::opaque(0xFFFF0000),
            thickness: 2.0,
        };
        let doc = write_drawing_group(&icon(None, shape(Some(fill), Some(pen))));

        let brush = doc
            .descendants(doc.root())
            .into_iter()
            .find(|&id| doc.get(id).name == "SolidColorBrush")
            .unwrap();
        assert_eq!(doc.get(brush).attr("Color"), Some("#FF00FF00"));
        assert_eq!(doc.get(brush).attr("Opacity"), Some("0.5"));

        let pen = doc
            .descendants(doc.root())
            .into_iter()
            .find(|&id| doc.get(id).name == "Pen")
            .unwrap();
        assert_eq!(doc.get(pen).attr("Brush"), Some("#FFFF0000"));
        assert_eq!(doc.get(pen).attr("Thickness"), Some("2"));
    }

    #[test]
    fn test_write_drawing_image_wraps_group() {
        let doc = write_drawing_image(&icon(None, shape(None, None)));
        let root = doc.root();
        assert_eq!(doc.get(root).name, "DrawingImage");
        let property = doc.children(root)[0];
        assert_eq!(doc.get(property).name, "DrawingImage.Drawing");
        let group = doc.children(property)[0];
        assert_eq!(doc.get(group).name, "DrawingGroup");
    }

    #[test]
    fn test_write_dictionary_keys_entries() {
        let entries = [
            icon(Some("aDrawingGroup"), shape(None, None)),
            icon(Some("bDrawingGroup"), shape(None, None)),
        ];
        let doc = write_dictionary(&entries);
        let wrapper = doc.children(doc.root())[0];
        assert_eq!(doc.get(wrapper).name, "ResourceDictionary.Entries");
        let keys: Vec<_> = doc
            .children(wrapper)
            .iter()
            .filter_map(|&id| doc.key(id))
            .collect();
        assert_eq!(keys, ["aDrawingGroup", "bDrawingGroup"]);
        assert_eq!(doc.get(doc.children(wrapper)[0]).attrs[0].name, KEY_ATTR);
    }
}
