//! Tree simplifier.
//!
//! Four passes, run in order on one drawing element and its descendants:
//!
//! 1. clip inlining: `DrawingGroup.ClipGeometry` property -> `ClipGeometry` attribute
//! 2. cascade collapsing: a group whose only child is a group absorbs it
//! 3. path flattening: `GeometryDrawing.Geometry` property -> `Geometry` attribute
//! 4. identity key: `x:Key` inserted as the first attribute

use rustc_hash::FxHashSet;

use crate::debug;
use crate::drawing::{Rect, fmt_num};
use crate::markup::{Attr, Document, KEY_ATTR, NodeId, local_name};

const GROUP: &str = "DrawingGroup";
const CLIP_PROPERTY: &str = "DrawingGroup.ClipGeometry";
const GEOMETRY_DRAWING: &str = "GeometryDrawing";
const PATH_GEOMETRY: &str = "PathGeometry";

/// Run every simplification pass on `element`.
///
/// `name` becomes the identity key of `element` when it is not blank.
pub fn beautify(doc: &mut Document, element: NodeId, name: Option<&str>) {
    inline_clipping(doc, element);
    collapse_cascaded_groups(doc, element);
    collapse_path_geometries(doc, element);
    if let Some(name) = name {
        set_identity_key(doc, element, name);
    }
}

/// Rectangle as a closed six-segment path.
pub fn clip_path(rect: &Rect) -> String {
    let (l, t) = (fmt_num(rect.x), fmt_num(rect.y));
    let (r, b) = (fmt_num(rect.right()), fmt_num(rect.bottom()));
    format!("M{l},{t} V{b} H{r} V{t} H{l} Z")
}

/// Replace the first clip property element under `element` by a
/// `ClipGeometry` attribute on its group.
///
/// Returns `false` when there is no clip or its rectangle is unreadable.
pub fn inline_clipping(doc: &mut Document, element: NodeId) -> bool {
    let Some(clip) = doc
        .descendants_and_self(element)
        .into_iter()
        .find(|&id| doc.get(id).name == CLIP_PROPERTY)
    else {
        return false;
    };

    let rect = doc
        .children_named(clip, "RectangleGeometry")
        .first()
        .and_then(|&r| doc.get(r).attr("Rect"))
        .and_then(Rect::parse);
    let Some(rect) = rect else {
        debug!("simplify"; "clip without a readable Rect, left in place");
        return false;
    };
    let Some(group) = doc.parent(clip).filter(|&p| doc.get(p).local_name() == GROUP) else {
        return false;
    };

    doc.get_mut(group).set_attr("ClipGeometry", clip_path(&rect));
    doc.detach(clip);
    true
}

/// Merge every group whose only child is a group with disjoint attribute
/// names. Runs each group to a fixed point, so a second call is a no-op.
///
/// Returns the number of merged groups.
pub fn collapse_cascaded_groups(doc: &mut Document, element: NodeId) -> usize {
    let groups: Vec<NodeId> = doc
        .descendants_and_self(element)
        .into_iter()
        .filter(|&id| doc.get(id).local_name() == GROUP)
        .collect();

    let mut merged = 0;
    for group in groups {
        while let Some(sub) = single_child_group(doc, group) {
            let names: FxHashSet<&str> =
                doc.get(group).attrs.iter().map(|a| a.name.as_str()).collect();
            if doc.get(sub).attrs.iter().any(|a| names.contains(a.name.as_str())) {
                debug!("simplify"; "attribute collision, nested group kept");
                break;
            }
            let attrs = std::mem::take(&mut doc.get_mut(sub).attrs);
            doc.get_mut(group).attrs.extend(attrs);
            doc.unwrap_into_parent(sub);
            merged += 1;
        }
    }
    merged
}

fn single_child_group(doc: &Document, group: NodeId) -> Option<NodeId> {
    match doc.children(group) {
        &[only] if doc.get(only).local_name() == GROUP => Some(only),
        _ => None,
    }
}

/// Fold simple path geometries into `Geometry="F1 ..."` attributes.
///
/// A `PathGeometry` qualifies when it carries `Figures` and at most a
/// `FillRule` besides. Returns the number of folded geometries.
pub fn collapse_path_geometries(doc: &mut Document, element: NodeId) -> usize {
    let paths: Vec<NodeId> = doc
        .descendants(element)
        .into_iter()
        .filter(|&id| doc.get(id).local_name() == PATH_GEOMETRY)
        .collect();

    let mut folded = 0;
    for path in paths {
        let Some(property) = doc.parent(path) else {
            continue;
        };
        let Some(drawing) = doc
            .parent(property)
            .filter(|&d| doc.get(d).local_name() == GEOMETRY_DRAWING)
        else {
            continue;
        };
        let Some(value) = flattened_geometry(&doc.get(path).attrs) else {
            continue;
        };
        doc.get_mut(drawing).set_attr("Geometry", value);
        doc.detach(property);
        folded += 1;
    }
    folded
}

fn flattened_geometry(attrs: &[Attr]) -> Option<String> {
    let find = |name: &str| {
        attrs
            .iter()
            .find(|a| local_name(&a.name) == name)
            .map(|a| a.value.as_str())
    };
    let figures = find("Figures")?;
    let fill_rule = find("FillRule");
    let expected = if fill_rule.is_some() { 2 } else { 1 };
    if attrs.len() != expected {
        return None;
    }
    Some(match fill_rule {
        Some("Nonzero") => format!("F1 {figures}"),
        Some(_) => format!("F0 {figures}"),
        None => figures.to_string(),
    })
}

/// Put `name` in front of the attributes of `element` as its `x:Key`.
pub fn set_identity_key(doc: &mut Document, element: NodeId, name: &str) {
    if name.trim().is_empty() {
        return;
    }
    let attrs = &mut doc.get_mut(element).attrs;
    attrs.retain(|a| a.name != KEY_ATTR);
    attrs.insert(0, Attr::new(KEY_ATTR, name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{self, Element};

    const ICON: &str = r##"<DrawingGroup xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation">
  <DrawingGroup>
    <DrawingGroup.ClipGeometry>
      <RectangleGeometry Rect="0,0,512,256" />
    </DrawingGroup.ClipGeometry>
    <GeometryDrawing Brush="#FF000000">
      <GeometryDrawing.Geometry>
        <PathGeometry FillRule="Nonzero" Figures="M512,256z M0,0z M4,4 L8,8z" />
      </GeometryDrawing.Geometry>
    </GeometryDrawing>
  </DrawingGroup>
</DrawingGroup>"##;

    fn names(doc: &Document) -> Vec<String> {
        doc.descendants_and_self(doc.root())
            .into_iter()
            .map(|id| doc.get(id).name.clone())
            .collect()
    }

    #[test]
    fn test_clip_path_format() {
        assert_eq!(
            clip_path(&Rect::new(0.0, 0.0, 40.0, 20.0)),
            "M0,0 V20 H40 V0 H0 Z"
        );
        assert_eq!(
            clip_path(&Rect::new(1.0, 2.0, 3.0, 4.0)),
            "M1,2 V6 H4 V2 H1 Z"
        );
    }

    #[test]
    fn test_beautify_icon() {
        let mut doc = markup::parse(ICON).unwrap();
        let root = doc.root();
        beautify(&mut doc, root, Some("iconDrawingGroup"));

        assert_eq!(names(&doc), ["DrawingGroup", "GeometryDrawing"]);
        let group = doc.get(root);
        assert_eq!(group.attrs[0].name, KEY_ATTR);
        assert_eq!(group.attrs[0].value, "iconDrawingGroup");
        assert_eq!(group.attr("ClipGeometry"), Some("M0,0 V256 H512 V0 H0 Z"));

        let drawing = doc.get(doc.children(root)[0]);
        assert_eq!(drawing.attr("Brush"), Some("#FF000000"));
        assert_eq!(
            drawing.attr("Geometry"),
            Some("F1 M512,256z M0,0z M4,4 L8,8z")
        );
    }

    #[test]
    fn test_unreadable_clip_is_kept() {
        let text = r#"<DrawingGroup><DrawingGroup.ClipGeometry><RectangleGeometry Rect="0,0" /></DrawingGroup.ClipGeometry></DrawingGroup>"#;
        let mut doc = markup::parse(text).unwrap();
        let root = doc.root();
        assert!(!inline_clipping(&mut doc, root));
        assert!(!doc.get(root).has_attr("ClipGeometry"));
        assert_eq!(doc.children(root).len(), 1);
    }

    #[test]
    fn test_cascade_merges_disjoint_attributes() {
        let mut doc = Document::new(Element::new(GROUP).with_attr("Opacity", "0.5"));
        let root = doc.root();
        let sub = doc.add(Element::new(GROUP).with_attr("ClipGeometry", "M0,0 V1 H1 V0 H0 Z"));
        doc.append(root, sub);
        let a = doc.add(Element::new(GEOMETRY_DRAWING));
        let b = doc.add(Element::new(GEOMETRY_DRAWING));
        doc.append(sub, a);
        doc.append(sub, b);

        assert_eq!(collapse_cascaded_groups(&mut doc, root), 1);
        assert_eq!(doc.children(root), &[a, b]);
        let attrs: Vec<_> = doc.get(root).attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(attrs, ["Opacity", "ClipGeometry"]);
    }

    #[test]
    fn test_cascade_skips_collision() {
        let mut doc = Document::new(Element::new(GROUP).with_attr("Opacity", "0.5"));
        let root = doc.root();
        let sub = doc.add(Element::new(GROUP).with_attr("Opacity", "0.2"));
        doc.append(root, sub);

        assert_eq!(collapse_cascaded_groups(&mut doc, root), 0);
        assert_eq!(doc.children(root), &[sub]);
        assert_eq!(doc.get(root).attr("Opacity"), Some("0.5"));
    }

    #[test]
    fn test_cascade_is_idempotent() {
        // root > a > b > c > shape, with a collision between a and b
        let mut doc = Document::new(Element::new(GROUP));
        let root = doc.root();
        let a = doc.add(Element::new(GROUP).with_attr("Opacity", "0.5"));
        let b = doc.add(Element::new(GROUP).with_attr("Opacity", "0.4"));
        let c = doc.add(Element::new(GROUP).with_attr("ClipGeometry", "M0,0 V1 H1 V0 H0 Z"));
        let shape = doc.add(Element::new(GEOMETRY_DRAWING));
        doc.append(root, a);
        doc.append(a, b);
        doc.append(b, c);
        doc.append(c, shape);

        collapse_cascaded_groups(&mut doc, root);
        let once = markup::write(&doc).unwrap();
        assert_eq!(collapse_cascaded_groups(&mut doc, root), 0);
        let twice = markup::write(&doc).unwrap();
        assert_eq!(once, twice);

        // no group is left with a single group child and disjoint attributes
        for id in doc.descendants_and_self(root) {
            if let Some(sub) = single_child_group(&doc, id) {
                let names: FxHashSet<&str> =
                    doc.get(id).attrs.iter().map(|a| a.name.as_str()).collect();
                assert!(doc.get(sub).attrs.iter().any(|a| names.contains(a.name.as_str())));
            }
        }
    }

    #[test]
    fn test_flattened_geometry_rules() {
        let even = [Attr::new("FillRule", "EvenOdd"), Attr::new("Figures", "M0,0z")];
        assert_eq!(flattened_geometry(&even).as_deref(), Some("F0 M0,0z"));

        let bare = [Attr::new("Figures", "M0,0z")];
        assert_eq!(flattened_geometry(&bare).as_deref(), Some("M0,0z"));

        let transformed = [Attr::new("Figures", "M0,0z"), Attr::new("Transform", "1,0,0,1,2,2")];
        assert_eq!(flattened_geometry(&transformed), None);

        let empty: [Attr; 0] = [];
        assert_eq!(flattened_geometry(&empty), None);
    }

    #[test]
    fn test_identity_key_goes_first() {
        let mut doc = Document::new(
            Element::new(GROUP)
                .with_attr("ClipGeometry", "M0,0 V1 H1 V0 H0 Z")
                .with_attr(KEY_ATTR, "old"),
        );
        let root = doc.root();
        set_identity_key(&mut doc, root, "newDrawingGroup");
        let attrs = &doc.get(root).attrs;
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].value, "newDrawingGroup");

        set_identity_key(&mut doc, root, "  ");
        assert_eq!(doc.key(root), Some("newDrawingGroup"));
    }
}
