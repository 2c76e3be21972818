//! Resource collector: literal style values below a scope element.
//!
//! | kind    | element           | attribute                  | literal when      |
//! |---------|-------------------|----------------------------|-------------------|
//! | Brush   | any               | `Brush`, `ForegroundBrush` | starts with `#`   |
//! | Color   | `SolidColorBrush` | `Color`                    | starts with `#`   |
//! | Opacity | `SolidColorBrush` | `Opacity`                  | a number, not `1` |

use super::kind::{ResourceKind, parse_opacity};
use crate::markup::{Document, NodeId, local_name};

const SOLID_COLOR_BRUSH: &str = "SolidColorBrush";

/// One literal attribute found by the collector.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub element: NodeId,
    pub attribute: String,
    pub value: String,
}

/// Literal attributes of `kind` below `scope`, in document order.
pub fn collect_attributes(doc: &Document, scope: NodeId, kind: ResourceKind) -> Vec<Occurrence> {
    let mut out = Vec::new();
    for id in doc.descendants(scope) {
        let element = doc.get(id);
        let is_brush_element = element.local_name() == SOLID_COLOR_BRUSH;
        for attr in &element.attrs {
            let name = local_name(&attr.name);
            let matched = match kind {
                ResourceKind::Brush => {
                    (name == "Brush" || name == "ForegroundBrush") && attr.value.starts_with('#')
                }
                ResourceKind::Color => {
                    is_brush_element && name == "Color" && attr.value.starts_with('#')
                }
                ResourceKind::Opacity => {
                    is_brush_element
                        && name == "Opacity"
                        && parse_opacity(&attr.value).is_some_and(|v| v != 1.0)
                }
            };
            if matched {
                out.push(Occurrence {
                    element: id,
                    attribute: attr.name.clone(),
                    value: attr.value.clone(),
                });
            }
        }
    }
    out
}

/// Deduplicate `values` the way `kind` compares them, keeping first
/// occurrences in order. Opacities are normalized to their shortest form.
pub fn distinct_values<'a>(
    kind: ResourceKind,
    values: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if out.iter().any(|seen| kind.same_value(seen, value)) {
            continue;
        }
        let value = match kind {
            ResourceKind::Opacity => match parse_opacity(value) {
                Some(v) => v.to_string(),
                None => continue,
            },
            ResourceKind::Color | ResourceKind::Brush => value.to_string(),
        };
        out.push(value);
    }
    out
}

/// Document-wide distinct values per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistinctResources {
    pub colors: Vec<String>,
    pub brushes: Vec<String>,
    pub opacities: Vec<String>,
}

impl DistinctResources {
    /// Collect below `scope`. Colors are the union of brush values and
    /// standalone brush colors.
    pub fn collect(doc: &Document, scope: NodeId) -> Self {
        let values = |kind| {
            collect_attributes(doc, scope, kind)
                .into_iter()
                .map(|o| o.value)
                .collect::<Vec<_>>()
        };
        let brush_values = values(ResourceKind::Brush);
        let color_values = values(ResourceKind::Color);
        let opacity_values = values(ResourceKind::Opacity);

        let brushes = distinct_values(ResourceKind::Brush, brush_values.iter().map(String::as_str));
        let colors = distinct_values(
            ResourceKind::Color,
            brush_values.iter().chain(&color_values).map(String::as_str),
        );
        let opacities =
            distinct_values(ResourceKind::Opacity, opacity_values.iter().map(String::as_str));

        Self {
            colors,
            brushes,
            opacities,
        }
    }

    pub fn values(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Color => &self.colors,
            ResourceKind::Brush => &self.brushes,
            ResourceKind::Opacity => &self.opacities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    const GROUP: &str = r##"<ResourceDictionary>
  <DrawingGroup x:Key="aDrawingGroup">
    <GeometryDrawing Brush="#FF000000" Geometry="F1 M0,0z" />
    <GeometryDrawing Brush="#ff000000" Geometry="F1 M1,1z" />
    <GeometryDrawing Brush="{DynamicResource Other}" Geometry="F1 M2,2z" />
    <GeometryDrawing Geometry="F1 M3,3z">
      <GeometryDrawing.Brush>
        <SolidColorBrush Color="#FF00FF00" Opacity="0.50" />
      </GeometryDrawing.Brush>
      <GeometryDrawing.Pen>
        <Pen Brush="#FFFF0000" Thickness="1">
          <Pen.Brush>
            <SolidColorBrush Color="#FF000000" Opacity="1" />
          </Pen.Brush>
        </Pen>
      </GeometryDrawing.Pen>
    </GeometryDrawing>
    <GeometryDrawing Geometry="F1 M4,4z">
      <GeometryDrawing.Brush>
        <SolidColorBrush Color="#FF00FF00" Opacity="0.5" />
      </GeometryDrawing.Brush>
    </GeometryDrawing>
  </DrawingGroup>
</ResourceDictionary>"##;

    #[test]
    fn test_collect_brush_attributes() {
        let doc = markup::parse(GROUP).unwrap();
        let found = collect_attributes(&doc, doc.root(), ResourceKind::Brush);
        let values: Vec<_> = found.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["#FF000000", "#ff000000", "#FFFF0000"]);
        assert!(found.iter().all(|o| o.attribute == "Brush"));
    }

    #[test]
    fn test_collect_standalone_colors_and_opacities() {
        let doc = markup::parse(GROUP).unwrap();
        let colors = collect_attributes(&doc, doc.root(), ResourceKind::Color);
        assert_eq!(colors.len(), 3);

        let opacities = collect_attributes(&doc, doc.root(), ResourceKind::Opacity);
        let values: Vec<_> = opacities.iter().map(|o| o.value.as_str()).collect();
        // the neutral opacity is not a resource
        assert_eq!(values, ["0.50", "0.5"]);
    }

    #[test]
    fn test_distinct_resources() {
        let doc = markup::parse(GROUP).unwrap();
        let distinct = DistinctResources::collect(&doc, doc.root());
        assert_eq!(distinct.brushes, ["#FF000000", "#FFFF0000"]);
        assert_eq!(distinct.colors, ["#FF000000", "#FFFF0000", "#FF00FF00"]);
        assert_eq!(distinct.opacities, ["0.5"]);
        assert_eq!(distinct.values(ResourceKind::Brush).len(), 2);
    }

    #[test]
    fn test_distinct_values_keeps_first_spelling() {
        let values = distinct_values(ResourceKind::Color, ["#ffaabbcc", "#FFAABBCC", "#FF000000"]);
        assert_eq!(values, ["#ffaabbcc", "#FF000000"]);

        let opacities = distinct_values(ResourceKind::Opacity, ["0.25", "0.250", "0.7"]);
        assert_eq!(opacities, ["0.25", "0.7"]);
    }
}
