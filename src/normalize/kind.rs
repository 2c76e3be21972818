//! Resource kinds and their per-kind markup conventions.
//!
//! The consolidator never branches on the kind; everything kind specific
//! (element tag, namespace, key suffix, value comparison, proxy shape) is
//! looked up in [`KindSpec`].

use std::fmt;
use std::str::FromStr;

use super::NormalizeError;
use super::naming::{binding_ref, dynamic_ref};
use crate::markup::{Element, KEY_ATTR, NS_PRESENTATION, NS_SYSTEM};

/// Kind of a consolidated style resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Color,
    Brush,
    Opacity,
}

/// Static description of one [`ResourceKind`].
pub struct KindSpec {
    /// Suffix used in symbolic keys (`DocColor1`, `IconBrush`).
    pub key_name: &'static str,
    /// Qualified element tag of a global entry.
    pub tag: &'static str,
    /// Namespace the tag lives in.
    pub namespace: &'static str,
    /// Whether shapes reference a local proxy instead of the global entry.
    pub local_proxy: bool,
    /// Build the local proxy entry `(local_key, global_key)`.
    pub proxy: fn(&str, &str) -> Element,
}

static COLOR: KindSpec = KindSpec {
    key_name: "Color",
    tag: "Color",
    namespace: NS_PRESENTATION,
    local_proxy: false,
    proxy: alias_proxy,
};

static BRUSH: KindSpec = KindSpec {
    key_name: "Brush",
    tag: "SolidColorBrush",
    namespace: NS_PRESENTATION,
    local_proxy: true,
    proxy: brush_proxy,
};

static OPACITY: KindSpec = KindSpec {
    key_name: "Opacity",
    tag: "sys:Double",
    namespace: NS_SYSTEM,
    local_proxy: false,
    proxy: alias_proxy,
};

impl ResourceKind {
    /// Allocation and insertion order.
    pub const ALL: [ResourceKind; 3] = [Self::Color, Self::Brush, Self::Opacity];

    pub fn spec(self) -> &'static KindSpec {
        match self {
            Self::Color => &COLOR,
            Self::Brush => &BRUSH,
            Self::Opacity => &OPACITY,
        }
    }

    pub fn key_name(self) -> &'static str {
        self.spec().key_name
    }

    /// Compare two literal values of this kind.
    ///
    /// Colors ignore ASCII case; opacities compare by parsed value.
    pub fn same_value(self, a: &str, b: &str) -> bool {
        match self {
            Self::Color | Self::Brush => a.eq_ignore_ascii_case(b),
            Self::Opacity => match (parse_opacity(a), parse_opacity(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    /// Build the global entry for `value` under `key`.
    ///
    /// Brush entries point at the color entry `color_key` for the same value.
    pub fn global_element(self, key: &str, value: &str, color_key: &str) -> Element {
        let spec = self.spec();
        let element = Element::new(spec.tag).with_attr(KEY_ATTR, key);
        match self {
            Self::Color | Self::Opacity => element.with_text(value),
            Self::Brush => element.with_attr("Color", dynamic_ref(color_key)),
        }
    }

    /// Build the local proxy entry aliasing `global_key`.
    pub fn proxy_element(self, local_key: &str, global_key: &str) -> Element {
        (self.spec().proxy)(local_key, global_key)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_name())
    }
}

impl FromStr for ResourceKind {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" => Ok(Self::Color),
            "brush" => Ok(Self::Brush),
            "opacity" => Ok(Self::Opacity),
            _ => Err(NormalizeError::UnsupportedKind(s.to_string())),
        }
    }
}

/// Parse an opacity literal. Returns `None` for references and garbage.
pub fn parse_opacity(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Color/opacity proxy: a dynamic-resource alias of the global entry.
fn alias_proxy(local_key: &str, global_key: &str) -> Element {
    Element::new("DynamicResourceExtension")
        .with_attr(KEY_ATTR, local_key)
        .with_attr("ResourceKey", global_key)
}

/// Brush proxy: binds its color to the global brush, keeping
/// Color -> Brush -> local Brush indirection.
fn brush_proxy(local_key: &str, global_key: &str) -> Element {
    Element::new(BRUSH.tag)
        .with_attr(KEY_ATTR, local_key)
        .with_attr("Color", binding_ref(global_key))
}
