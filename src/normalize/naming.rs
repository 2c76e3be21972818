//! Symbolic names: identifier validation, resource key derivation and the
//! per-document name registry.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::NormalizeError;
use super::kind::ResourceKind;

/// Runs of characters that are not allowed in a key.
static INVALID_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z]+").unwrap());

/// Make `raw` identifier safe.
///
/// Every maximal run of characters outside `[0-9a-zA-Z]` becomes
/// `replacement`; a leading digit gets a `_` prefix.
///
/// # Examples
///
/// - `validate_name("cloud-3 icon", "")` -> `"cloud3icon"`
/// - `validate_name("3d-view", "_")` -> `"_3d_view"`
pub fn validate_name(raw: &str, replacement: &str) -> String {
    let result = INVALID_RUN.replace_all(raw, regex::NoExpand(replacement));
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{result}")
    } else {
        result.into_owned()
    }
}

/// [`validate_name`] with the first character upper-cased.
pub fn normalize_container_name(name: &str, replacement: &str) -> String {
    let valid = validate_name(name, replacement);
    let mut chars = valid.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => valid,
    }
}

/// Suffix of every drawing-group key.
pub const DRAWING_GROUP_SUFFIX: &str = "DrawingGroup";

/// Identity key of the drawing group converted from the file `stem`.
pub fn drawing_group_key(stem: &str, replacement: &str) -> String {
    validate_name(&format!("{stem}{DRAWING_GROUP_SUFFIX}"), replacement)
}

/// Identity key of the drawing image converted from the file `stem`.
pub fn drawing_image_key(stem: &str, image_key: &str, replacement: &str) -> String {
    validate_name(&format!("{stem}{image_key}"), replacement)
}

/// Image name of a drawing group: its key without the `DrawingGroup` suffix.
pub fn image_name(group_key: &str) -> &str {
    group_key
        .strip_suffix(DRAWING_GROUP_SUFFIX)
        .filter(|name| !name.is_empty())
        .unwrap_or(group_key)
}

/// `"{DynamicResource key}"`
pub fn dynamic_ref(key: &str) -> String {
    format!("{{DynamicResource {key}}}")
}

/// `"{StaticResource key}"`
pub fn static_ref(key: &str) -> String {
    format!("{{StaticResource {key}}}")
}

/// `"{Binding Color, Source={StaticResource key}}"`
pub fn binding_ref(key: &str) -> String {
    format!("{{Binding Color, Source={{StaticResource {key}}}}}")
}

/// Key named by a symbolic reference, if `value` is one.
pub fn referenced_key(value: &str) -> Option<&str> {
    let value = value.trim();
    if let Some(rest) = value.strip_prefix("{Binding Color, Source={StaticResource ") {
        return rest.strip_suffix("}}").map(str::trim);
    }
    let inner = value.strip_prefix('{')?.strip_suffix('}')?;
    inner
        .strip_prefix("DynamicResource ")
        .or_else(|| inner.strip_prefix("StaticResource "))
        .map(str::trim)
}

/// Whether `value` is a symbolic reference rather than a literal.
pub fn is_reference(value: &str) -> bool {
    value.trim_start().starts_with('{')
}

/// Global keys of one literal value, one per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTriplet {
    pub color_key: String,
    pub brush_key: String,
    pub opacity_key: String,
    pub value: String,
}

impl KeyTriplet {
    pub fn key(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Color => &self.color_key,
            ResourceKind::Brush => &self.brush_key,
            ResourceKind::Opacity => &self.opacity_key,
        }
    }
}

/// Derive the global keys for the value at `ordinal` (0-based).
///
/// The numeric suffix is omitted when the value is the only one in scope,
/// otherwise it is `ordinal + 1`.
pub fn allocate_key_triplet(
    single_in_scope: bool,
    container: &str,
    ordinal: usize,
    value: &str,
) -> KeyTriplet {
    let suffix = if single_in_scope {
        String::new()
    } else {
        (ordinal + 1).to_string()
    };
    let key = |kind: ResourceKind| format!("{container}{}{suffix}", kind.key_name());
    KeyTriplet {
        color_key: key(ResourceKind::Color),
        brush_key: key(ResourceKind::Brush),
        opacity_key: key(ResourceKind::Opacity),
        value: value.to_string(),
    }
}

/// Request-scoped registry of every key handed out for one document.
///
/// Two different owners claiming the same key is a logic fault and is
/// reported as [`NormalizeError::KeyCollision`].
#[derive(Debug, Default)]
pub struct NameRegistry {
    claims: FxHashMap<String, String>,
    bases: FxHashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key` for `owner`. Re-claiming by the same owner is allowed.
    pub fn claim(&mut self, key: &str, owner: &str) -> Result<(), NormalizeError> {
        match self.claims.get(key) {
            Some(existing) if existing != owner => Err(NormalizeError::KeyCollision {
                key: key.to_string(),
                existing: existing.clone(),
                requested: owner.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(key.to_string(), owner.to_string());
                Ok(())
            }
        }
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.claims.contains_key(key)
    }

    /// Reserve a base name, appending `2`, `3`, ... until it is unused.
    pub fn unique_base(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut ordinal = 1;
        while self.bases.contains(&candidate) {
            ordinal += 1;
            candidate = format!("{base}{ordinal}");
        }
        self.bases.insert(candidate.clone());
        candidate
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("cloud-3 icon", ""), "cloud3icon");
        assert_eq!(validate_name("cloud--3__icon", "_"), "cloud_3_icon");
        assert_eq!(validate_name("3d-view-icon", ""), "_3dviewicon");
        assert_eq!(validate_name("plain", "_"), "plain");
        // replacement text is literal, `$` has no special meaning
        assert_eq!(validate_name("a b", "$1"), "a$1b");
    }

    #[test]
    fn test_validate_name_replacement_starting_with_digit() {
        assert_eq!(validate_name("-", "1"), "_1");
        assert_eq!(validate_name("", ""), "");
    }

    #[test]
    fn test_normalize_container_name() {
        assert_eq!(normalize_container_name("icons", ""), "Icons");
        assert_eq!(normalize_container_name("my icons", "_"), "My_icons");
        assert_eq!(normalize_container_name("2x", ""), "_2x");
    }

    #[test]
    fn test_drawing_keys() {
        assert_eq!(drawing_group_key("cloud-3 icon", ""), "cloud3iconDrawingGroup");
        assert_eq!(drawing_group_key("3d", "_"), "_3dDrawingGroup");
        assert_eq!(drawing_image_key("cloud", "Image", ""), "cloudImage");
        assert_eq!(image_name("cloudDrawingGroup"), "cloud");
        assert_eq!(image_name("cloud"), "cloud");
        assert_eq!(image_name("DrawingGroup"), "DrawingGroup");
    }

    #[test]
    fn test_key_triplet_suffix() {
        let single = allocate_key_triplet(true, "Doc", 0, "#FF000000");
        assert_eq!(single.color_key, "DocColor");
        assert_eq!(single.brush_key, "DocBrush");
        assert_eq!(single.opacity_key, "DocOpacity");

        let second = allocate_key_triplet(false, "Doc", 1, "#FF000000");
        assert_eq!(second.key(ResourceKind::Color), "DocColor2");
        assert_eq!(second.key(ResourceKind::Brush), "DocBrush2");
    }

    #[test]
    fn test_references() {
        assert_eq!(dynamic_ref("A"), "{DynamicResource A}");
        assert_eq!(static_ref("A"), "{StaticResource A}");
        assert_eq!(
            binding_ref("A"),
            "{Binding Color, Source={StaticResource A}}"
        );
        assert_eq!(referenced_key("{DynamicResource A}"), Some("A"));
        assert_eq!(referenced_key("{StaticResource B}"), Some("B"));
        assert_eq!(referenced_key(&binding_ref("C")), Some("C"));
        assert_eq!(referenced_key("#FF000000"), None);
        assert!(is_reference("{StaticResource B}"));
        assert!(!is_reference("F1 M0,0z"));
    }

    #[test]
    fn test_registry_collision() {
        let mut registry = NameRegistry::new();
        registry.claim("DocBrush", "global Brush #FF000000").unwrap();
        registry.claim("DocBrush", "global Brush #FF000000").unwrap();
        let err = registry.claim("DocBrush", "local proxy of DocBrush").unwrap_err();
        assert!(matches!(err, NormalizeError::KeyCollision { .. }));
        assert!(registry.is_claimed("DocBrush"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_unique_base() {
        let mut registry = NameRegistry::new();
        assert_eq!(registry.unique_base("icon"), "icon");
        assert_eq!(registry.unique_base("icon"), "icon2");
        assert_eq!(registry.unique_base("icon2"), "icon22");
        assert_eq!(registry.unique_base("icon"), "icon3");
    }
}
