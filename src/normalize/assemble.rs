//! Document assembly: entries wrapper, image siblings, namespace stripping
//! and the closing reference check.

use rustc_hash::FxHashSet;

use super::NormalizeError;
use super::naming::{NameRegistry, image_name, static_ref};
use crate::markup::{Document, Element, KEY_ATTR, NS_PRESENTATION, NS_XAML, NodeId};

const ENTRIES_WRAPPER: &str = "ResourceDictionary.Entries";

/// A symbolic reference written by one of the passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Key of the top-level group the reference was written for.
    pub group: String,
    /// Attribute that holds the reference.
    pub attribute: String,
    /// Referenced key.
    pub key: String,
}

/// Move the children of a `ResourceDictionary.Entries` wrapper to the root.
///
/// Returns `true` when a wrapper was removed.
pub fn flatten_entries_wrapper(doc: &mut Document) -> bool {
    let root = doc.root();
    let Some(wrapper) = doc
        .children(root)
        .iter()
        .copied()
        .find(|&c| doc.get(c).local_name() == ENTRIES_WRAPPER)
    else {
        return false;
    };
    let entries = doc.children(wrapper).to_vec();
    doc.detach(wrapper);
    for entry in entries {
        doc.append(root, entry);
    }
    true
}

/// Insert `<DrawingImage x:Key="{name}{image_key}" Drawing="{StaticResource key}"/>`
/// right after every group.
pub fn attach_image_siblings(
    doc: &mut Document,
    groups: &[NodeId],
    image_key: &str,
    registry: &mut NameRegistry,
    references: &mut Vec<Reference>,
) -> Result<(), NormalizeError> {
    for &group in groups {
        let group_key = doc
            .key(group)
            .ok_or_else(|| NormalizeError::MissingKey {
                element: doc.get(group).name.clone(),
            })?
            .to_string();
        let image = format!("{}{image_key}", image_name(&group_key));
        registry.claim(&image, &format!("image of {group_key}"))?;

        let element = Element::new("DrawingImage")
            .with_attr(KEY_ATTR, image.as_str())
            .with_attr("Drawing", static_ref(&group_key));
        let id = doc.add(element);
        doc.insert_after(group, id);
        references.push(Reference {
            group: group_key.clone(),
            attribute: "Drawing".to_string(),
            key: group_key,
        });
    }
    Ok(())
}

/// Drop the default and `x` namespace declarations from serialized text.
///
/// Plain substring removal: the same text inside an attribute value would
/// be removed too.
pub fn strip_cosmetic_namespaces(text: &str) -> String {
    text.replace(&format!(" xmlns=\"{NS_PRESENTATION}\""), "")
        .replace(&format!(" xmlns:x=\"{NS_XAML}\""), "")
}

/// Check that every recorded reference resolves to a key in `doc`.
pub fn verify_references(doc: &Document, references: &[Reference]) -> Result<(), NormalizeError> {
    let keys: FxHashSet<&str> = doc.keys().into_iter().collect();
    match references.iter().find(|r| !keys.contains(r.key.as_str())) {
        Some(dangling) => Err(NormalizeError::DanglingReference {
            group: dangling.group.clone(),
            attribute: dangling.attribute.clone(),
            key: dangling.key.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    #[test]
    fn test_flatten_entries_wrapper() {
        let text = r#"<ResourceDictionary><ResourceDictionary.Entries><DrawingGroup x:Key="aDrawingGroup" /><DrawingGroup x:Key="bDrawingGroup" /></ResourceDictionary.Entries></ResourceDictionary>"#;
        let mut doc = markup::parse(text).unwrap();
        assert!(flatten_entries_wrapper(&mut doc));
        assert_eq!(doc.children(doc.root()).len(), 2);
        assert_eq!(doc.keys(), ["aDrawingGroup", "bDrawingGroup"]);
        assert!(!flatten_entries_wrapper(&mut doc));
    }

    #[test]
    fn test_attach_image_siblings() {
        let text = r#"<ResourceDictionary><DrawingGroup x:Key="aDrawingGroup" /><DrawingGroup x:Key="bDrawingGroup" /></ResourceDictionary>"#;
        let mut doc = markup::parse(text).unwrap();
        let groups = doc.children(doc.root()).to_vec();
        let mut registry = NameRegistry::new();
        let mut references = Vec::new();
        attach_image_siblings(&mut doc, &groups, "Image", &mut registry, &mut references).unwrap();

        assert_eq!(
            doc.keys(),
            ["aDrawingGroup", "aImage", "bDrawingGroup", "bImage"]
        );
        let image = doc.children(doc.root())[1];
        assert_eq!(
            doc.get(image).attr("Drawing"),
            Some("{StaticResource aDrawingGroup}")
        );
        assert_eq!(references.len(), 2);
        verify_references(&doc, &references).unwrap();
    }

    #[test]
    fn test_attach_requires_key() {
        let mut doc = markup::parse("<ResourceDictionary><DrawingGroup /></ResourceDictionary>").unwrap();
        let groups = doc.children(doc.root()).to_vec();
        let err = attach_image_siblings(
            &mut doc,
            &groups,
            "Image",
            &mut NameRegistry::new(),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, NormalizeError::MissingKey { .. }));
    }

    #[test]
    fn test_strip_cosmetic_namespaces() {
        let text = format!(
            r#"<DrawingGroup x:Key="a" xmlns="{NS_PRESENTATION}" xmlns:x="{NS_XAML}" />"#
        );
        assert_eq!(strip_cosmetic_namespaces(&text), r#"<DrawingGroup x:Key="a" />"#);
        // other declarations survive
        let sys = r#"<ResourceDictionary xmlns:sys="clr-namespace:System;assembly=mscorlib" />"#;
        assert_eq!(strip_cosmetic_namespaces(sys), sys);
    }

    #[test]
    fn test_verify_reports_dangling_reference() {
        let doc = markup::parse(r#"<ResourceDictionary><Color x:Key="DocColor">#FF000000</Color></ResourceDictionary>"#).unwrap();
        let ok = Reference {
            group: "aDrawingGroup".to_string(),
            attribute: "Color".to_string(),
            key: "DocColor".to_string(),
        };
        let missing = Reference {
            key: "DocBrush".to_string(),
            attribute: "Brush".to_string(),
            ..ok.clone()
        };
        verify_references(&doc, std::slice::from_ref(&ok)).unwrap();
        let err = verify_references(&doc, &[ok, missing]).unwrap_err();
        assert!(err.to_string().contains("DocBrush"));
        assert!(err.to_string().contains("aDrawingGroup"));
    }
}
