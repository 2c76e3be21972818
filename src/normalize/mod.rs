//! Document normalization and resource deduplication.
//!
//! # Pipeline
//!
//! ```text
//! single file:   simplify
//!
//! dictionary:    flatten entries
//!                    │
//!                    ▼
//!                simplify ──► extract geometries     (per top-level group)
//!                    │
//!                    ▼
//!                consolidate Color ─► Brush ─► Opacity
//!                    │
//!                    ▼
//!                image siblings ──► reference check
//! ```
//!
//! Every function works on a [`Document`] in place. A failed dictionary run
//! leaves the document half rewritten; callers drop it and report the error.

mod assemble;
mod collect;
mod consolidate;
mod error;
mod geometry;
mod kind;
mod naming;
mod simplify;


pub use assemble::strip_cosmetic_namespaces;
pub use error::NormalizeError;
pub use kind::ResourceKind;
pub use naming::{
    NameRegistry, drawing_group_key, drawing_image_key, normalize_container_name, validate_name,
};

use crate::debug;
use crate::markup::{Document, NodeId};
use consolidate::ConversionState;

/// Options of one dictionary conversion.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Normalized container name, prefix of every global key.
    pub container_name: String,
    /// Share local proxies instead of one per occurrence.
    pub consolidate_brushes: bool,
    /// Suffix of `DrawingImage` keys.
    pub image_key: String,
    /// Kinds to consolidate.
    pub kinds: Vec<ResourceKind>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            container_name: "Icons".to_string(),
            consolidate_brushes: true,
            image_key: "Image".to_string(),
            kinds: ResourceKind::ALL.to_vec(),
        }
    }
}

/// Result of a dictionary run.
#[derive(Debug)]
pub struct Normalized {
    /// Number of top-level drawing groups.
    pub images: usize,
    /// Every key handed out.
    pub registry: NameRegistry,
}

/// Single-file mode: simplify the root drawing and give it `name`.
pub fn normalize_single(doc: &mut Document, name: Option<&str>) {
    let root = doc.root();
    simplify::beautify(doc, root, name);
}

/// Dictionary mode: the full pipeline over a merged multi-image document.
///
/// A document without top-level drawing groups is left as it is and
/// reported with `images == 0`.
pub fn normalize_dictionary(
    doc: &mut Document,
    options: &NormalizeOptions,
) -> Result<Normalized, NormalizeError> {
    assemble::flatten_entries_wrapper(doc);

    let groups = top_level_groups(doc);
    let mut registry = NameRegistry::new();
    if groups.is_empty() {
        return Ok(Normalized {
            images: 0,
            registry,
        });
    }

    let mut references = Vec::new();
    for (index, &group) in groups.iter().enumerate() {
        let key = doc
            .key(group)
            .ok_or_else(|| NormalizeError::MissingKey {
                element: doc.get(group).name.clone(),
            })?
            .to_string();
        registry.claim(&key, &format!("drawing group {}", index + 1))?;
        simplify::beautify(doc, group, None);
        geometry::extract_geometries(doc, group, &mut registry, &mut references)?;
    }

    let state = ConversionState::new(options, groups.len());
    consolidate::consolidate(doc, &groups, &state, &mut registry, &mut references)?;
    assemble::attach_image_siblings(
        doc,
        &groups,
        &options.image_key,
        &mut registry,
        &mut references,
    )?;
    assemble::verify_references(doc, &references)?;

    debug!(
        "normalize";
        "{} images, {} keys, {} references",
        groups.len(),
        registry.len(),
        references.len()
    );
    Ok(Normalized {
        images: groups.len(),
        registry,
    })
}

/// Drawing groups directly below the root.
fn top_level_groups(doc: &Document) -> Vec<NodeId> {
    doc.children_named(doc.root(), "DrawingGroup")
}
