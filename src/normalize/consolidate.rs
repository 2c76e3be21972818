//! Resource consolidator.
//!
//! Three tiers per color, for a container named `Doc` and an image `cloud`:
//!
//! ```xml
//! <Color x:Key="DocColor1">#FF000000</Color>
//! <SolidColorBrush x:Key="DocBrush1" Color="{DynamicResource DocColor1}" />
//! <SolidColorBrush x:Key="cloudBrush" Color="{Binding Color, Source={StaticResource DocBrush1}}" />
//! <DrawingGroup x:Key="cloudDrawingGroup">
//!   <GeometryDrawing Brush="{DynamicResource cloudBrush}" ... />
//! </DrawingGroup>
//! ```
//!
//! Global entries are allocated once per distinct value for the whole
//! document. Local proxies are allocated per group; only kinds whose
//! [`KindSpec::local_proxy`](super::kind::KindSpec) is set get one, the
//! others reference the global entry directly.

use rustc_hash::FxHashSet;

use super::assemble::Reference;
use super::collect::{DistinctResources, collect_attributes, distinct_values};
use super::kind::{KindSpec, ResourceKind};
use super::naming::{KeyTriplet, NameRegistry, allocate_key_triplet, dynamic_ref, image_name};
use super::{NormalizeError, NormalizeOptions};
use crate::debug;
use crate::markup::{Document, NodeId};

/// Per-document conversion state. Built once, read-only afterwards.
#[derive(Debug)]
pub struct ConversionState<'a> {
    pub options: &'a NormalizeOptions,
    /// Number of top-level drawing groups.
    pub total: usize,
}

impl<'a> ConversionState<'a> {
    pub fn new(options: &'a NormalizeOptions, total: usize) -> Self {
        Self { options, total }
    }

    pub fn has_multiple_images(&self) -> bool {
        self.total > 1
    }

    pub fn container(&self) -> &str {
        &self.options.container_name
    }

    /// Base of local keys for the image `image`.
    ///
    /// A base equal to the container name gets a `Local` suffix so local
    /// keys never shadow global ones.
    pub fn local_base(&self, image: &str) -> String {
        let base = if self.has_multiple_images() {
            image
        } else {
            self.container()
        };
        if base == self.container() {
            format!("{base}Local")
        } else {
            base.to_string()
        }
    }
}

/// Global entries of one kind: distinct values and their keys.
struct GlobalTable {
    kind: ResourceKind,
    triplets: Vec<KeyTriplet>,
}

impl GlobalTable {
    fn allocate(kind: ResourceKind, container: &str, values: &[String]) -> Self {
        let single = values.len() < 2;
        let triplets = values
            .iter()
            .enumerate()
            .map(|(i, value)| allocate_key_triplet(single, container, i, value))
            .collect();
        Self { kind, triplets }
    }

    fn lookup(&self, value: &str) -> Option<&KeyTriplet> {
        self.triplets
            .iter()
            .find(|t| self.kind.same_value(&t.value, value))
    }

    fn len(&self) -> usize {
        self.triplets.len()
    }
}

/// Allocate global entries and rewrite every literal below `groups`.
pub fn consolidate(
    doc: &mut Document,
    groups: &[NodeId],
    state: &ConversionState<'_>,
    registry: &mut NameRegistry,
    references: &mut Vec<Reference>,
) -> Result<(), NormalizeError> {
    let root = doc.root();
    let distinct = DistinctResources::collect(doc, root);
    let container = state.container();
    let colors = GlobalTable::allocate(ResourceKind::Color, container, &distinct.colors);

    let mut tables = Vec::new();
    let mut globals = Vec::new();
    for kind in ResourceKind::ALL {
        if !state.options.kinds.contains(&kind) {
            continue;
        }
        let table = GlobalTable::allocate(kind, container, distinct.values(kind));
        for triplet in &table.triplets {
            let key = triplet.key(kind);
            registry.claim(key, &format!("global {kind} {}", triplet.value))?;
            let color_key = colors
                .lookup(&triplet.value)
                .map_or(triplet.color_key.as_str(), |c| c.color_key.as_str());
            globals.push(kind.global_element(key, &triplet.value, color_key));
        }
        debug!("consolidate"; "{} global {} entries", table.len(), kind);
        tables.push(table);
    }

    for (index, element) in globals.into_iter().enumerate() {
        let id = doc.add(element);
        doc.insert_at(root, index, id);
    }
    for table in tables.iter().filter(|t| !t.triplets.is_empty()) {
        declare_namespace(doc, root, table.kind.spec());
    }

    let mut emitted = FxHashSet::default();
    for table in &tables {
        for &group in groups {
            rewrite_group(doc, group, table, state, registry, references, &mut emitted)?;
        }
    }
    Ok(())
}

/// Bind the prefix of a qualified global tag (`sys:Double`) on the root.
fn declare_namespace(doc: &mut Document, root: NodeId, spec: &KindSpec) {
    let Some((prefix, _)) = spec.tag.split_once(':') else {
        return;
    };
    let attr = format!("xmlns:{prefix}");
    if !doc.get(root).has_attr(&attr) {
        doc.get_mut(root).set_attr(&attr, spec.namespace);
    }
}

/// Rewrite the literals of one kind inside `group`.
///
/// `emitted` tracks global keys whose proxy already exists in the document,
/// used when the document holds a single image.
fn rewrite_group(
    doc: &mut Document,
    group: NodeId,
    table: &GlobalTable,
    state: &ConversionState<'_>,
    registry: &mut NameRegistry,
    references: &mut Vec<Reference>,
    emitted: &mut FxHashSet<String>,
) -> Result<(), NormalizeError> {
    let kind = table.kind;
    let spec = kind.spec();
    let group_key = doc
        .key(group)
        .ok_or_else(|| NormalizeError::MissingKey {
            element: doc.get(group).name.clone(),
        })?
        .to_string();
    let local_key = format!(
        "{}{}",
        state.local_base(image_name(&group_key)),
        kind.key_name()
    );

    let occurrences = collect_attributes(doc, group, kind);
    let local_distinct =
        distinct_values(kind, occurrences.iter().map(|o| o.value.as_str())).len();
    let consolidated = state.options.consolidate_brushes;
    let single = if consolidated {
        table.len() <= 1 && local_distinct <= 1
    } else {
        occurrences.len() <= 1
    };

    // global keys in first-discovery order within this group
    let mut discovered: Vec<&str> = Vec::new();
    let mut proxies = 0;
    for (index, occurrence) in occurrences.iter().enumerate() {
        let Some(triplet) = table.lookup(&occurrence.value) else {
            continue;
        };
        let global = triplet.key(kind);
        let first = !discovered.contains(&global);
        if first {
            discovered.push(global);
        }

        let ordinal = if single {
            None
        } else if !consolidated {
            Some(index + 1)
        } else if local_distinct > 1 && table.len() > 1 {
            discovered.iter().position(|k| *k == global).map(|p| p + 1)
        } else {
            None
        };
        let local = match ordinal {
            Some(n) => format!("{local_key}{n}"),
            None => local_key.clone(),
        };

        let target = if spec.local_proxy { local.as_str() } else { global };
        doc.get_mut(occurrence.element)
            .set_attr(&occurrence.attribute, dynamic_ref(target));
        references.push(Reference {
            group: group_key.clone(),
            attribute: occurrence.attribute.clone(),
            key: target.to_string(),
        });

        if !spec.local_proxy {
            continue;
        }
        let emit = if consolidated {
            first && (state.has_multiple_images() || emitted.insert(global.to_string()))
        } else {
            true
        };
        if emit {
            registry.claim(&local, &format!("{group_key} {kind} proxy of {global}"))?;
            let proxy = doc.add(kind.proxy_element(&local, global));
            doc.insert_before(group, proxy);
            proxies += 1;
        }
    }

    debug!(
        "consolidate";
        "{}: {} {} references, {} proxies",
        group_key,
        occurrences.len(),
        kind,
        proxies
    );
    Ok(())
}
