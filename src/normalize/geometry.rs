//! Geometry extractor: hoists literal `Geometry` values of a drawing group
//! into standalone `<Geometry x:Key="...">` entries placed before the group.

use super::NormalizeError;
use super::assemble::Reference;
use super::naming::{NameRegistry, image_name, is_reference, static_ref};
use crate::debug;
use crate::markup::{Document, Element, KEY_ATTR, NodeId};

/// Extract every literal shape geometry below `group`.
///
/// One geometry is keyed `{name}Geometry`, several get 1-based ordinals in
/// document order. Returns the number of extracted entries.
pub fn extract_geometries(
    doc: &mut Document,
    group: NodeId,
    registry: &mut NameRegistry,
    references: &mut Vec<Reference>,
) -> Result<usize, NormalizeError> {
    let group_key = doc
        .key(group)
        .ok_or_else(|| NormalizeError::MissingKey {
            element: doc.get(group).name.clone(),
        })?
        .to_string();
    let name = image_name(&group_key).to_string();

    let drawings: Vec<(NodeId, String)> = doc
        .descendants(group)
        .into_iter()
        .filter(|&id| doc.get(id).local_name() == "GeometryDrawing")
        .filter_map(|id| {
            let value = doc.get(id).attr("Geometry")?;
            (!is_reference(value)).then(|| (id, value.to_string()))
        })
        .collect();

    let single = drawings.len() == 1;
    for (index, (drawing, value)) in drawings.iter().enumerate() {
        let key = if single {
            format!("{name}Geometry")
        } else {
            format!("{name}Geometry{}", index + 1)
        };
        registry.claim(&key, &format!("geometry of {group_key}"))?;

        let entry = doc.add(
            Element::new("Geometry")
                .with_attr(KEY_ATTR, key.as_str())
                .with_text(value.as_str()),
        );
        doc.insert_before(group, entry);
        doc.get_mut(*drawing).set_attr("Geometry", static_ref(&key));
        references.push(Reference {
            group: group_key.clone(),
            attribute: "Geometry".to_string(),
            key,
        });
    }

    debug!("geometry"; "{}: {} geometries extracted", group_key, drawings.len());
    Ok(drawings.len())
}
