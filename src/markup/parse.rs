//! Markup text -> [`Document`].

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};

use super::{Attr, Document, Element, NodeId};
use crate::normalize::NormalizeError;

/// Parse markup text into an arena document.
///
/// Comments, processing instructions and the XML declaration are dropped.
/// Text is collected per element and trimmed once the element closes;
/// whitespace-only text is ignored. Elements still open at the end of input
/// fail the parse.
pub fn parse(text: &str) -> Result<Document, NormalizeError> {
    let mut reader = Reader::from_str(text);

    let mut doc: Option<Document> = None;
    // open elements with the text gathered so far
    let mut stack: Vec<(NodeId, String)> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            NormalizeError::Parse(format!(
                "at position {}: {e}",
                reader.error_position()
            ))
        })?;
        match event {
            Event::Start(start) => {
                let id = open(&mut doc, &stack, element_from(&start)?)?;
                stack.push((id, String::new()));
            }
            Event::Empty(start) => {
                open(&mut doc, &stack, element_from(&start)?)?;
            }
            Event::End(_) => {
                let (Some(doc), Some((id, text))) = (doc.as_mut(), stack.pop()) else {
                    continue;
                };
                let text = text.trim();
                if !text.is_empty() {
                    doc.get_mut(id).text = Some(text.to_string());
                }
            }
            Event::Text(text) => {
                if let Some((_, buf)) = stack.last_mut() {
                    buf.push_str(&decode(&text)?);
                }
            }
            Event::CData(cdata) => {
                if let Some((_, buf)) = stack.last_mut() {
                    buf.push_str(&decode(&cdata)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some((_, buf)) = stack.last_mut() {
                    buf.push_str(&resolve_reference(&reference)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let (Some(doc), Some((id, _))) = (doc.as_ref(), stack.last()) {
        return Err(NormalizeError::Parse(format!(
            "unclosed element <{}> at end of input",
            doc.get(*id).name
        )));
    }
    doc.ok_or_else(|| NormalizeError::Parse("document has no root element".to_string()))
}

/// Resolve `&name;` or `&#N;` inside text content.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, NormalizeError> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| NormalizeError::Parse(e.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = reference
        .decode()
        .map_err(|e| NormalizeError::Parse(e.to_string()))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| NormalizeError::Parse(format!("unknown entity &{name};")))
}

/// Register a freshly opened element: root if nothing is open yet, else a child.
fn open(
    doc: &mut Option<Document>,
    stack: &[(NodeId, String)],
    element: Element,
) -> Result<NodeId, NormalizeError> {
    let Some(existing) = doc.as_mut() else {
        let created = Document::new(element);
        let root = created.root();
        *doc = Some(created);
        return Ok(root);
    };
    match stack.last() {
        Some(&(parent, _)) => {
            let id = existing.add(element);
            existing.append(parent, id);
            Ok(id)
        }
        None => Err(NormalizeError::Parse(
            "more than one root element".to_string(),
        )),
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, NormalizeError> {
    let mut element = Element::new(decode(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| NormalizeError::Parse(e.to_string()))?;
        let name = decode(attr.key.as_ref())?;
        let raw = decode(&attr.value)?;
        let value = unescape(&raw).map_err(|e| NormalizeError::Parse(e.to_string()))?;
        element.attrs.push(Attr::new(name, value.into_owned()));
    }
    Ok(element)
}

fn decode(bytes: &[u8]) -> Result<String, NormalizeError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| NormalizeError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_with_text() {
        let doc = parse(
            r##"<ResourceDictionary xmlns="p" xmlns:x="x">
                <Color x:Key="A">#FF000000</Color>
                <DrawingGroup x:Key="iconDrawingGroup">
                    <GeometryDrawing Brush="#FF112233" Geometry="F1 M0,0z" />
                </DrawingGroup>
            </ResourceDictionary>"##,
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(doc.get(root).name, "ResourceDictionary");
        assert_eq!(doc.get(root).attr("xmlns:x"), Some("x"));
        let children = doc.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(doc.get(children[0]).text.as_deref(), Some("#FF000000"));
        let shape = doc.children(children[1])[0];
        assert_eq!(doc.get(shape).attr("Brush"), Some("#FF112233"));
    }

    #[test]
    fn test_parse_unescapes_attributes() {
        let doc = parse(r#"<A Name="a &amp; b" />"#).unwrap();
        assert_eq!(doc.get(doc.root()).attr("Name"), Some("a & b"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_parse_keeps_text_references() {
        let doc = parse(r#"<Geometry x:Key="g">M0,0 &amp; z &#x41;&lt;</Geometry>"#).unwrap();
        assert_eq!(doc.get(doc.root()).text.as_deref(), Some("M0,0 & z A<"));

        let doc = parse("<Color>\n   <![CDATA[#FF000000]]>\n</Color>").unwrap();
        assert_eq!(doc.get(doc.root()).text.as_deref(), Some("#FF000000"));
    }

    #[test]
    fn test_parse_rejects_unknown_entity() {
        assert!(parse("<Color>&nbsp;</Color>").is_err());
    }

    #[test]
    fn test_parse_rejects_truncated_markup() {
        let err = parse(
            r##"<ResourceDictionary><DrawingGroup x:Key="aDrawingGroup"><GeometryDrawing Brush="#FF000000"/>"##,
        )
        .unwrap_err();
        assert!(err.to_string().contains("<DrawingGroup>"));
    }
}
