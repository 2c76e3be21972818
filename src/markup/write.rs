//! [`Document`] -> markup text.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::{Document, NodeId};

/// Serialize a document with two-space indentation and no XML declaration.
pub fn write(doc: &Document) -> std::io::Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    write_node(doc, doc.root(), &mut writer)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

fn write_node(
    doc: &Document,
    id: NodeId,
    writer: &mut Writer<Cursor<Vec<u8>>>,
) -> std::io::Result<()> {
    let elem = doc.get(id);
    let mut start = BytesStart::new(elem.name.as_str());
    for attr in &elem.attrs {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    let children = doc.children(id);
    if children.is_empty() && elem.text.is_none() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = &elem.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for &child in children {
        write_node(doc, child, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(elem.name.as_str())))
}
