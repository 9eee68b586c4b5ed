//! Indented XML serialization.

use super::tree::{Element, Node};
use crate::error::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Serialize `root` as an indented document with an XML declaration.
///
/// Childless elements are written as empty tags. Text is written inline,
/// so re-parsing the output yields the same tree.
pub fn to_pretty_string(root: &Element, indent: usize) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| Error::Utf8(e.utf8_error()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(write_error)?,
            Node::CData(t) => writer
                .write_event(Event::CData(BytesCData::new(t.as_str())))
                .map_err(write_error)?,
            Node::Comment(t) => writer
                .write_event(Event::Comment(BytesText::from_escaped(t.as_str())))
                .map_err(write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_error)
}

fn write_error(e: quick_xml::Error) -> Error {
    Error::Xml {
        position: 0,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn test_pretty_print_indents_children() {
        let xml = r#"<template><subform name="A"><field name="f1"/></subform></template>"#;
        let root = parse_document(xml).unwrap();
        let pretty = to_pretty_string(&root, 2).unwrap();

        assert!(pretty.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(pretty.contains("\n<template>"));
        assert!(pretty.contains("\n  <subform name=\"A\">"));
        assert!(pretty.contains("\n    <field name=\"f1\"/>"));
        assert!(pretty.ends_with("</template>\n"));
    }

    #[test]
    fn test_text_stays_inline() {
        let root = parse_document("<a><b>hello</b></a>").unwrap();
        let pretty = to_pretty_string(&root, 2).unwrap();
        assert!(pretty.contains("<b>hello</b>"));
    }

    #[test]
    fn test_special_characters_are_escaped() {
        let root = Element::new("a")
            .with_attribute("q", "\"x\" & <y>")
            .with_text("1 < 2 & 3");
        let pretty = to_pretty_string(&root, 2).unwrap();
        assert_eq!(parse_document(&pretty).unwrap(), root);
    }

    #[test]
    fn test_pretty_print_is_idempotent() {
        let xml = r#"<xdp:xdp xmlns:xdp="http://ns.adobe.com/xdp/"><template><!-- layout --><subform name="A"><draw><value><text>Hello <b>there</b> world</text></value></draw><script><![CDATA[x = 1;]]></script></subform></template></xdp:xdp>"#;
        let original = parse_document(xml).unwrap();
        let once = to_pretty_string(&original, 2).unwrap();
        let reparsed = parse_document(&once).unwrap();
        assert_eq!(reparsed, original);

        let twice = to_pretty_string(&reparsed, 2).unwrap();
        assert_eq!(once, twice);
    }
}
