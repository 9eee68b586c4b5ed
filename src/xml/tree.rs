//! In-memory XML element tree.
//!
//! Built from `quick-xml` reader events. Whitespace-only text between
//! elements is dropped so that a document and its pretty-printed form
//! parse to the same tree.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data (unescaped)
    Text(String),
    /// CDATA section contents
    CData(String),
    /// Comment body
    Comment(String),
}

/// An XML element with its qualified name, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name as written (e.g. `xfa:datasets`)
    pub name: String,
    /// Attributes in document order, qualified names, unescaped values
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Tag name with any namespace prefix removed.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Look up an attribute by qualified or local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name || local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated text and CDATA content of this element, including text
    /// after child elements (not descendants).
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) | Node::CData(t) => out.push_str(t),
                _ => {},
            }
        }
        out
    }
}

/// Strip a namespace prefix from a qualified name.
pub(crate) fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Parse a complete XML document and return its root element.
///
/// The document must contain exactly one root element. XML declarations,
/// doctypes and processing instructions are skipped.
pub fn parse_document(text: &str) -> Result<Element> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(text);
    reader.trim_text(false);
    reader.check_end_names(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader.read_event().map_err(|e| Error::Xml {
            position,
            reason: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                stack.push(element_from_start(e, position)?);
            },
            Event::Empty(ref e) => {
                let element = element_from_start(e, position)?;
                attach(&mut stack, &mut root, element, position)?;
            },
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| Error::Xml {
                    position,
                    reason: "closing tag without matching opening tag".to_string(),
                })?;
                attach(&mut stack, &mut root, element, position)?;
            },
            Event::Text(ref t) => {
                let content = t
                    .unescape()
                    .map_err(|e| Error::Xml {
                        position,
                        reason: e.to_string(),
                    })?
                    .into_owned();
                if content.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(content)),
                    None => {
                        return Err(Error::Xml {
                            position,
                            reason: "text outside of the root element".to_string(),
                        })
                    },
                }
            },
            Event::CData(c) => {
                let content = String::from_utf8_lossy(&c.into_inner()).into_owned();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::CData(content)),
                    None => {
                        return Err(Error::Xml {
                            position,
                            reason: "CDATA outside of the root element".to_string(),
                        })
                    },
                }
            },
            Event::Comment(ref c) => {
                // Comments outside the root are not part of the tree.
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(c).into_owned()));
                }
            },
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {},
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Xml {
            position: reader.buffer_position(),
            reason: format!("unclosed element <{}>", open.name),
        });
    }

    root.ok_or_else(|| Error::Xml {
        position: reader.buffer_position(),
        reason: "document has no root element".to_string(),
    })
}

fn element_from_start(start: &BytesStart<'_>, position: usize) -> Result<Element> {
    let xml_err = |reason: String| Error::Xml { position, reason };

    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_err(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_err(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: usize,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::Xml {
            position,
            reason: format!("second root element <{}>", element.name),
        });
    }
    *root = Some(element);
    Ok(())
}
