//! Folding of XML element trees into JSON-serializable nodes.
//!
//! Each element becomes either a bare string (text only) or an object with
//! `@attr` entries, one entry per child tag, and `#text` for text that sits
//! next to other content. Image payloads found on the way are written out
//! through an [`ImageSink`] and replaced by an `image_path` entry.

use super::images::{extension_for, ImageSink};
use crate::error::Result;
use crate::xml::Element;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A folded element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FoldedNode {
    /// Element with text and nothing else
    Text(String),
    /// Element with attributes, children or an image reference
    Object(FoldedObject),
}

impl FoldedNode {
    /// The object form, if this node is not a bare string.
    pub fn as_object(&self) -> Option<&FoldedObject> {
        match self {
            FoldedNode::Object(o) => Some(o),
            FoldedNode::Text(_) => None,
        }
    }

    /// The bare string, if this node is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FoldedNode::Text(t) => Some(t),
            FoldedNode::Object(_) => None,
        }
    }
}

/// The entry stored under a child tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FoldedChild {
    /// Tag occurred once among its siblings
    Single(FoldedNode),
    /// Tag repeated; nodes in document order
    List(Vec<FoldedNode>),
}

impl FoldedChild {
    fn push(&mut self, node: FoldedNode) {
        match self {
            FoldedChild::List(items) => items.push(node),
            FoldedChild::Single(_) => {
                if let FoldedChild::Single(first) = std::mem::replace(self, FoldedChild::List(Vec::new())) {
                    *self = FoldedChild::List(vec![first, node]);
                }
            },
        }
    }

    /// Nodes under this tag, in document order.
    pub fn nodes(&self) -> &[FoldedNode] {
        match self {
            FoldedChild::Single(node) => std::slice::from_ref(node),
            FoldedChild::List(nodes) => nodes,
        }
    }
}

/// Object form of a folded element.
///
/// Serializes as one JSON object: `@attr` keys, then `image_path`, then
/// child tags in order of first appearance, then `#text`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldedObject {
    /// Attribute values keyed by attribute name (without the `@`)
    pub attributes: IndexMap<String, String>,
    /// Extracted image, relative to the bundle root
    pub image_path: Option<String>,
    /// Folded children keyed by local tag name
    pub children: IndexMap<String, FoldedChild>,
    /// Text that appears alongside attributes or children
    pub text: Option<String>,
}

impl FoldedObject {
    /// True when the object carries no entries at all.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
            && self.image_path.is_none()
            && self.children.is_empty()
            && self.text.is_none()
    }

    /// Entry stored under a child tag.
    pub fn child(&self, tag: &str) -> Option<&FoldedChild> {
        self.children.get(tag)
    }

    fn push_child(&mut self, tag: &str, node: FoldedNode) {
        match self.children.entry(tag.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(FoldedChild::Single(node));
            },
            Entry::Occupied(mut slot) => slot.get_mut().push(node),
        }
    }
}

impl Serialize for FoldedObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = self.attributes.len()
            + self.children.len()
            + usize::from(self.image_path.is_some())
            + usize::from(self.text.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &self.attributes {
            map.serialize_entry(&format!("@{}", name), value)?;
        }
        if let Some(path) = &self.image_path {
            map.serialize_entry("image_path", path)?;
        }
        for (tag, child) in &self.children {
            map.serialize_entry(tag, child)?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry("#text", text)?;
        }
        map.end()
    }
}

/// Fold `element` and its descendants.
///
/// `image` elements, and `exData` elements whose `contentType` mentions
/// `image`, are leaves: their text is decoded and written through `sink`,
/// and their children are not visited. Only filesystem failures while
/// writing images are errors.
pub fn fold_element(element: &Element, sink: &mut ImageSink) -> Result<FoldedNode> {
    let tag = element.local_name();
    let mut object = FoldedObject::default();

    for (name, value) in &element.attributes {
        if is_namespace_declaration(name) {
            continue;
        }
        object.attributes.insert(name.clone(), value.clone());
    }

    if let Some(extension) = image_extension(element) {
        object.image_path = sink.store(tag, element.text().trim(), &extension)?;
        return Ok(FoldedNode::Object(object));
    }

    for child in element.child_elements() {
        let node = fold_element(child, sink)?;
        object.push_child(child.local_name(), node);
    }

    let text = element.text();
    let text = text.trim();
    if !text.is_empty() {
        if object.is_empty() {
            return Ok(FoldedNode::Text(text.to_string()));
        }
        object.text = Some(text.to_string());
    }

    Ok(FoldedNode::Object(object))
}

/// Extension for an image-bearing element, `None` for everything else.
fn image_extension(element: &Element) -> Option<String> {
    let content_type = element.attribute("contentType");
    match element.local_name() {
        "image" => Some(extension_for(content_type)),
        "exData" => content_type
            .filter(|ct| ct.contains("image"))
            .map(|ct| extension_for(Some(ct))),
        _ => None,
    }
}

fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}
