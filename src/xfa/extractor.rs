//! XFA data extraction from PDF documents.
//!
//! This module locates the /XFA entry of a document's interactive form
//! dictionary and returns its packets with stream filters decoded.

use super::payload::XfaPayload;
use crate::error::{Error, Result};
use lopdf::{Document, Object, Stream};
use std::path::Path;

/// Packet name used when /XFA is a single stream holding the whole XDP.
pub const XDP_PACKET_NAME: &str = "xdp";

/// XFA data extractor.
///
/// Wraps a loaded PDF and reads its XFA payload.
pub struct XfaExtractor {
    doc: Document,
}

impl XfaExtractor {
    /// Load the PDF at `path`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xfa_bundle::xfa::XfaExtractor;
    ///
    /// let extractor = XfaExtractor::open("form.pdf")?;
    /// if extractor.has_xfa() {
    ///     println!("Document contains XFA form");
    /// }
    /// # Ok::<(), xfa_bundle::error::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let doc = Document::load(path.as_ref())?;
        Ok(Self { doc })
    }

    /// Load a PDF from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes)?;
        Ok(Self { doc })
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    /// Check if the document contains an XFA form.
    ///
    /// XFA forms are indicated by the presence of an /XFA entry in the
    /// /AcroForm dictionary of the document catalog.
    pub fn has_xfa(&self) -> bool {
        matches!(self.xfa_object(), Ok(Some(_)))
    }

    /// Extract the XFA packets of the document.
    ///
    /// XFA data in PDFs can be stored as:
    /// 1. An array of alternating name/stream pairs, one per packet
    /// 2. A single stream containing the complete XDP document, returned as
    ///    one packet named `xdp`
    ///
    /// A document without /AcroForm or /XFA yields [`XfaPayload::Absent`].
    /// Any other shape is an [`Error::UnrecognizedXfa`].
    pub fn extract_payload(&self) -> Result<XfaPayload> {
        let xfa_obj = match self.xfa_object()? {
            Some(obj) => obj,
            None => return Ok(XfaPayload::Absent),
        };

        match xfa_obj {
            Object::Stream(stream) => {
                let data = decode_stream(stream)?;
                Ok(XfaPayload::from_mapping([(XDP_PACKET_NAME, data)]))
            },
            Object::Array(arr) => {
                let entries = arr
                    .iter()
                    .map(|entry| self.entry_bytes(entry))
                    .collect::<Result<Vec<_>>>()?;
                XfaPayload::from_flat_sequence(entries)
            },
            other => Err(Error::UnrecognizedXfa(format!(
                "XFA entry is a {}, expected a stream or an array",
                object_kind(other)
            ))),
        }
    }

    /// Locate the /XFA object, following indirect references.
    fn xfa_object(&self) -> Result<Option<&Object>> {
        let catalog = self.doc.catalog()?;

        let acroform_obj = match catalog.get(b"AcroForm") {
            Ok(obj) => self.resolve_object(obj)?,
            Err(_) => return Ok(None),
        };
        let acroform_dict = match acroform_obj.as_dict() {
            Ok(d) => d,
            Err(_) => return Ok(None),
        };

        match acroform_dict.get(b"XFA") {
            Ok(obj) => Ok(Some(self.resolve_object(obj)?)),
            Err(_) => Ok(None),
        }
    }

    /// Resolve an indirect reference to its object.
    fn resolve_object<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.doc.get_object(*id)?),
            _ => Ok(obj),
        }
    }

    /// Bytes of one entry of the XFA array: a name or string for packet
    /// names, a stream (or, rarely, a string) for packet data.
    fn entry_bytes(&self, entry: &Object) -> Result<Vec<u8>> {
        match self.resolve_object(entry)? {
            Object::Name(name) => Ok(name.clone()),
            Object::String(bytes, _) => Ok(bytes.clone()),
            Object::Stream(stream) => decode_stream(stream),
            other => Err(Error::UnrecognizedXfa(format!(
                "unexpected {} inside XFA array",
                object_kind(other)
            ))),
        }
    }
}

/// Decode a stream's data using its filter chain.
fn decode_stream(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

fn object_kind(obj: &Object) -> &'static str {
    match obj {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real number",
        Object::Name(_) => "name",
        Object::String(..) => "string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}
