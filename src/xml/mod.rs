//! XML tree parsing, pretty-printing and cleanup.
//!
//! XFA packets are parsed into a small owned [`Element`] tree. The same tree
//! feeds both the pretty-printer used when packets are exported and the
//! folding pass that builds the JSON bundle.

mod pretty;
mod tree;

pub use pretty::to_pretty_string;
pub use tree::{parse_document, Element, Node};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches `<?target data?>`, including the XML declaration
    static ref RE_PROCESSING_INSTRUCTION: Regex = Regex::new(r"(?s)<\?.*?\?>").unwrap();
}

/// Remove every processing instruction (including `<?xml ...?>`) from `text`.
pub fn strip_processing_instructions(text: &str) -> String {
    RE_PROCESSING_INSTRUCTION.replace_all(text, "").into_owned()
}
