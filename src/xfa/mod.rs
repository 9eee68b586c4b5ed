//! XFA (XML Forms Architecture) packet extraction.
//!
//! XFA is an XML-based form specification used in some PDFs, particularly
//! government and financial forms. The XML lives in the /XFA entry of the
//! document's /AcroForm dictionary, split into named packets such as
//! `template`, `datasets` and `config`.
//!
//! # Example
//!
//! ```no_run
//! use xfa_bundle::xfa::{export_packets, XfaExtractor};
//! use std::path::Path;
//!
//! let extractor = XfaExtractor::open("form.pdf")?;
//! let packets = extractor.extract_payload()?.into_packets()?;
//! let summary = export_packets(&packets, Path::new("out"), 2)?;
//! println!("Exported {} packets", summary.written.len());
//! # Ok::<(), xfa_bundle::error::Error>(())
//! ```

mod export;
mod extractor;
mod payload;

pub use export::{export_packet, export_packets, ExportSummary};
pub use extractor::{XfaExtractor, XDP_PACKET_NAME};
pub use payload::{XfaPacket, XfaPayload};
