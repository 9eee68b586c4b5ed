//! # xfa_bundle
//!
//! Extracts the XFA (XML Forms Architecture) packets embedded in a PDF form,
//! writes each one as a pretty-printed XML file, and folds those files into
//! a single JSON bundle. Base64 images found in `image` and `exData`
//! elements are written to numbered files and referenced by path.
//!
//! ## Stages
//!
//! 1. [`xfa`]: load the PDF, read `/AcroForm /XFA`, write `<packet>.xml`
//! 2. [`bundle`]: parse each XML file, fold it into JSON, extract images
//!
//! [`pipeline::run`] chains both from an [`config::ExportConfig`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use xfa_bundle::config::ExportConfig;
//! use xfa_bundle::pipeline;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExportConfig::new("xfa-example.pdf", "out");
//! let summary = pipeline::run(&config)?;
//! println!("Bundle written to {}", summary.bundle.bundle_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

/// Run configuration
pub mod config;

// XML tree, pretty-printer
pub mod xml;

// Stage 1: PDF to XML packets
pub mod xfa;

// Stage 2: XML packets to JSON bundle
pub mod bundle;

pub mod pipeline;

pub use config::ExportConfig;
pub use error::{Error, Result};
