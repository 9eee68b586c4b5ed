//! JSON bundle construction from exported XFA packets.
//!
//! Every `*.xml` file in a directory is parsed, folded into a
//! [`FoldedNode`] and stored under its file stem in a [`Bundle`]. Inline
//! base64 images are written to numbered files and referenced by path.
//!
//! # Example
//!
//! ```no_run
//! use xfa_bundle::bundle::BundleConverter;
//!
//! let converter = BundleConverter::new("out", "out/images", "out/xfa_bundle.json");
//! let summary = converter.convert()?;
//! println!("Bundled {} files, {} images", summary.documents, summary.images);
//! # Ok::<(), xfa_bundle::error::Error>(())
//! ```

mod converter;
mod fold;
mod images;

pub use converter::{Bundle, BundleConverter, BundleSummary, IMAGE_FOLDER_KEY};
pub use fold::{fold_element, FoldedChild, FoldedNode, FoldedObject};
pub use images::{extension_for, ImageSink, DEFAULT_IMAGE_EXTENSION};
