//! Configuration for an extraction run.

use std::path::{Path, PathBuf};

/// Default source document when none is given.
pub const DEFAULT_PDF_PATH: &str = "xfa-example.pdf";

/// Default name of the directory, under the output root, that receives images.
pub const DEFAULT_IMAGES_DIR_NAME: &str = "images";

/// Default file name of the JSON bundle, under the output root.
pub const DEFAULT_BUNDLE_FILE_NAME: &str = "xfa_bundle.json";

/// Extraction run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Source PDF.
    pub pdf_path: PathBuf,

    /// Destination root for XML packets, images and the bundle.
    pub output_dir: PathBuf,

    /// Images directory name, relative to `output_dir`.
    pub images_dir_name: String,

    /// Bundle file name, relative to `output_dir`.
    pub bundle_file_name: String,

    /// Spaces per nesting level in pretty-printed XML.
    pub indent: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PDF_PATH, ".")
    }
}

impl ExportConfig {
    /// Create a configuration for `pdf_path` writing into `output_dir`.
    pub fn new(pdf_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            output_dir: output_dir.into(),
            images_dir_name: DEFAULT_IMAGES_DIR_NAME.to_string(),
            bundle_file_name: DEFAULT_BUNDLE_FILE_NAME.to_string(),
            indent: 2,
        }
    }

    /// Set the images directory name.
    pub fn with_images_dir_name(mut self, name: impl Into<String>) -> Self {
        self.images_dir_name = name.into();
        self
    }

    /// Set the bundle file name.
    pub fn with_bundle_file_name(mut self, name: impl Into<String>) -> Self {
        self.bundle_file_name = name.into();
        self
    }

    /// Set the XML indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Directory the XML packets are written to and read back from.
    pub fn xml_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory extracted images are written to.
    pub fn images_dir(&self) -> PathBuf {
        self.output_dir.join(&self.images_dir_name)
    }

    /// Path of the JSON bundle.
    pub fn bundle_path(&self) -> PathBuf {
        self.output_dir.join(&self.bundle_file_name)
    }
}
