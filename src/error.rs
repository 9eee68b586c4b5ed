//! Error types for XFA extraction and bundling.
//!
//! Fatal conditions (unreadable PDF, missing or malformed XFA payload) and
//! per-item failures share one enum; callers decide which ones abort a run.

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting and bundling XFA data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF container could not be loaded or an object could not be resolved
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The document has no /XFA entry in its AcroForm dictionary
    #[error("No XFA found in the PDF")]
    NoXfa,

    /// The /XFA entry has a shape other than a stream or an even-length array
    #[error("XFA format not recognized: {0}")]
    UnrecognizedXfa(String),

    /// A packet name cannot be used as an output file name
    #[error("Invalid XFA packet name: {0:?}")]
    InvalidPacketName(String),

    /// Malformed XML
    #[error("XML error at byte {position}: {reason}")]
    Xml {
        /// Byte offset in the input where the error was detected
        position: usize,
        /// Reason for the failure
        reason: String,
    },

    /// UTF-8 decoding error
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
