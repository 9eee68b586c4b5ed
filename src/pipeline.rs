//! End-to-end run: PDF to XML packets to JSON bundle.

use crate::bundle::{BundleConverter, BundleSummary};
use crate::config::ExportConfig;
use crate::error::Result;
use crate::xfa::{export_packets, ExportSummary, XfaExtractor};

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Packet export results
    pub export: ExportSummary,
    /// Bundle conversion results
    pub bundle: BundleSummary,
}

/// Extract the XFA packets of `config.pdf_path` and bundle them.
///
/// Fails before anything is written when the PDF cannot be loaded or has no
/// usable XFA payload. Individual packets and XML files that fail are
/// logged and skipped.
///
/// # Example
///
/// ```no_run
/// use xfa_bundle::config::ExportConfig;
/// use xfa_bundle::pipeline;
///
/// let config = ExportConfig::new("form.pdf", "out");
/// let summary = pipeline::run(&config)?;
/// println!("{} images", summary.bundle.images);
/// # Ok::<(), xfa_bundle::error::Error>(())
/// ```
pub fn run(config: &ExportConfig) -> Result<RunSummary> {
    log::debug!("Opening {}", config.pdf_path.display());
    let extractor = XfaExtractor::open(&config.pdf_path)?;
    let packets = extractor.extract_payload()?.into_packets()?;
    log::debug!("Found {} XFA packets", packets.len());

    let export = export_packets(&packets, config.xml_dir(), config.indent)?;

    let converter =
        BundleConverter::new(config.xml_dir(), config.images_dir(), config.bundle_path());
    let bundle = converter.convert_files(&export.written)?;

    log::info!(
        "Done: {} XML files, {} images, bundle at {}",
        export.written.len(),
        bundle.images,
        bundle.bundle_path.display()
    );

    Ok(RunSummary { export, bundle })
}
