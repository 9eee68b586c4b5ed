//! Extract XFA packets from a PDF and bundle them as JSON.
//!
//! Usage:
//!   cargo run --release --bin xfa_bundle -- form.pdf --output-dir out
//!
//! Writes `<packet>.xml` files, `images/image_<N>.<ext>` and
//! `xfa_bundle.json` under the output directory. Set `RUST_LOG` to change
//! the log level.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use xfa_bundle::config::{
    ExportConfig, DEFAULT_BUNDLE_FILE_NAME, DEFAULT_IMAGES_DIR_NAME, DEFAULT_PDF_PATH,
};
use xfa_bundle::pipeline;

#[derive(Parser)]
#[command(
    name = "xfa_bundle",
    version,
    about = "Extract XFA form packets from a PDF into XML files and a JSON bundle"
)]
struct Cli {
    /// Path to the PDF file
    #[arg(default_value = DEFAULT_PDF_PATH)]
    pdf: PathBuf,

    /// Directory for XML packets, images and the bundle
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Images directory name, relative to the output directory
    #[arg(long, default_value = DEFAULT_IMAGES_DIR_NAME)]
    images_dir: String,

    /// Bundle file name, relative to the output directory
    #[arg(long, default_value = DEFAULT_BUNDLE_FILE_NAME)]
    bundle_name: String,

    /// Spaces per indentation level in the exported XML
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let config = ExportConfig::new(cli.pdf, cli.output_dir)
        .with_images_dir_name(cli.images_dir)
        .with_bundle_file_name(cli.bundle_name)
        .with_indent(cli.indent);

    match pipeline::run(&config) {
        Ok(summary) => {
            if !summary.export.failed.is_empty() || !summary.bundle.skipped.is_empty() {
                log::warn!(
                    "{} packets and {} XML files were skipped",
                    summary.export.failed.len(),
                    summary.bundle.skipped.len()
                );
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["xfa_bundle"]);
        assert_eq!(cli.pdf, PathBuf::from("xfa-example.pdf"));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.images_dir, "images");
        assert_eq!(cli.bundle_name, "xfa_bundle.json");
        assert_eq!(cli.indent, 2);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["xfa_bundle", "form.pdf", "-o", "out", "--indent", "4", "-v"]);
        assert_eq!(cli.pdf, PathBuf::from("form.pdf"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.indent, 4);
        assert!(cli.verbose);
    }
}
