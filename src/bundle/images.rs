//! Extraction of base64 image payloads to standalone files.

use crate::error::Result;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Standard alphabet, padding optional. Designer output is not always padded.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Extension used when an image declares no content type.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Derive a file extension from an image content type.
///
/// `image/jpeg` gives `jpeg`, `image/png;charset=binary` gives `png` and
/// `image/svg+xml` gives `svg`. A missing or empty subtype gives `png`.
pub fn extension_for(content_type: Option<&str>) -> String {
    let Some(content_type) = content_type else {
        return DEFAULT_IMAGE_EXTENSION.to_string();
    };

    let media_type = content_type.split(';').next().unwrap_or_default();
    let subtype = media_type.rsplit('/').next().unwrap_or_default();
    let subtype = subtype.split('+').next().unwrap_or_default();
    let extension: String = subtype
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if extension.is_empty() {
        DEFAULT_IMAGE_EXTENSION.to_string()
    } else {
        extension
    }
}

/// Writes decoded images as `image_<N>.<ext>` and hands back their paths.
///
/// The counter starts at zero and is advanced once per written image, so the
/// first file is `image_1`. The images directory is only created once the
/// first image is written.
#[derive(Debug)]
pub struct ImageSink {
    images_dir: PathBuf,
    link_prefix: PathBuf,
    count: usize,
}

impl ImageSink {
    /// Create a sink writing into `images_dir`, with paths reported relative
    /// to `bundle_root`.
    pub fn new(images_dir: impl Into<PathBuf>, bundle_root: &Path) -> Self {
        let images_dir = images_dir.into();
        let link_prefix = relative_to(&images_dir, bundle_root);
        Self {
            images_dir,
            link_prefix,
            count: 0,
        }
    }

    /// Number of images written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Decode `payload` and write it as the next image.
    ///
    /// Returns the image path relative to the bundle root, or `None` when
    /// the payload is empty or is not valid base64. Only filesystem failures
    /// are errors.
    pub fn store(&mut self, tag: &str, payload: &str, extension: &str) -> Result<Option<String>> {
        let compact: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if compact.is_empty() {
            return Ok(None);
        }

        let bytes = match BASE64.decode(compact.as_bytes()) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => return Ok(None),
            Err(e) => {
                log::warn!("Skipping <{}> image: payload is not valid base64 ({})", tag, e);
                return Ok(None);
            },
        };

        if self.count == 0 {
            fs::create_dir_all(&self.images_dir)?;
        }
        let file_name = format!("image_{}.{}", self.count + 1, extension);
        fs::write(self.images_dir.join(&file_name), &bytes)?;
        self.count += 1;

        log::debug!("Extracted {} ({} bytes)", file_name, bytes.len());
        Ok(Some(self.link_prefix.join(file_name).to_string_lossy().into_owned()))
    }
}

/// `path` relative to `base` when it lies underneath it, otherwise `path`.
pub(crate) fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
