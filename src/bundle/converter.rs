//! Conversion of a directory of XML packets into one JSON bundle.

use super::fold::{fold_element, FoldedNode};
use super::images::{relative_to, ImageSink};
use crate::error::Result;
use crate::xml::{parse_document, strip_processing_instructions, Element};
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Bundle key holding the images directory.
pub const IMAGE_FOLDER_KEY: &str = "image_folder";

/// All folded documents of a run, keyed by XML file stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    /// Folded root element per file, in file-name order
    pub documents: IndexMap<String, FoldedNode>,
    /// Images directory relative to the XML directory, when images were extracted
    pub image_folder: Option<String>,
}

impl Bundle {
    /// Serialize as 2-space indented JSON; non-ASCII text is kept as is.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for Bundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = self.documents.len() + usize::from(self.image_folder.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, node) in &self.documents {
            map.serialize_entry(key, node)?;
        }
        if let Some(folder) = &self.image_folder {
            map.serialize_entry(IMAGE_FOLDER_KEY, folder)?;
        }
        map.end()
    }
}

/// Outcome of a bundle conversion.
#[derive(Debug, Clone, Default)]
pub struct BundleSummary {
    /// Where the bundle was written
    pub bundle_path: PathBuf,
    /// Files folded into the bundle
    pub documents: usize,
    /// Files that could not be read or parsed, or whose name is reserved
    pub skipped: Vec<PathBuf>,
    /// Images written
    pub images: usize,
}

/// Folds XML files, a given list or every `*.xml` of a directory, into a [`Bundle`].
#[derive(Debug, Clone)]
pub struct BundleConverter {
    xml_dir: PathBuf,
    images_dir: PathBuf,
    bundle_path: PathBuf,
}

impl BundleConverter {
    /// Create a converter reading `xml_dir`, writing images to `images_dir`
    /// and the bundle to `bundle_path`.
    pub fn new(
        xml_dir: impl Into<PathBuf>,
        images_dir: impl Into<PathBuf>,
        bundle_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            xml_dir: xml_dir.into(),
            images_dir: images_dir.into(),
            bundle_path: bundle_path.into(),
        }
    }

    /// Build the bundle from every `*.xml` file in the XML directory and
    /// write it, along with any extracted images.
    pub fn convert(&self) -> Result<BundleSummary> {
        let files = list_xml_files(&self.xml_dir)?;
        self.convert_files(&files)
    }

    /// Like [`convert`](Self::convert), but folds only `files`.
    pub fn convert_files(&self, files: &[PathBuf]) -> Result<BundleSummary> {
        let (bundle, summary) = self.build_from(files)?;

        if let Some(parent) = self.bundle_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.bundle_path, bundle.to_json_string()?)?;
        log::info!("Wrote {}", self.bundle_path.display());

        Ok(summary)
    }

    /// Fold every XML file of the XML directory into a bundle. Images are
    /// written as they are found; the bundle itself is not written.
    pub fn build(&self) -> Result<(Bundle, BundleSummary)> {
        let files = list_xml_files(&self.xml_dir)?;
        self.build_from(&files)
    }

    /// Fold the given XML files into a bundle, in file-name order. A path
    /// listed more than once is folded once.
    pub fn build_from(&self, files: &[PathBuf]) -> Result<(Bundle, BundleSummary)> {
        let mut files = files.to_vec();
        files.sort();
        files.dedup();

        let bundle_root = self.bundle_path.parent().unwrap_or_else(|| Path::new(""));
        let mut sink = ImageSink::new(&self.images_dir, bundle_root);
        let mut bundle = Bundle::default();
        let mut summary = BundleSummary {
            bundle_path: self.bundle_path.clone(),
            ..Default::default()
        };

        for path in files {
            let key = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            if key == IMAGE_FOLDER_KEY {
                log::warn!(
                    "Skipping {}: \"{}\" is reserved in the bundle",
                    path.display(),
                    IMAGE_FOLDER_KEY
                );
                summary.skipped.push(path);
                continue;
            }

            let root = match read_xml_file(&path) {
                Ok(root) => root,
                Err(e) => {
                    log::error!("Error parsing {}: {}", path.display(), e);
                    summary.skipped.push(path);
                    continue;
                },
            };

            let node = fold_element(&root, &mut sink)?;
            log::debug!("Folded {} as \"{}\"", path.display(), key);
            bundle.documents.insert(key, node);
        }

        summary.documents = bundle.documents.len();
        summary.images = sink.count();
        if sink.count() > 0 {
            let folder = relative_to(&self.images_dir, &self.xml_dir);
            bundle.image_folder = Some(folder.to_string_lossy().into_owned());
        }

        Ok((bundle, summary))
    }
}

/// `*.xml` files directly inside `dir`, sorted by file name.
fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn read_xml_file(path: &Path) -> Result<Element> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    parse_document(&strip_processing_instructions(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[test]
    fn test_bundle_keys_by_file_stem() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("template.xml"),
            "<?xml version=\"1.0\"?>\n<template>\n  <subform name=\"A\"/>\n</template>\n",
        )
        .unwrap();
        fs::write(dir.path().join("datasets.xml"), "<datasets><data>x</data></datasets>").unwrap();
        fs::write(dir.path().join("notes.txt"), "<ignored/>").unwrap();

        let bundle_path = dir.path().join("xfa_bundle.json");
        let converter = BundleConverter::new(dir.path(), dir.path().join("images"), &bundle_path);
        let summary = converter.convert().unwrap();

        assert_eq!(summary.documents, 2);
        assert_eq!(summary.images, 0);
        let json: Value = serde_json::from_str(&fs::read_to_string(&bundle_path).unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "datasets": {"data": "x"},
                "template": {"subform": {"@name": "A"}}
            })
        );
        assert!(!dir.path().join("images").exists());
    }

    #[test]
    fn test_unparseable_file_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.xml"), "<xdp:xdp xmlns:xdp=\"http://ns.adobe.com/xdp/\">").unwrap();
        fs::write(dir.path().join("config.xml"), "<config><present>print</present></config>").unwrap();

        let converter = BundleConverter::new(
            dir.path(),
            dir.path().join("images"),
            dir.path().join("xfa_bundle.json"),
        );
        let (bundle, summary) = converter.build().unwrap();

        assert_eq!(bundle.documents.len(), 1);
        assert!(bundle.documents.contains_key("config"));
        assert_eq!(summary.skipped, vec![dir.path().join("broken.xml")]);
    }

    #[test]
    fn test_image_folder_is_added_when_images_extracted() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("template.xml"),
            "<template><draw><value><image contentType=\"image/png\">aGVsbG8=</image></value></draw></template>",
        )
        .unwrap();

        let bundle_path = dir.path().join("xfa_bundle.json");
        let converter = BundleConverter::new(dir.path(), dir.path().join("images"), &bundle_path);
        let summary = converter.convert().unwrap();
        assert_eq!(summary.images, 1);

        let json: Value = serde_json::from_str(&fs::read_to_string(&bundle_path).unwrap()).unwrap();
        assert_eq!(json["image_folder"], "images");
        let image_path = json["template"]["draw"]["value"]["image"]["image_path"]
            .as_str()
            .unwrap();
        assert_eq!(Path::new(image_path), Path::new("images").join("image_1.png"));
        assert_eq!(fs::read(dir.path().join(image_path)).unwrap(), b"hello");
    }

    #[test]
    fn test_json_output_format() {
        let mut bundle = Bundle::default();
        bundle
            .documents
            .insert("form".to_string(), FoldedNode::Text("Grüße".to_string()));
        bundle.image_folder = Some("images".to_string());

        let json = bundle.to_json_string().unwrap();
        assert_eq!(json, "{\n  \"form\": \"Grüße\",\n  \"image_folder\": \"images\"\n}");
    }

    #[test]
    fn test_build_from_ignores_other_files_in_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("template.xml"), "<template><subform/></template>").unwrap();
        fs::write(dir.path().join("pom.xml"), "<project><artifactId>x</artifactId></project>").unwrap();

        let converter = BundleConverter::new(
            dir.path(),
            dir.path().join("images"),
            dir.path().join("xfa_bundle.json"),
        );
        let template = dir.path().join("template.xml");
        let (bundle, summary) = converter.build_from(&[template.clone(), template]).unwrap();

        assert_eq!(summary.documents, 1);
        assert_eq!(bundle.documents.keys().collect::<Vec<_>>(), vec!["template"]);
    }

    #[test]
    fn test_reserved_document_name_is_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("image_folder.xml"), "<image_folder>1</image_folder>").unwrap();
        fs::write(
            dir.path().join("template.xml"),
            "<template><image contentType=\"image/png\">aGVsbG8=</image></template>",
        )
        .unwrap();

        let bundle_path = dir.path().join("xfa_bundle.json");
        let converter = BundleConverter::new(dir.path(), dir.path().join("images"), &bundle_path);
        let summary = converter.convert().unwrap();

        assert_eq!(summary.documents, 1);
        assert_eq!(summary.skipped, vec![dir.path().join("image_folder.xml")]);
        let raw = fs::read_to_string(&bundle_path).unwrap();
        assert_eq!(raw.matches("\"image_folder\"").count(), 1);
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["image_folder"], "images");
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = tempdir().unwrap();
        let converter = BundleConverter::new(
            dir.path().join("missing"),
            dir.path().join("images"),
            dir.path().join("xfa_bundle.json"),
        );
        assert!(converter.convert().is_err());
    }
}
