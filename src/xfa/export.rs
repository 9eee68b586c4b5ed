//! Writing XFA packets to pretty-printed XML files.

use super::payload::XfaPacket;
use crate::error::{Error, Result};
use crate::xml::{parse_document, to_pretty_string};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of exporting a set of packets.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Files written, in packet order
    pub written: Vec<PathBuf>,
    /// Packets that could not be exported, with the reason
    pub failed: Vec<(String, String)>,
}

/// Export every packet to `<output_dir>/<name>.xml`.
///
/// The output directory is created if needed. A packet that fails to parse
/// or write is logged and skipped. Packets sharing a name overwrite each
/// other, last one wins.
pub fn export_packets(
    packets: &[XfaPacket],
    output_dir: &Path,
    indent: usize,
) -> Result<ExportSummary> {
    fs::create_dir_all(output_dir)?;

    let mut summary = ExportSummary::default();
    let mut seen = HashSet::new();

    for packet in packets {
        match export_packet(packet, output_dir, indent) {
            Ok(path) => {
                if !seen.insert(packet.name.as_str()) {
                    log::warn!(
                        "XFA packet \"{}\" appears more than once; {} overwritten",
                        packet.name,
                        path.display()
                    );
                }
                log::info!("Exported {}", path.display());
                summary.written.push(path);
            },
            Err(e) => {
                log::error!("Error parsing/writing XML for {}: {}", packet.name, e);
                summary.failed.push((packet.name.clone(), e.to_string()));
            },
        }
    }

    Ok(summary)
}

/// Parse one packet, pretty-print it and write it under `output_dir`.
pub fn export_packet(packet: &XfaPacket, output_dir: &Path, indent: usize) -> Result<PathBuf> {
    let file_name = packet_file_name(&packet.name)?;
    let root = parse_document(&packet.text())?;
    let pretty = to_pretty_string(&root, indent)?;

    let path = output_dir.join(file_name);
    fs::write(&path, pretty)?;
    Ok(path)
}

/// `<name>.xml`, refusing names that would escape the output directory.
fn packet_file_name(name: &str) -> Result<String> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if invalid {
        return Err(Error::InvalidPacketName(name.to_string()));
    }
    Ok(format!("{}.xml", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_pretty_files() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let packets = vec![XfaPacket::new("template", r#"<template><subform name="A"/></template>"#)];

        let summary = export_packets(&packets, &out, 2).unwrap();

        assert_eq!(summary.written, vec![out.join("template.xml")]);
        let text = fs::read_to_string(out.join("template.xml")).unwrap();
        assert!(text.contains("\n  <subform name=\"A\"/>"));
    }

    #[test]
    fn test_bad_packet_does_not_stop_others() {
        let dir = tempdir().unwrap();
        let packets = vec![
            XfaPacket::new("preamble", r#"<xdp:xdp xmlns:xdp="http://ns.adobe.com/xdp/">"#),
            XfaPacket::new("config", "<config><present/></config>"),
            XfaPacket::new("postamble", "</xdp:xdp>"),
        ];

        let summary = export_packets(&packets, dir.path(), 2).unwrap();

        assert_eq!(summary.written, vec![dir.path().join("config.xml")]);
        let failed: Vec<&str> = summary.failed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(failed, vec!["preamble", "postamble"]);
        assert!(!dir.path().join("preamble.xml").exists());
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let dir = tempdir().unwrap();
        let packets = vec![
            XfaPacket::new("form", "<form><first/></form>"),
            XfaPacket::new("form", "<form><second/></form>"),
        ];

        let summary = export_packets(&packets, dir.path(), 2).unwrap();

        assert_eq!(summary.written.len(), 2);
        let text = fs::read_to_string(dir.path().join("form.xml")).unwrap();
        assert!(text.contains("<second/>"));
        assert!(!text.contains("<first/>"));
    }

    #[test]
    fn test_unsafe_packet_names_are_rejected() {
        let dir = tempdir().unwrap();
        let packets = vec![
            XfaPacket::new("../escape", "<a/>"),
            XfaPacket::new("", "<a/>"),
            XfaPacket::new("sub\\dir", "<a/>"),
        ];

        let summary = export_packets(&packets, dir.path(), 2).unwrap();

        assert!(summary.written.is_empty());
        assert_eq!(summary.failed.len(), 3);
        assert!(!dir.path().parent().unwrap().join("escape.xml").exists());
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_fatal() {
        let dir = tempdir().unwrap();
        let mut data = b"<datasets><name>Jos".to_vec();
        data.push(0xE9);
        data.extend_from_slice(b"</name></datasets>");
        let packets = vec![XfaPacket::new("datasets", data)];

        let summary = export_packets(&packets, dir.path(), 2).unwrap();

        assert_eq!(summary.written.len(), 1);
        let text = fs::read_to_string(dir.path().join("datasets.xml")).unwrap();
        assert!(text.contains("Jos\u{FFFD}"));
    }
}
