//! Normalized XFA payload representation.
//!
//! The /XFA entry of a PDF form comes either as one stream or as a flat
//! array alternating packet names and packet data. Both shapes, and the
//! name-to-data mapping form, end up as an ordered list of [`XfaPacket`]s.

use crate::error::{Error, Result};
use std::borrow::Cow;

/// One named XML segment of an XFA form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XfaPacket {
    /// Packet name (`template`, `datasets`, `config`, ...)
    pub name: String,
    /// Raw packet bytes, normally UTF-8 XML
    pub data: Vec<u8>,
}

impl XfaPacket {
    /// Create a packet.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Packet data as text, invalid UTF-8 sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// The XFA content of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XfaPayload {
    /// Document carries no XFA packets
    Absent,
    /// Packets in source order
    Packets(Vec<XfaPacket>),
}

impl XfaPayload {
    /// Build a payload from `(name, data)` pairs.
    pub fn from_mapping<I, N, D>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<Vec<u8>>,
    {
        let packets: Vec<XfaPacket> = pairs
            .into_iter()
            .map(|(name, data)| XfaPacket::new(name, data))
            .collect();
        Self::from_packets(packets)
    }

    /// Build a payload from a flat `[name, data, name, data, ...]` sequence.
    ///
    /// Names are decoded as UTF-8 with invalid sequences replaced. A sequence
    /// of odd length is rejected.
    pub fn from_flat_sequence<I, E>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Vec<u8>>,
    {
        let items: Vec<Vec<u8>> = items.into_iter().map(Into::into).collect();
        if items.len() % 2 != 0 {
            return Err(Error::UnrecognizedXfa(format!(
                "array of odd length {} (expected name/data pairs)",
                items.len()
            )));
        }

        let mut packets = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(name), Some(data)) = (iter.next(), iter.next()) {
            packets.push(XfaPacket::new(String::from_utf8_lossy(&name).into_owned(), data));
        }
        Ok(Self::from_packets(packets))
    }

    fn from_packets(packets: Vec<XfaPacket>) -> Self {
        if packets.is_empty() {
            Self::Absent
        } else {
            Self::Packets(packets)
        }
    }

    /// True when there is nothing to export.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Packets, empty when absent.
    pub fn packets(&self) -> &[XfaPacket] {
        match self {
            Self::Absent => &[],
            Self::Packets(packets) => packets,
        }
    }

    /// Take the packets, failing with [`Error::NoXfa`] when absent.
    pub fn into_packets(self) -> Result<Vec<XfaPacket>> {
        match self {
            Self::Absent => Err(Error::NoXfa),
            Self::Packets(packets) => Ok(packets),
        }
    }
}
