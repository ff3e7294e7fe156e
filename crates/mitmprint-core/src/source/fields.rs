//! Flat field-selected record.
//!
//! tshark's `-T json -e <field>` output is an array of packets, each
//! exposing `_source.layers` as a map from field name to an array of
//! string values. Only the last packet matters (retry/renegotiation:
//! the final ClientHello is authoritative).

use std::collections::HashMap;

use serde::Deserialize;

use crate::extract::ParseError;

#[derive(Debug, Deserialize)]
struct Packet {
    #[serde(rename = "_source")]
    source: Source,
}

#[derive(Debug, Deserialize)]
struct Source {
    layers: HashMap<String, Vec<String>>,
}

/// Field arrays of one ClientHello, keyed by tshark field name.
#[derive(Debug, Default)]
pub struct FieldRecord {
    layers: HashMap<String, Vec<String>>,
}

impl FieldRecord {
    /// Values for a field, empty when the field was absent.
    pub fn values(&self, field: &str) -> &[String] {
        self.layers.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.values(field).first().map(String::as_str)
    }
}

/// Decode the field-selected JSON and keep the last packet's layers.
/// Returns `None` when the decoder matched no packets — a valid "no
/// signal" outcome, not an error.
pub fn parse_field_record(input: &str) -> Result<Option<FieldRecord>, ParseError> {
    let packets: Vec<Packet> =
        serde_json::from_str(input).map_err(|e| ParseError::Malformed(e.to_string()))?;
    Ok(packets
        .into_iter()
        .last()
        .map(|p| FieldRecord { layers: p.source.layers }))
}
