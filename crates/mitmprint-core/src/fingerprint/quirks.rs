//! Structural anomaly detection.
//!
//! Rules are evaluated independently, in order, immediately before
//! composition; each appends at most one tag. New checks slot into `RULES`
//! without touching the composer.

use crate::fingerprint::types::HandshakeRecord;

pub struct QuirkRule {
    pub tag: &'static str,
    pub applies: fn(&HandshakeRecord) -> bool,
}

pub const RULES: &[QuirkRule] = &[QuirkRule {
    tag: "compr",
    applies: |record| record.compression_methods.len() > 1,
}];

/// Tags for every rule that fires on this record, in rule order.
pub fn detect(record: &HandshakeRecord) -> Vec<String> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(record))
        .map(|rule| rule.tag.to_string())
        .collect()
}
