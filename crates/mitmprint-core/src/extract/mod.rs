//! Handshake extraction.
//!
//! Walks the Raw Field Source output (PDML tree or flat field record) and
//! isolates the single authoritative TLS ClientHello. If a capture holds
//! several ClientHellos (retries, renegotiation), the last one wins and
//! earlier state is discarded, never merged.
//!
//! Requires tshark >= 3 field names (`tls.*`).

use thiserror::Error;
use tracing::debug;

use crate::fingerprint::types::HandshakeRecord;
use crate::source::fields::FieldRecord;
use crate::source::pdml::FieldNode;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed decoder output: {0}")]
    Malformed(String),
    #[error("bad numeral '{value}' in field {field}")]
    BadNumeral { field: &'static str, value: String },
}

const EXT_SUPPORTED_GROUPS: u16 = 10;
const EXT_EC_POINT_FORMATS: u16 = 11;
const EXT_SIGNATURE_ALGORITHMS: u16 = 13;

fn hex_u16(field: &'static str, value: &str) -> Result<u16, ParseError> {
    u16::from_str_radix(value.trim_start_matches("0x"), 16).map_err(|_| ParseError::BadNumeral {
        field,
        value: value.to_string(),
    })
}

fn hex_u8(field: &'static str, value: &str) -> Result<u8, ParseError> {
    u8::from_str_radix(value.trim_start_matches("0x"), 16).map_err(|_| ParseError::BadNumeral {
        field,
        value: value.to_string(),
    })
}

fn dec_u16(field: &'static str, value: &str) -> Result<u16, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumeral {
        field,
        value: value.to_string(),
    })
}

fn dec_u8(field: &'static str, value: &str) -> Result<u8, ParseError> {
    value.parse().map_err(|_| ParseError::BadNumeral {
        field,
        value: value.to_string(),
    })
}

/// Extract the authoritative ClientHello from a PDML field tree.
///
/// `parsed` stays false when no ClientHello exists in the capture; that is
/// a valid "no signal" outcome the caller must check, not an error.
pub fn from_pdml(root: &FieldNode) -> Result<HandshakeRecord, ParseError> {
    let mut result = HandshakeRecord::default();
    let mut hellos = 0usize;

    for packet in root.children_named("packet") {
        for proto in packet.children_named("tls") {
            for record in proto.children_named("tls.record") {
                // Each record starts from scratch so the final in-file
                // ClientHello always wins.
                if let Some(candidate) = parse_record(record)? {
                    hellos += 1;
                    result = candidate;
                }
            }
        }
    }

    if hellos > 1 {
        debug!("capture held {hellos} ClientHellos; keeping the last");
    }
    Ok(result)
}

/// Parse one `tls.record` subtree; `Ok(None)` when it is not a ClientHello.
fn parse_record(record: &FieldNode) -> Result<Option<HandshakeRecord>, ParseError> {
    let mut out = HandshakeRecord::default();

    if let Some(v) = record.child_value("tls.record.version") {
        out.record_version = hex_u16("tls.record.version", v)?;
    }

    for handshake in record.children_named("tls.handshake") {
        // Handshake type 1 = ClientHello; everything else is ignored.
        let is_client_hello = handshake
            .children_named("tls.handshake.type")
            .filter_map(|f| f.value.as_deref())
            .any(|v| hex_u8("tls.handshake.type", v).is_ok_and(|t| t == 1));
        if !is_client_hello {
            continue;
        }

        if let Some(v) = handshake.child_value("tls.handshake.version") {
            out.version = hex_u16("tls.handshake.version", v)?;
        }

        for suites in handshake.children_named("tls.handshake.ciphersuites") {
            for suite in suites.children_named("tls.handshake.ciphersuite") {
                if let Some(v) = suite.value.as_deref() {
                    out.cipher_suites.push(hex_u16("tls.handshake.ciphersuite", v)?);
                }
            }
        }

        for methods in handshake.children_named("tls.handshake.comp_methods") {
            for method in methods.children_named("tls.handshake.comp_method") {
                if let Some(v) = method.value.as_deref() {
                    out.compression_methods
                        .push(hex_u8("tls.handshake.comp_method", v)?);
                }
            }
        }

        // Extension containers are the nameless children of the handshake.
        for ext in handshake.children_named("") {
            parse_extension(ext, &mut out)?;
        }

        out.parsed = true;
    }

    Ok(out.parsed.then_some(out))
}

fn parse_extension(ext: &FieldNode, out: &mut HandshakeRecord) -> Result<(), ParseError> {
    let mut ext_type = None;
    for field in ext.children_named("tls.handshake.extension.type") {
        if let Some(v) = field.value.as_deref() {
            let code = hex_u16("tls.handshake.extension.type", v)?;
            out.extensions.push(code);
            ext_type = Some(code);
        }
    }

    match ext_type {
        Some(EXT_SUPPORTED_GROUPS) => {
            for groups in ext.children_named("tls.handshake.extensions_supported_groups") {
                for group in groups.children_named("tls.handshake.extensions_supported_group") {
                    if let Some(v) = group.value.as_deref() {
                        out.supported_groups
                            .push(hex_u16("tls.handshake.extensions_supported_group", v)?);
                    }
                }
            }
        }
        Some(EXT_EC_POINT_FORMATS) => {
            for formats in ext.children_named("tls.handshake.extensions_ec_point_formats") {
                for format in formats.children_named("tls.handshake.extensions_ec_point_format") {
                    if let Some(v) = format.value.as_deref() {
                        out.ec_point_formats
                            .push(hex_u8("tls.handshake.extensions_ec_point_format", v)?);
                    }
                }
            }
        }
        Some(EXT_SIGNATURE_ALGORITHMS) => {
            for algs in ext.children_named("tls.handshake.sig_hash_algs") {
                for alg in algs.children_named("tls.handshake.sig_hash_alg") {
                    if let Some(v) = alg.value.as_deref() {
                        out.signature_algorithms
                            .push(hex_u16("tls.handshake.sig_hash_alg", v)?);
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Extract a `HandshakeRecord` from the flat field-selected record.
///
/// The field-selected mode filters to ClientHello packets upstream, so a
/// present record is a ClientHello by construction. Numeral bases differ
/// per field: versions and supported groups arrive as hex (optionally
/// `0x`-prefixed), everything else as decimal.
pub fn from_field_record(record: Option<&FieldRecord>) -> Result<HandshakeRecord, ParseError> {
    let Some(record) = record else {
        return Ok(HandshakeRecord::default());
    };

    let mut out = HandshakeRecord::default();

    let version = record
        .first("tls.handshake.version")
        .ok_or_else(|| ParseError::Malformed("missing tls.handshake.version".into()))?;
    out.version = hex_u16("tls.handshake.version", version)?;

    if let Some(v) = record.first("tls.record.version") {
        out.record_version = hex_u16("tls.record.version", v)?;
    }

    for v in record.values("tls.handshake.ciphersuite") {
        out.cipher_suites.push(dec_u16("tls.handshake.ciphersuite", v)?);
    }
    for v in record.values("tls.handshake.comp_method") {
        out.compression_methods
            .push(dec_u8("tls.handshake.comp_method", v)?);
    }
    for v in record.values("tls.handshake.extension.type") {
        out.extensions.push(dec_u16("tls.handshake.extension.type", v)?);
    }

    // Nested lists are only meaningful when their extension is advertised.
    if out.extensions.contains(&EXT_SUPPORTED_GROUPS) {
        for v in record.values("tls.handshake.extensions_supported_group") {
            out.supported_groups
                .push(hex_u16("tls.handshake.extensions_supported_group", v)?);
        }
    }
    if out.extensions.contains(&EXT_EC_POINT_FORMATS) {
        for v in record.values("tls.handshake.extensions_ec_point_format") {
            out.ec_point_formats
                .push(dec_u8("tls.handshake.extensions_ec_point_format", v)?);
        }
    }
    if out.extensions.contains(&EXT_SIGNATURE_ALGORITHMS) {
        for v in record.values("tls.handshake.sig_hash_alg") {
            out.signature_algorithms
                .push(hex_u16("tls.handshake.sig_hash_alg", v)?);
        }
    }

    out.parsed = true;
    Ok(out)
}
