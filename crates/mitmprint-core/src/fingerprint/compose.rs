//! Fingerprint composition.
//!
//! Renders records into one deterministic line. Numerals are lowercase hex
//! without leading zeros; ordered sequences join with `,`; record fields
//! join with `:`; the three sub-records join with `|` in the fixed order
//! UA, handshake, middleware. Empty sequences render as empty strings —
//! field positions are never omitted, so downstream parsers see fixed arity.

use crate::fingerprint::quirks;
use crate::fingerprint::types::{HandshakeRecord, IdentityRecord, MiddlewareRecord};
use crate::identity::version::INVALID_VERSION;

fn join_hex_u16(values: &[u16]) -> String {
    values
        .iter()
        .map(|v| format!("{v:x}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn join_hex_u8(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| format!("{v:x}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render the handshake section:
/// `version:ciphers:extensions:groups:pointFormats:headers:quirks`.
///
/// The record-layer version is captured but not part of the fingerprint.
/// An unparsed record renders as the empty string — a valid "no signal"
/// outcome, not an error.
pub fn handshake_section(record: &HandshakeRecord) -> String {
    if !record.parsed {
        return String::new();
    }
    let mut tags = record.quirks.clone();
    tags.extend(quirks::detect(record));
    format!(
        "{:x}:{}:{}:{}:{}:{}:{}",
        record.version,
        join_hex_u16(&record.cipher_suites),
        join_hex_u16(&record.extensions),
        join_hex_u16(&record.supported_groups),
        join_hex_u8(&record.ec_point_formats),
        record.headers.join(","),
        tags.join(","),
    )
}

/// Render the UA section:
/// `browser:browserVersion:platform:os:osVersion:device:quirks`
/// with categorical codes for browser/platform/os/device. A version that
/// failed validation renders as the `-1.-1.-1` sentinel in this mode.
pub fn identity_section(identity: &IdentityRecord) -> String {
    format!(
        "{}:{}:{}:{}:{}:{}:{}",
        identity.browser_code(),
        identity.browser_version.as_deref().unwrap_or(INVALID_VERSION),
        identity.platform_code(),
        identity.os_code(),
        identity.os_version.as_deref().unwrap_or(INVALID_VERSION),
        identity.device_code(),
        identity.quirks.join(","),
    )
}

/// Render the middleware section: `name:type:grade` with categorical codes.
/// `None` renders as `::` to preserve the three-field arity.
pub fn middleware_section(middleware: Option<&MiddlewareRecord>) -> String {
    match middleware {
        Some(mw) => format!("{}:{}:{}", mw.name, mw.mitm_type.code(), mw.grade.code()),
        None => "::".to_string(),
    }
}

/// Compose the full fingerprint line: `ua|handshake|middleware`.
pub fn full_fingerprint(
    identity: &IdentityRecord,
    handshake: &HandshakeRecord,
    middleware: Option<&MiddlewareRecord>,
) -> String {
    format!(
        "{}|{}|{}",
        identity_section(identity),
        handshake_section(handshake),
        middleware_section(middleware),
    )
}
