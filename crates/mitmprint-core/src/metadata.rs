//! Metadata-mode output.
//!
//! Instead of a composed fingerprint line, this mode emits one JSON object
//! describing a labeled capture: the description, a provenance comment,
//! the source file path(s), and the normalized records as key-value maps.
//! The label grammar to apply is driven by the corpus directory layout:
//! a `browsers` component means UA-labeled, `antivirus` means
//! middleware-labeled (type Antivirus), `middleboxes` means the whole
//! description is a proxy name.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::fingerprint::types::{IdentityRecord, MiddlewareRecord, MitmType};
use crate::identity::normalize::{normalize, RawIdentity};
use crate::label::{self, LabelError};

/// Only files with this exact name carry handshake captures in the corpus.
pub const HANDSHAKE_PCAP: &str = "handshake.pcap";
const HEADER_PCAP: &str = "header.pcap";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not a handshake capture: expected a file named '{HANDSHAKE_PCAP}'")]
    NotHandshakeCapture,
    #[error(transparent)]
    Label(#[from] LabelError),
}

/// Normalized identity as key-value strings. In this output mode a version
/// that failed validation renders as the empty string, not `-1.-1.-1`.
#[derive(Debug, Serialize)]
pub struct IdentityView {
    pub browser: String,
    pub browser_version: String,
    pub platform: String,
    pub os: String,
    pub os_version: String,
    pub device: String,
}

impl From<&IdentityRecord> for IdentityView {
    fn from(id: &IdentityRecord) -> Self {
        Self {
            browser: id.browser.clone(),
            browser_version: id.browser_version.clone().unwrap_or_default(),
            platform: id.platform.clone(),
            os: id.os.clone(),
            os_version: id.os_version.clone().unwrap_or_default(),
            device: id.device.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MiddlewareView {
    /// Reserved: raw user-agent advertised by the middleware, when known.
    pub raw_ua: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mitm_type: String,
}

impl From<&MiddlewareRecord> for MiddlewareView {
    fn from(mw: &MiddlewareRecord) -> Self {
        Self {
            raw_ua: String::new(),
            name: mw.name.clone(),
            mitm_type: mw.mitm_type.as_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetadataRecord {
    pub desc: String,
    pub comment: String,
    pub handshake_pcap: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_pcap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua_fingerprint: Option<IdentityView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middleware_fingerprint: Option<MiddlewareView>,
}

/// Build the metadata record for one labeled capture path. `tool` names
/// the producing program for the provenance comment.
pub fn build(path: &Path, tool: &str) -> Result<MetadataRecord, MetadataError> {
    if path.file_name().and_then(|n| n.to_str()) != Some(HANDSHAKE_PCAP) {
        return Err(MetadataError::NotHandshakeCapture);
    }
    let desc = label::description_from_path(path)?;

    let mut record = MetadataRecord {
        desc: desc.clone(),
        comment: format!("generated by {tool}"),
        handshake_pcap: path.to_string_lossy().into_owned(),
        header_pcap: sibling_header(path),
        ua_fingerprint: None,
        middleware_fingerprint: None,
    };

    let dirname = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    if dirname.contains("browsers") {
        let identity = normalize(label::parse_ua(&desc)?);
        record.ua_fingerprint = Some(IdentityView::from(&identity));
    } else if dirname.contains("antivirus") {
        let (raw, name) = label::parse_mitm(&desc)?;
        let identity = normalize(raw);
        let middleware = MiddlewareRecord::from_raw_name(&name, Some(MitmType::Antivirus));
        record.ua_fingerprint = Some(IdentityView::from(&identity));
        record.middleware_fingerprint = Some(MiddlewareView::from(&middleware));
    } else if dirname.contains("middleboxes") {
        // No client identity is labeled; the description is the proxy name.
        let identity = normalize(RawIdentity::default());
        let middleware = MiddlewareRecord::from_raw_name(&desc, Some(MitmType::Proxy));
        record.ua_fingerprint = Some(IdentityView::from(&identity));
        record.middleware_fingerprint = Some(MiddlewareView::from(&middleware));
    }

    Ok(record)
}

fn sibling_header(path: &Path) -> Option<String> {
    let header = path.parent()?.join(HEADER_PCAP);
    header
        .exists()
        .then(|| header.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rejects_other_file_names() {
        let err = build(Path::new("browsers/Computer-Windows-10-Chrome-54/other.pcap"), "t");
        assert!(matches!(err, Err(MetadataError::NotHandshakeCapture)));
    }

    #[test]
    fn ua_corpus_builds_identity_only() {
        let path = PathBuf::from("data/browsers/Computer-Windows-8.1-Chrome-54/handshake.pcap");
        let record = build(&path, "mitmprint").unwrap();
        assert_eq!(record.desc, "Computer-Windows-8.1-Chrome-54");
        assert_eq!(record.comment, "generated by mitmprint");
        let ua = record.ua_fingerprint.unwrap();
        assert_eq!(ua.browser, "Chrome");
        assert_eq!(ua.os_version, "6.3.0");
        assert!(record.middleware_fingerprint.is_none());
    }

    #[test]
    fn antivirus_corpus_builds_middleware() {
        let path = PathBuf::from("data/antivirus/windows-10-avast-free-chrome-54/handshake.pcap");
        let record = build(&path, "mitmprint").unwrap();
        let mw = record.middleware_fingerprint.unwrap();
        assert_eq!(mw.name, "avast-free");
        assert_eq!(mw.mitm_type, "Antivirus");
        assert_eq!(record.ua_fingerprint.unwrap().os, "Windows");
    }

    #[test]
    fn antivirus_none_token_clears_middleware_identity() {
        let path = PathBuf::from("data/antivirus/windows-10-none-chrome-54/handshake.pcap");
        let record = build(&path, "mitmprint").unwrap();
        let mw = record.middleware_fingerprint.unwrap();
        assert_eq!(mw.name, "");
        assert_eq!(mw.mitm_type, "");
    }

    #[test]
    fn middlebox_corpus_uses_description_as_proxy_name() {
        let path = PathBuf::from("data/middleboxes/bluecoat-proxysg/handshake.pcap");
        let record = build(&path, "mitmprint").unwrap();
        let mw = record.middleware_fingerprint.unwrap();
        assert_eq!(mw.name, "bluecoat-proxysg");
        assert_eq!(mw.mitm_type, "Proxy");
    }

    #[test]
    fn invalid_versions_render_as_empty_strings() {
        let path = PathBuf::from("data/browsers/Computer-Windows-Vista-chrome-nightly/handshake.pcap");
        let record = build(&path, "mitmprint").unwrap();
        let ua = record.ua_fingerprint.unwrap();
        assert_eq!(ua.browser_version, "");
        assert_eq!(ua.os_version, "");
    }

    #[test]
    fn grammar_mismatch_is_an_error() {
        let path = PathBuf::from("data/browsers/not_a_label/handshake.pcap");
        assert!(build(&path, "mitmprint").is_err());
    }
}
