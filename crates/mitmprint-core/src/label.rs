//! Directory-naming label grammar.
//!
//! Ground-truth identity metadata rides in the capture's parent directory
//! name as dash-separated tokens:
//!
//! - UA-labeled: `device-os-osVersion-browser-browserVersion`
//! - middleware-labeled: `os-osVersion-middlewareName-browser-browserVersion`
//!   (the middleware name may itself contain dashes; the match is greedy)
//!
//! A description that fails its grammar is a hard error — the caller exits
//! nonzero with no partial output.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::identity::normalize::RawIdentity;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("description '{0}' does not match the expected dash-separated grammar")]
    Grammar(String),
    #[error("capture path has no labeled parent directory")]
    NoDescription,
}

static UA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]+)-([^-]+)-([^-]+)-([^-]+)-([^-]+)$").expect("static regex"));

static MITM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]+)-([^-]+)-(.+)-([^-]+)-([^-]+)$").expect("static regex"));

/// The capture's parent directory name, which carries the description.
pub fn description_from_path(path: &Path) -> Result<String, LabelError> {
    path.parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .ok_or(LabelError::NoDescription)
}

/// Parse a UA-labeled description. The platform is seeded from the OS
/// token; the normalizer rewrites both independently afterwards.
pub fn parse_ua(description: &str) -> Result<RawIdentity, LabelError> {
    let caps = UA_RE
        .captures(description)
        .ok_or_else(|| LabelError::Grammar(description.to_string()))?;
    let os = caps[2].to_string();
    Ok(RawIdentity {
        device: caps[1].to_string(),
        platform: os.clone(),
        os,
        os_version: caps[3].to_string(),
        browser: caps[4].to_string(),
        browser_version: caps[5].to_string(),
    })
}

/// Parse a middleware-labeled description, returning the raw identity and
/// the raw middleware name. The device is always Computer in this corpus;
/// a raw `android` browser token additionally forces platform/OS before
/// normalization.
pub fn parse_mitm(description: &str) -> Result<(RawIdentity, String), LabelError> {
    let caps = MITM_RE
        .captures(description)
        .ok_or_else(|| LabelError::Grammar(description.to_string()))?;
    let mut os = caps[1].to_string();
    let mut platform = os.clone();
    let browser = caps[4].to_string();
    if browser == "android" {
        platform = "Linux".to_string();
        os = "Android".to_string();
    }
    let raw = RawIdentity {
        device: "Computer".to_string(),
        os,
        os_version: caps[2].to_string(),
        browser,
        browser_version: caps[5].to_string(),
        platform,
    };
    Ok((raw, caps[3].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ua_grammar_splits_five_fields() {
        let raw = parse_ua("Computer-Windows-8.1-Chrome-54").unwrap();
        assert_eq!(raw.device, "Computer");
        assert_eq!(raw.os, "Windows");
        assert_eq!(raw.os_version, "8.1");
        assert_eq!(raw.browser, "Chrome");
        assert_eq!(raw.browser_version, "54");
        assert_eq!(raw.platform, "Windows");
    }

    #[test]
    fn ua_grammar_rejects_wrong_arity() {
        assert!(parse_ua("Computer-Windows-8.1-Chrome").is_err());
        assert!(parse_ua("not a label").is_err());
        assert!(parse_ua("").is_err());
    }

    #[test]
    fn mitm_grammar_matches_dashed_middleware_name_greedily() {
        let (raw, name) = parse_mitm("windows-8.1-avast-free-2017-chrome-54").unwrap();
        assert_eq!(raw.os, "windows");
        assert_eq!(raw.os_version, "8.1");
        assert_eq!(name, "avast-free-2017");
        assert_eq!(raw.browser, "chrome");
        assert_eq!(raw.browser_version, "54");
        assert_eq!(raw.device, "Computer");
        assert_eq!(raw.platform, "windows");
    }

    #[test]
    fn mitm_android_browser_forces_platform_and_os() {
        let (raw, _) = parse_mitm("android-7.0-none-android-7.0").unwrap();
        assert_eq!(raw.platform, "Linux");
        assert_eq!(raw.os, "Android");
    }

    #[test]
    fn description_comes_from_parent_directory() {
        let desc =
            description_from_path(Path::new("captures/Computer-Windows-8.1-Chrome-54/handshake.pcap"))
                .unwrap();
        assert_eq!(desc, "Computer-Windows-8.1-Chrome-54");
    }

    #[test]
    fn bare_filename_has_no_description() {
        assert!(description_from_path(Path::new("handshake.pcap")).is_err());
    }
}
