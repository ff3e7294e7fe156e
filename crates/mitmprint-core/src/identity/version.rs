//! Version string validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Rendered in fingerprint output when a version failed validation.
pub const INVALID_VERSION: &str = "-1.-1.-1";

static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+){0,2}$").expect("static regex"));

/// Accept a version string only in `N`, `N.N`, or `N.N.N` numeral form.
pub fn validate(version: &str) -> Option<String> {
    if VERSION_RE.is_match(version) {
        Some(version.to_string())
    } else {
        None
    }
}
