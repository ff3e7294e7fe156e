//! Identity normalization.
//!
//! Maps raw descriptive strings from the directory-naming convention into
//! canonical names and validated version strings. All rules degrade to
//! defaults on malformed input; nothing here returns an error.

use crate::fingerprint::types::IdentityRecord;
use crate::identity::version;

/// Raw identity fields as captured from the label, before any rewriting.
#[derive(Debug, Clone, Default)]
pub struct RawIdentity {
    pub device: String,
    pub os: String,
    pub os_version: String,
    pub browser: String,
    pub browser_version: String,
    pub platform: String,
}

/// Ordered substring rewrite table. Rules are applied top to bottom; every
/// occurrence of each pattern is replaced before the next rule runs, so
/// overlapping patterns (e.g. "8.1" vs "8") must be listed longest first.
type RewriteTable = &'static [(&'static str, &'static str)];

const BROWSER_REWRITES: RewriteTable = &[
    ("chrome", "Chrome"),
    ("firefox", "Firefox"),
    ("safari", "Safari"),
    ("android", "Android"),
    ("opera", "Opera"),
    ("silk", "Silk"),
    ("ie", "IE"),
    ("edge", "IE"),
];

const PLATFORM_REWRITES: RewriteTable = &[
    ("android", "Linux"),
    ("ipod", "iPod"),
    ("ipad", "iPad"),
    ("iphone", "iPhone"),
    ("OS_X", "Mac"),
    ("mac", "Mac"),
    ("windows", "Windows"),
];

const OS_REWRITES: RewriteTable = &[
    ("OS_X", "MacOSX"),
    ("mac", "MacOSX"),
    ("ios", "iOS"),
    ("android", "Android"),
    ("windows", "Windows"),
];

// Marketing names to dotted numerals. "8.1" must stay ahead of "8" and
// "Mountain_Lion" ahead of "Lion", or the longer name is corrupted by its
// substring.
const WINDOWS_VERSION_REWRITES: RewriteTable = &[
    ("XP", "5.1.0"),
    ("8.1", "6.3.0"),
    ("8", "6.2.0"),
    ("10", "10.0.0"),
    ("7", "6.1.0"),
];

const MACOSX_VERSION_REWRITES: RewriteTable = &[
    ("El_Capitan", "10.11.0"),
    ("Yosemite", "10.10.0"),
    ("Mavericks", "10.9.0"),
    ("Mountain_Lion", "10.8.0"),
    ("Lion", "10.7.0"),
    ("Snow_Leopard", "10.6.0"),
];

fn rewrite(input: &str, table: RewriteTable) -> String {
    let mut out = input.to_string();
    for (pattern, replacement) in table {
        out = out.replace(pattern, replacement);
    }
    out
}

/// Normalize a raw identity into canonical names and validated versions.
///
/// Rules run in a fixed order; later rules depend on earlier overrides
/// (e.g. the iPad override must precede browser canonicalization).
pub fn normalize(raw: RawIdentity) -> IdentityRecord {
    let RawIdentity {
        mut device,
        mut os,
        os_version,
        mut browser,
        mut browser_version,
        mut platform,
    } = raw;

    // Device-class override: tablet/phone-class browser tokens force the
    // whole stack, whatever else the label said.
    if browser == "ipad" {
        device = "Tablet".into();
        os = "iOS".into();
        platform = "iPad".into();
        browser = "Safari".into();
    }
    if browser == "iphone" {
        device = "Phone".into();
        os = "iOS".into();
        platform = "iPhone".into();
        browser = "Safari".into();
    }

    // No distinct browser version supplied: fall back to the OS version.
    if browser_version.is_empty() {
        browser_version = os_version.clone();
    }

    let browser = rewrite(&browser, BROWSER_REWRITES);
    let browser_version = version::validate(&browser_version);

    // Android reports no device class; assume Phone. Some of these are
    // really tablets — known approximation, kept as-is.
    if browser == "Android" {
        device = "Phone".into();
    }
    let device = device.replace("computer", "Computer");

    let platform = rewrite(&platform, PLATFORM_REWRITES);
    let os = rewrite(&os, OS_REWRITES);

    let os_version = match os.as_str() {
        "Windows" => rewrite(&os_version, WINDOWS_VERSION_REWRITES),
        "MacOSX" => rewrite(&os_version, MACOSX_VERSION_REWRITES),
        _ => os_version,
    };
    let os_version = version::validate(&os_version);

    IdentityRecord {
        browser,
        browser_version,
        platform,
        os,
        os_version,
        device,
        quirks: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        device: &str,
        os: &str,
        os_version: &str,
        browser: &str,
        browser_version: &str,
        platform: &str,
    ) -> RawIdentity {
        RawIdentity {
            device: device.into(),
            os: os.into(),
            os_version: os_version.into(),
            browser: browser.into(),
            browser_version: browser_version.into(),
            platform: platform.into(),
        }
    }

    #[test]
    fn ipad_override_forces_whole_stack() {
        let id = normalize(raw("computer", "windows", "9.3", "ipad", "9.3", "windows"));
        assert_eq!(id.device, "Tablet");
        assert_eq!(id.os, "iOS");
        assert_eq!(id.platform, "iPad");
        assert_eq!(id.browser, "Safari");
    }

    #[test]
    fn iphone_override_forces_whole_stack() {
        let id = normalize(raw("Tablet", "android", "10.2", "iphone", "10.2", "android"));
        assert_eq!(id.device, "Phone");
        assert_eq!(id.os, "iOS");
        assert_eq!(id.platform, "iPhone");
        assert_eq!(id.browser, "Safari");
    }

    #[test]
    fn browser_version_falls_back_to_os_version() {
        let id = normalize(raw("computer", "windows", "10", "chrome", "", "windows"));
        assert_eq!(id.browser_version.as_deref(), Some("10"));
    }

    #[test]
    fn browser_tokens_canonicalize() {
        for (token, expected) in [
            ("chrome", "Chrome"),
            ("firefox", "Firefox"),
            ("safari", "Safari"),
            ("opera", "Opera"),
            ("silk", "Silk"),
            ("edge", "IE"),
        ] {
            let id = normalize(raw("computer", "windows", "10", token, "1", "windows"));
            assert_eq!(id.browser, expected, "token {token}");
        }
    }

    #[test]
    fn unknown_browser_passes_through() {
        let id = normalize(raw("computer", "windows", "10", "FooBrowser", "1", "windows"));
        assert_eq!(id.browser, "FooBrowser");
        assert_eq!(id.browser_code(), 0);
    }

    #[test]
    fn invalid_browser_version_becomes_none() {
        let id = normalize(raw("computer", "windows", "10", "chrome", "nightly", "windows"));
        assert_eq!(id.browser_version, None);
    }

    #[test]
    fn android_browser_forces_phone_device() {
        let id = normalize(raw("computer", "android", "7.0", "android", "7.0", "android"));
        assert_eq!(id.device, "Phone");
        assert_eq!(id.platform, "Linux");
        assert_eq!(id.os, "Android");
    }

    #[test]
    fn windows_marketing_versions_remap() {
        for (input, expected) in [
            ("XP", "5.1.0"),
            ("7", "6.1.0"),
            ("8", "6.2.0"),
            ("8.1", "6.3.0"),
            ("10", "10.0.0"),
        ] {
            let id = normalize(raw("computer", "windows", input, "chrome", "54", "windows"));
            assert_eq!(id.os_version.as_deref(), Some(expected), "input {input}");
        }
    }

    #[test]
    fn macosx_marketing_versions_remap() {
        for (input, expected) in [
            ("Snow_Leopard", "10.6.0"),
            ("Lion", "10.7.0"),
            ("Mountain_Lion", "10.8.0"),
            ("Mavericks", "10.9.0"),
            ("Yosemite", "10.10.0"),
            ("El_Capitan", "10.11.0"),
        ] {
            let id = normalize(raw("computer", "mac", input, "safari", "9", "mac"));
            assert_eq!(id.os_version.as_deref(), Some(expected), "input {input}");
        }
    }

    #[test]
    fn version_remap_only_applies_to_windows_and_macosx() {
        let id = normalize(raw("computer", "linux", "XP", "firefox", "45", "linux"));
        // "XP" is not remapped for non-Windows, then fails validation.
        assert_eq!(id.os_version, None);
    }

    #[test]
    fn invalid_os_version_becomes_none() {
        let id = normalize(raw("computer", "windows", "Vista", "chrome", "54", "windows"));
        assert_eq!(id.os_version, None);
    }

    #[test]
    fn platform_and_os_canonicalize_independently() {
        let id = normalize(raw("computer", "OS_X", "El_Capitan", "safari", "9", "OS_X"));
        assert_eq!(id.platform, "Mac");
        assert_eq!(id.os, "MacOSX");
        assert_eq!(id.os_version.as_deref(), Some("10.11.0"));
    }
}
