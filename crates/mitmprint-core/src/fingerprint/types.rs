use crate::identity::tables;

/// Structural shape of one parsed ClientHello.
///
/// All numeric fields are stored as their wire values; rendering is always
/// lowercase hex without leading zeros, so heterogeneous upstream numeral
/// formats (zero-padded hex from PDML, decimal from field-selected JSON)
/// collapse to one canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandshakeRecord {
    /// TLS version from the record layer (e.g., 0x0301)
    pub record_version: u16,
    /// TLS version from the ClientHello body (e.g., 0x0303)
    pub version: u16,
    /// Cipher suite values in wire order (client preference order)
    pub cipher_suites: Vec<u16>,
    /// Compression method values in wire order; more than one is a quirk
    pub compression_methods: Vec<u8>,
    /// Extension type codes in wire order
    pub extensions: Vec<u16>,
    /// Supported groups / named curves (extension 10), wire order
    pub supported_groups: Vec<u16>,
    /// EC point format values (extension 11), wire order
    pub ec_point_formats: Vec<u8>,
    /// Signature algorithms (extension 13), wire order
    pub signature_algorithms: Vec<u16>,
    /// Application-layer header names (reserved; always empty from captures)
    pub headers: Vec<String>,
    /// Structural anomaly tags, appended during composition only
    pub quirks: Vec<String>,
    /// True once an authoritative ClientHello was fully consumed
    pub parsed: bool,
}

/// One normalized client description.
///
/// Browser/OS/platform/device hold canonical names; the categorical code for
/// each is resolved through the static tables at composition time (unknown
/// names resolve to code 0, never an error). A `None` version means the raw
/// value failed the arity check; how that renders depends on the output mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityRecord {
    pub browser: String,
    pub browser_version: Option<String>,
    pub platform: String,
    pub os: String,
    pub os_version: Option<String>,
    pub device: String,
    /// Anomaly tags (unused at this layer, kept for extensibility)
    pub quirks: Vec<String>,
}

impl IdentityRecord {
    pub fn browser_code(&self) -> u32 {
        tables::browser_code(&self.browser)
    }

    pub fn os_code(&self) -> u32 {
        tables::os_code(&self.os)
    }

    pub fn platform_code(&self) -> u32 {
        tables::platform_code(&self.platform)
    }

    pub fn device_code(&self) -> u32 {
        tables::device_code(&self.device)
    }
}

/// Class of an intercepting middleware entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MitmType {
    #[default]
    Empty,
    Antivirus,
    FakeBrowser,
    Malware,
    Parental,
    Proxy,
}

impl MitmType {
    pub fn code(self) -> u32 {
        match self {
            MitmType::Empty => 0,
            MitmType::Antivirus => 1,
            MitmType::FakeBrowser => 2,
            MitmType::Malware => 3,
            MitmType::Parental => 4,
            MitmType::Proxy => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MitmType::Empty => "",
            MitmType::Antivirus => "Antivirus",
            MitmType::FakeBrowser => "FakeBrowser",
            MitmType::Malware => "Malware",
            MitmType::Parental => "Parental",
            MitmType::Proxy => "Proxy",
        }
    }
}

/// Security quality tier of an intercepting middleware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grade {
    #[default]
    Empty,
    A,
    B,
    C,
    F,
}

impl Grade {
    pub fn code(self) -> u32 {
        match self {
            Grade::Empty => 0,
            Grade::A => 1,
            Grade::B => 2,
            Grade::C => 3,
            Grade::F => 4,
        }
    }
}

/// Identity of an intercepting middleware. An empty `name` means no
/// interception was observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiddlewareRecord {
    pub name: String,
    pub mitm_type: MitmType,
    pub grade: Grade,
}

impl MiddlewareRecord {
    /// Build a record from a raw middleware name. The literal token "none"
    /// clears the name (no interception); any other name defaults the type
    /// to Antivirus unless the caller overrides it.
    pub fn from_raw_name(name: &str, type_override: Option<MitmType>) -> Self {
        if name == "none" {
            return Self::default();
        }
        Self {
            name: name.to_string(),
            mitm_type: type_override.unwrap_or(MitmType::Antivirus),
            grade: Grade::Empty,
        }
    }
}
