//! Canonicalization and fingerprint-composition engine for passive TLS
//! client identification.
//!
//! Two independent signal sources feed one deterministic fingerprint:
//! labeled metadata about the client stack (directory-naming convention)
//! and the structural shape of the client's ClientHello (decoded from a
//! capture by tshark). The pipeline is
//! source → extract → { identity normalization | pass-through } → compose,
//! and every step is bit-for-bit reproducible: two captures of the same
//! client configuration always yield the same line.

pub mod extract;
pub mod fingerprint;
pub mod identity;
pub mod label;
pub mod metadata;
pub mod source;
