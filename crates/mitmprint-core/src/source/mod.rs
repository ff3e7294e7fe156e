//! Raw Field Source boundary.
//!
//! The external decoder (tshark) turns a capture file into either a PDML
//! structured field tree or a flat field-selected JSON record. It is
//! invoked once per run, buffered to completion; a decoder failure is
//! fatal and never retried. Timeouts are the caller's responsibility.

pub mod fields;
pub mod pdml;

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to run tshark (is it installed?): {0}")]
    Spawn(#[from] std::io::Error),
    #[error("tshark exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("tshark produced non-UTF-8 output")]
    Encoding,
}

/// ClientHello fields requested in flat field-selected mode, in output
/// order. Keep in sync with `extract::from_field_record`.
pub const SELECTED_FIELDS: &[&str] = &[
    "tls.record.version",
    "tls.handshake.version",
    "tls.handshake.ciphersuite",
    "tls.handshake.comp_method",
    "tls.handshake.extension.type",
    "tls.handshake.extensions_supported_group",
    "tls.handshake.extensions_ec_point_format",
    "tls.handshake.sig_hash_alg",
];

fn run_tshark(args: &[&str]) -> Result<String, DecodeError> {
    debug!("invoking tshark {}", args.join(" "));
    let output = Command::new("tshark").args(args).output()?;
    if !output.status.success() {
        return Err(DecodeError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    String::from_utf8(output.stdout).map_err(|_| DecodeError::Encoding)
}

/// Decode a capture into PDML text (`tshark -r <path> -T pdml`).
pub fn decode_pdml(path: &Path) -> Result<String, DecodeError> {
    let path = path.to_string_lossy();
    run_tshark(&["-r", &path, "-T", "pdml"])
}

/// Decode a capture into the flat field-selected JSON record, filtered to
/// ClientHello packets only.
pub fn decode_fields(path: &Path) -> Result<String, DecodeError> {
    let path = path.to_string_lossy();
    let mut args = vec![
        "-r",
        path.as_ref(),
        "-Y",
        "tls.handshake.type == 1",
        "-T",
        "json",
    ];
    for field in SELECTED_FIELDS {
        args.push("-e");
        args.push(field);
    }
    run_tshark(&args)
}
