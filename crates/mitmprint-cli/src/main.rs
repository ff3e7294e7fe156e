use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::error;

use mitmprint_core::extract;
use mitmprint_core::fingerprint::compose;
use mitmprint_core::fingerprint::types::MiddlewareRecord;
use mitmprint_core::identity::normalize::normalize;
use mitmprint_core::label;
use mitmprint_core::metadata;
use mitmprint_core::source::{self, fields};

#[derive(Parser)]
#[command(name = "mitmprint")]
#[command(about = "Derive client identity fingerprints from labeled TLS captures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the full ua|handshake|middleware fingerprint for a capture
    /// whose parent directory name carries the identity label
    Fingerprint {
        /// pcap containing at least one TLS ClientHello
        capture: PathBuf,

        /// Interpret the label as middleware-labeled
        /// (os-osVersion-middlewareName-browser-browserVersion)
        #[arg(long)]
        mitm: bool,
    },

    /// Print the handshake-only fingerprint section (no labels needed)
    Handshake {
        /// pcap containing at least one TLS ClientHello
        capture: PathBuf,
    },

    /// Emit a structured JSON metadata record for a labeled handshake.pcap
    Metadata {
        /// path of the form .../<corpus>/<description>/handshake.pcap
        capture: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Fingerprint { capture, mitm } => {
            let description = match label::description_from_path(&capture) {
                Ok(d) => d,
                Err(e) => {
                    error!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            // Resolve the label before paying for the decode: a bad label
            // must produce no partial output.
            let parsed = if mitm {
                label::parse_mitm(&description).map(|(raw, name)| (raw, Some(name)))
            } else {
                label::parse_ua(&description).map(|raw| (raw, None))
            };
            let (raw, mitm_name) = match parsed {
                Ok(p) => p,
                Err(e) => {
                    error!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            let pdml_text = source::decode_pdml(&capture)
                .with_context(|| format!("decoding {}", capture.display()))?;
            let tree = source::pdml::parse_pdml(&pdml_text)?;
            let handshake = extract::from_pdml(&tree)?;
            if !handshake.parsed {
                error!("no ClientHello found in {}", capture.display());
                return Ok(ExitCode::FAILURE);
            }

            let identity = normalize(raw);
            let middleware = mitm_name
                .as_deref()
                .map(|name| MiddlewareRecord::from_raw_name(name, None));
            println!(
                "{}",
                compose::full_fingerprint(&identity, &handshake, middleware.as_ref())
            );
        }

        Commands::Handshake { capture } => {
            let json = source::decode_fields(&capture)
                .with_context(|| format!("decoding {}", capture.display()))?;
            let record = fields::parse_field_record(&json)?;
            let handshake = extract::from_field_record(record.as_ref())?;
            if !handshake.parsed {
                error!("no ClientHello found in {}", capture.display());
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", compose::handshake_section(&handshake));
        }

        Commands::Metadata { capture } => {
            let record = match metadata::build(&capture, "mitmprint") {
                Ok(r) => r,
                Err(e) => {
                    error!("{e}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
