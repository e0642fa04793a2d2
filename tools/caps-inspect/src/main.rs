//! MediaDispatch Inspect - inspect capability negotiation from the command line
//!
//! # Usage
//!
//! ```bash
//! # Filter the candidates of a negotiation manifest
//! mediadispatch-inspect negotiate ./session.yaml
//!
//! # Include rejected candidates and their reasons
//! mediadispatch-inspect negotiate ./session.yaml --all
//!
//! # Resolve a property path
//! mediadispatch-inspect resolve mfxImplDescription.mfxDeviceDescription.DeviceID --type ptr
//!
//! # Parse a device id string
//! mediadispatch-inspect device-id 46a6/0
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mediadispatch_core::capabilities::{parse_device_id, resolve_property, ScalarType, SpecialConfig};
use mediadispatch_core::manifest::NegotiationManifest;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// MediaDispatch Inspect - inspect capability negotiation
#[derive(Parser)]
#[command(name = "mediadispatch-inspect")]
#[command(author, version)]
#[command(about = "Resolve property paths and run negotiation manifests")]
struct Args {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a negotiation manifest and print the accepted candidates
    Negotiate {
        /// Path to the manifest (.json, .yaml or .yml)
        manifest: PathBuf,

        /// Also list rejected candidates with the rejection reason
        #[arg(long)]
        all: bool,
    },

    /// Resolve a property path to its schema entry
    Resolve {
        /// Dotted property path
        path: String,

        /// Type of the value that would be stored
        #[arg(short, long, value_enum, default_value_t = ValueType::U32)]
        r#type: ValueType,
    },

    /// Parse a device id string ("46a6" or "46a6/0")
    DeviceId {
        /// Device id text
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ValueType {
    U16,
    U32,
    Ptr,
}

impl From<ValueType> for ScalarType {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::U16 => ScalarType::U16,
            ValueType::U32 => ScalarType::U32,
            ValueType::Ptr => ScalarType::Ptr,
        }
    }
}

/// Outcome for one candidate in `negotiate --all`.
#[derive(Serialize)]
struct CandidateReport {
    index: usize,
    name: String,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    special: Option<SpecialConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    match args.command {
        Command::Negotiate { manifest, all } => negotiate(&manifest, all),
        Command::Resolve { path, r#type } => resolve(&path, r#type.into()),
        Command::DeviceId { text } => device_id(&text),
    }
}

fn negotiate(path: &Path, all: bool) -> Result<()> {
    let manifest = NegotiationManifest::from_path(path)
        .with_context(|| format!("Failed to load manifest {}", path.display()))?;
    let loader = manifest
        .build_loader()
        .context("Failed to build config contexts")?;

    tracing::info!(
        "Negotiating {} candidate(s) against {} config(s)",
        manifest.candidates.len(),
        loader.configs().len()
    );

    if !all {
        let accepted = loader.filter(&manifest.candidates);
        return print_json(&accepted);
    }

    let reports: Vec<CandidateReport> = manifest
        .candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| match loader.negotiate(candidate) {
            Ok(special) => CandidateReport {
                index,
                name: candidate.name.clone(),
                accepted: true,
                special: Some(special),
                reason: None,
            },
            Err(e) => CandidateReport {
                index,
                name: candidate.name.clone(),
                accepted: false,
                special: None,
                reason: Some(e.to_string()),
            },
        })
        .collect();
    print_json(&reports)
}

fn resolve(path: &str, value_type: ScalarType) -> Result<()> {
    let id = resolve_property(path, value_type)
        .with_context(|| format!("Cannot resolve '{}' for a {} value", path, value_type))?;

    print_json(&serde_json::json!({
        "property": id.name(),
        "index": id.index(),
        "type": id.scalar_type(),
        "kind": id.kind().as_str(),
        "category": format!("{:?}", id.category()),
    }))
}

fn device_id(text: &str) -> Result<()> {
    let parsed = parse_device_id(text)
        .with_context(|| format!("'{}' is not a valid device id", text))?;
    print_json(&parsed)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
