//! `owlschema-conformance`: validates a generated JSON Schema and XML Schema
//! pair.
//!
//! Runs the structural checks on each artifact and the cross-format agreement
//! check over both.
//!
//! **Usage:**
//! ```text
//! owlschema-conformance --json-schema <file> --xsd <file>
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use owlschema_clients::init_logging;
use owlschema_conformance::{run_all, ArtifactPaths, Severity};

/// Run the owlschema conformance suite.
#[derive(Parser)]
#[command(
    name = "owlschema-conformance",
    about = "Validate generated JSON Schema and XML Schema artifacts"
)]
struct Args {
    /// Generated JSON Schema file.
    #[arg(long)]
    json_schema: PathBuf,

    /// Generated XML Schema file.
    #[arg(long)]
    xsd: PathBuf,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let paths = ArtifactPaths {
        json_schema: args.json_schema,
        xsd: args.xsd,
    };

    let report = run_all(&paths)?;

    println!("owlschema Conformance Report");
    println!("============================");
    println!();

    for result in &report.results {
        println!("{result}");
    }

    let passed = report
        .results
        .iter()
        .filter(|r| r.severity == Severity::Pass)
        .count();
    let failed = report.failure_count();

    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        passed,
        report.warning_count(),
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
