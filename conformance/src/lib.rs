//! owlschema conformance suite.
//!
//! Structural checks over the two artifacts the generator emits. Each
//! validator returns a [`ConformanceReport`]; [`run_all`] aggregates them.
//!
//! # Conformance Scope
//!
//! | Artifact | Checks |
//! |----------|--------|
//! | JSON Schema | draft-07 header, closed root, required entries, array bounds, enums |
//! | XML Schema | single root element, declared types, occurrence bounds, enumerations |
//! | Both | equal required and list-valued property counts per object |
//!
//! # Entry Point
//!
//! ```no_run
//! use owlschema_conformance::{run_all, ArtifactPaths};
//! use std::path::PathBuf;
//!
//! let paths = ArtifactPaths {
//!     json_schema: PathBuf::from("out/schema.json"),
//!     xsd: PathBuf::from("out/schema.xsd"),
//! };
//! let report = run_all(&paths).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

pub use report::{ConformanceReport, Severity, TestResult};

/// Paths of the generated artifacts.
pub struct ArtifactPaths {
    /// Generated JSON Schema file.
    pub json_schema: PathBuf,
    /// Generated XML Schema file.
    pub xsd: PathBuf,
}

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. JSON Schema structure
/// 2. XML Schema structure
/// 3. Cross-format agreement
///
/// # Errors
///
/// Returns an error if an artifact cannot be read or parsed.
pub fn run_all(paths: &ArtifactPaths) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    report.extend(validators::json_schema::validate(&paths.json_schema)?);
    report.extend(validators::xsd::validate(&paths.xsd)?);
    report.extend(validators::agreement::validate_files(
        &paths.json_schema,
        &paths.xsd,
    )?);

    tracing::info!(
        checks = report.results.len(),
        failures = report.failure_count(),
        warnings = report.warning_count(),
        "conformance run complete"
    );
    Ok(report)
}
