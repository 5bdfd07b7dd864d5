//! Shared plumbing for the owlschema binaries: argument sets, logging setup,
//! and input loading.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use owlschema_codegen::{GenerationError, GenerationReport, GeneratorConfig, SymbolRegistry};
use owlschema_ontology::Ontology;
use tracing_subscriber::EnvFilter;

/// Arguments common to both generators.
#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Ontology document (`.ttl`, `.nt`, `.rdf`, `.owl`).
    pub input: PathBuf,

    /// Output file; must not exist yet.
    pub output: PathBuf,

    /// Generator profile (TOML). Defaults to the SPDX 2.x profile.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Individual symbol table (TOML `[symbols]`). Defaults to symbols derived
    /// from individual names.
    #[arg(long)]
    pub symbols: Option<PathBuf>,
}

/// Everything a generator run needs.
pub struct Inputs {
    /// The loaded ontology.
    pub ontology: Ontology,
    /// The generator profile.
    pub config: GeneratorConfig,
    /// Individual symbols.
    pub symbols: SymbolRegistry,
}

impl GenerateArgs {
    /// Loads the ontology, profile and symbol table named by the arguments.
    ///
    /// An existing output file is refused before anything is parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the output exists, or if any of the input files
    /// cannot be read or parsed.
    pub fn load(&self) -> Result<Inputs> {
        if self.output.exists() {
            return Err(GenerationError::OutputExists(self.output.clone()).into());
        }
        let ontology = Ontology::load(&self.input)
            .with_context(|| format!("Failed to load ontology {}", self.input.display()))?;
        let config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load profile {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        let symbols = match &self.symbols {
            Some(path) => SymbolRegistry::load(path)
                .with_context(|| format!("Failed to load symbols {}", path.display()))?,
            None => SymbolRegistry::derived(&ontology),
        };
        tracing::debug!(
            classes = ontology.class_count(),
            symbols = symbols.len(),
            "inputs loaded"
        );
        Ok(Inputs {
            ontology,
            config,
            symbols,
        })
    }
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints a one-line generation summary to stdout.
pub fn print_summary(output: &std::path::Path, report: &GenerationReport) {
    println!(
        "Written: {} ({} bytes): {} classes, {} enums, {} properties, {} skipped, {} dropped individuals",
        output.display(),
        report.bytes,
        report.class_count,
        report.enum_count,
        report.property_count,
        report.skipped_count,
        report.dropped_count
    );
}
