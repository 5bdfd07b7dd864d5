//! `owl-xsd`: generates an XML Schema from an OWL ontology.
//!
//! **Usage:**
//! ```text
//! owl-xsd <input> <output> [--config <toml>] [--symbols <toml>]
//! ```
//!
//! Refuses to overwrite an existing output file. Classes with more than one
//! structural superclass cannot be expressed with `xs:extension` and abort
//! the run.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::{Context, Result};
use clap::Parser;
use owlschema_clients::{init_logging, print_summary, GenerateArgs};
use owlschema_codegen::generate_xsd;

/// Generate an XML Schema from an OWL ontology.
#[derive(Parser)]
#[command(name = "owl-xsd", about = "Generate an XML Schema from an OWL ontology")]
struct Args {
    #[command(flatten)]
    generate: GenerateArgs,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse().generate;
    let inputs = args.load()?;

    let report = generate_xsd(
        &inputs.ontology,
        &inputs.config,
        inputs.symbols,
        &args.output,
    )
    .with_context(|| format!("Failed to generate {}", args.output.display()))?;

    print_summary(&args.output, &report);
    Ok(())
}
