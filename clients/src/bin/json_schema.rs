//! `owl-json-schema`: generates a draft-07 JSON Schema from an OWL ontology.
//!
//! **Usage:**
//! ```text
//! owl-json-schema <input> <output> [--config <toml>] [--symbols <toml>]
//! ```
//!
//! Refuses to overwrite an existing output file.

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
use owlschema_codegen::generate_json_schema;

/// Generate a JSON Schema from an OWL ontology.
#[derive(Parser)]
#[command(
    name = "owl-json-schema",
    about = "Generate a JSON Schema from an OWL ontology"
)]
struct Args {
    #[command(flatten)]
    generate: GenerateArgs,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse().generate;
    let inputs = args.load()?;

    let report = generate_json_schema(
        &inputs.ontology,
        &inputs.config,
        inputs.symbols,
        &args.output,
    )
    .with_context(|| format!("Failed to generate {}", args.output.display()))?;

    print_summary(&args.output, &report);
    Ok(())
}
