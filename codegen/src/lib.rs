//! owlschema schema generator.
//!
//! Takes a loaded [`owlschema_ontology::Ontology`] and produces two artifacts
//! describing the same document structure: a JSON Schema and an XML Schema.
//! Restrictions scattered over the superclass lattice are collected per
//! (class, property) pair, resolved once into a [`resolve::PropertyProfile`],
//! and assembled into a [`SchemaDocument`] that both emitters render.
//!
//! # Pipeline
//!
//! 1. [`collect`]: restriction collection with cycle detection
//! 2. [`resolve`]: one type and cardinality decision per property
//! 3. [`enums`]: enumeration classes through an explicit [`SymbolRegistry`]
//! 4. [`assemble`]: the shared [`SchemaDocument`]
//! 5. [`json`] and [`xsd`]: stateless renderers

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod assemble;
pub mod collect;
pub mod config;
pub mod emit;
pub mod enums;
pub mod error;
pub mod json;
pub mod mapping;
pub mod resolve;
pub mod symbols;
pub mod xsd;

use std::path::Path;

use owlschema_ontology::Ontology;

pub use assemble::{assemble, SchemaDocument};
pub use config::{ConfigError, GeneratorConfig};
pub use error::GenerationError;
pub use resolve::ResolutionError;
pub use symbols::SymbolRegistry;

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of structural classes profiled.
    pub class_count: usize,
    /// Number of enumeration types.
    pub enum_count: usize,
    /// Number of resolved (class, property) profiles.
    pub property_count: usize,
    /// Properties skipped because they did not resolve.
    pub skipped_count: usize,
    /// Individuals dropped for lack of a symbol.
    pub dropped_count: usize,
    /// Bytes written.
    pub bytes: usize,
}

impl GenerationReport {
    fn new(doc: &SchemaDocument, bytes: usize) -> Self {
        Self {
            class_count: doc.classes.len(),
            enum_count: doc.enums.len(),
            property_count: doc.classes.iter().map(|c| c.properties.len()).sum(),
            skipped_count: doc.diagnostics.skipped.len(),
            dropped_count: doc.diagnostics.dropped.len(),
            bytes,
        }
    }
}

fn refuse_existing(output: &Path) -> Result<(), GenerationError> {
    if output.exists() {
        return Err(GenerationError::OutputExists(output.to_path_buf()));
    }
    Ok(())
}

/// Renders the document as pretty-printed JSON Schema text.
///
/// # Errors
///
/// Returns [`GenerationError::Json`] if serialization fails.
pub fn render_json_schema(doc: &SchemaDocument) -> Result<String, GenerationError> {
    let mut text = serde_json::to_string_pretty(&json::to_json_schema(doc))?;
    text.push('\n');
    Ok(text)
}

/// Renders the document as XML Schema text.
///
/// # Errors
///
/// Returns an error if a class has more than one structural base or the XML
/// writer fails.
pub fn render_xsd(doc: &SchemaDocument) -> Result<String, GenerationError> {
    let mut text = xsd::write_xsd(&xsd::to_xsd(doc)?)?;
    text.push('\n');
    Ok(text)
}

/// Generates the JSON Schema for `ontology` into a new file at `output`.
///
/// # Errors
///
/// Returns an error if assembly fails or the file exists or cannot be written.
pub fn generate_json_schema(
    ontology: &Ontology,
    config: &GeneratorConfig,
    symbols: SymbolRegistry,
    output: &Path,
) -> Result<GenerationReport, GenerationError> {
    refuse_existing(output)?;
    let doc = assemble(ontology, config, symbols)?;
    let text = render_json_schema(&doc)?;
    emit::write_new_file(output, &text)?;
    Ok(GenerationReport::new(&doc, text.len()))
}

/// Generates the XML Schema for `ontology` into a new file at `output`.
///
/// # Errors
///
/// Returns an error if assembly fails, a class has an ambiguous base, or the
/// file exists or cannot be written.
pub fn generate_xsd(
    ontology: &Ontology,
    config: &GeneratorConfig,
    symbols: SymbolRegistry,
    output: &Path,
) -> Result<GenerationReport, GenerationError> {
    refuse_existing(output)?;
    let doc = assemble(ontology, config, symbols)?;
    let text = render_xsd(&doc)?;
    emit::write_new_file(output, &text)?;
    Ok(GenerationReport::new(&doc, text.len()))
}
