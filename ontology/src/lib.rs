//! OWL ontology graphs as an immutable, IRI-addressed arena.
//!
//! The `owlschema-ontology` crate reads an ontology document (Turtle,
//! N-Triples or RDF/XML) and exposes its classes, properties, restriction
//! nodes and named individuals as typed Rust data. The graph is loaded once
//! and only ever borrowed afterwards.
//!
//! # Entry Point
//!
//! ```
//! let ttl = r#"
//! @prefix owl: <http://www.w3.org/2002/07/owl#> .
//! <http://example.org/Widget> a owl:Class .
//! "#;
//! let ontology = owlschema_ontology::Ontology::from_turtle(ttl).unwrap();
//! assert!(ontology.class("http://example.org/Widget").is_some());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod loader;
pub mod model;
pub mod rdf;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use error::OntologyError;
pub use model::{
    local_name, ClassExpression, Individual, Ontology, OntologyClass, OntologyProperty,
    PropertyKind, Restriction,
};
pub use rdf::RdfFormat;

impl Ontology {
    /// Loads an ontology file, choosing the parser from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the extension is not a
    /// supported serialization, or the document is not a well-formed ontology.
    pub fn load(path: &Path) -> Result<Ontology, OntologyError> {
        let format = RdfFormat::from_path(path)?;
        let file = File::open(path).map_err(|source| OntologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ontology = Self::from_reader(BufReader::new(file), format)?;
        tracing::info!(
            path = %path.display(),
            classes = ontology.class_count(),
            properties = ontology.property_count(),
            individuals = ontology.individual_count(),
            "loaded ontology"
        );
        Ok(ontology)
    }

    /// Parses an ontology from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or is malformed.
    pub fn from_reader<R: BufRead>(reader: R, format: RdfFormat) -> Result<Ontology, OntologyError> {
        let graph = rdf::RdfGraph::parse(reader, format)?;
        loader::build(&graph)
    }

    /// Parses a Turtle document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or is malformed.
    pub fn from_turtle(src: &str) -> Result<Ontology, OntologyError> {
        Self::from_reader(src.as_bytes(), RdfFormat::Turtle)
    }

    /// Parses an N-Triples document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or is malformed.
    pub fn from_ntriples(src: &str) -> Result<Ontology, OntologyError> {
        Self::from_reader(src.as_bytes(), RdfFormat::NTriples)
    }

    /// Parses an RDF/XML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse or is malformed.
    pub fn from_rdf_xml(src: &str) -> Result<Ontology, OntologyError> {
        Self::from_reader(src.as_bytes(), RdfFormat::RdfXml)
    }
}
