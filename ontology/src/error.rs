//! Errors raised while reading an ontology document.

use std::path::PathBuf;

/// Failure to load an ontology graph.
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The RDF parser rejected the document.
    #[error("failed to parse {format}: {message}")]
    Parse {
        /// Serialization being parsed.
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },
    /// The file extension does not name a supported serialization.
    #[error("unsupported ontology format: {0:?} (expected .ttl, .nt, .owl, .rdf or .xml)")]
    UnsupportedFormat(String),
    /// An `rdf:List` is cyclic, truncated, or has an invalid member.
    #[error("malformed rdf:List at {0}")]
    MalformedList(String),
    /// A cardinality literal is not a non-negative integer.
    #[error("invalid cardinality {value:?} on restriction {node}")]
    InvalidCardinality {
        /// The restriction node.
        node: String,
        /// The offending lexical form.
        value: String,
    },
    /// A restriction node has no `owl:onProperty`.
    #[error("restriction {0} has no owl:onProperty")]
    MissingOnProperty(String),
}
