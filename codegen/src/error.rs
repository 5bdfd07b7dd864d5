//! Errors raised while assembling and emitting schema documents.

use std::path::PathBuf;

use crate::resolve::ResolutionError;

/// A fatal generation failure. Aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The configured root or collection class is not in the ontology.
    #[error("class {0} not found in the ontology")]
    MissingClass(String),
    /// A class has more than one structural superclass, which XML Schema
    /// extension cannot express.
    #[error("class {class} has more than one structural base: {}", bases.join(", "))]
    AmbiguousBase {
        /// The class being emitted.
        class: String,
        /// Every candidate base, in superclass order.
        bases: Vec<String>,
    },
    /// A property configured as mandatory could not be resolved.
    #[error("mandatory property {property} of {class} could not be resolved: {source}")]
    MandatoryProperty {
        /// The class being profiled.
        class: String,
        /// The property IRI.
        property: String,
        /// The resolution failure.
        #[source]
        source: ResolutionError,
    },
    /// Generators never overwrite an existing artifact.
    #[error("output file {0} already exists")]
    OutputExists(PathBuf),
    /// Writing an artifact failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The XML writer failed.
    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),
    /// The XML writer produced bytes that are not UTF-8.
    #[error("XML output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
