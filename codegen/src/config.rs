//! Generator profile.
//!
//! Everything the assembler needs to know about a particular ontology that is
//! not in the ontology itself: which class is the document root, which classes
//! become top-level collections, wire-name renames, and so on. The default
//! profile targets the SPDX 2.x ontology.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Failure to read a generator profile or symbol table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// JSON Schema draft identifiers.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// A document-level property injected into the root class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyntheticProperty {
    /// Wire name.
    pub name: String,
    /// Documentation.
    #[serde(default)]
    pub description: String,
    /// Whether instances must carry it.
    #[serde(default)]
    pub required: bool,
    /// Whether the XSD root type carries it. `$schema` is JSON-only.
    #[serde(default = "default_true")]
    pub xsd: bool,
}

fn default_true() -> bool {
    true
}

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Namespace against which bare class names are resolved.
    pub namespace: String,
    /// The class whose instances are whole documents.
    pub root_class: String,
    /// JSON Schema `$id`.
    pub schema_id: String,
    /// JSON Schema `title`.
    pub title: String,
    /// JSON Schema `$schema`.
    pub json_schema_draft: String,
    /// Secondary top-level collections: class → property name on the root.
    /// Emitted in class-name order.
    pub collections: BTreeMap<String, String>,
    /// Ontology local name → public wire name.
    pub renames: BTreeMap<String, String>,
    /// Annotation properties that are plain text when no range is declared.
    pub text_fallbacks: Vec<String>,
    /// Local names of properties whose resolution failure aborts the run.
    pub mandatory_properties: Vec<String>,
    /// Reference-like classes: class → role used in descriptions.
    pub references: BTreeMap<String, String>,
    /// Properties injected into the root that the ontology does not carry.
    pub synthetic: Vec<SyntheticProperty>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            namespace: "http://spdx.org/rdf/terms#".to_string(),
            root_class: "SpdxDocument".to_string(),
            schema_id: "http://spdx.org/rdf/terms/2.3".to_string(),
            title: "SPDX 2.3".to_string(),
            json_schema_draft: DRAFT_07.to_string(),
            collections: map(&[
                ("Package", "packages"),
                ("File", "files"),
                ("Snippet", "snippets"),
                ("Relationship", "relationships"),
                ("Annotation", "annotations"),
            ]),
            renames: map(&[("specVersion", "spdxVersion")]),
            text_fallbacks: vec![
                owlschema_ontology::model::iris::RDFS_COMMENT.to_string(),
                owlschema_ontology::model::iris::RDFS_SEE_ALSO.to_string(),
            ],
            mandatory_properties: vec!["specVersion".to_string()],
            references: map(&[
                ("SpdxElement", "SPDX ID"),
                ("AnyLicenseInfo", "License expression"),
            ]),
            synthetic: vec![
                SyntheticProperty {
                    name: "$schema".to_string(),
                    description: "JSON Schema reference for this document.".to_string(),
                    required: false,
                    xsd: false,
                },
                SyntheticProperty {
                    name: "documentNamespace".to_string(),
                    description: "The URI provides an unambiguous mechanism for other SPDX \
                                  documents to reference SPDX elements within this SPDX document."
                        .to_string(),
                    required: true,
                    xsd: true,
                },
            ],
        }
    }
}

impl GeneratorConfig {
    /// Parses a TOML profile; absent keys take the SPDX defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document does not parse.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    /// Reads a TOML profile from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    /// Expands a configured class name to a full IRI.
    ///
    /// Names containing `://` are taken as IRIs already.
    #[must_use]
    pub fn class_iri(&self, name: &str) -> String {
        if name.contains("://") {
            name.to_string()
        } else {
            format!("{}{}", self.namespace, name)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn spdx_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.class_iri("Package"), "http://spdx.org/rdf/terms#Package");
        assert_eq!(config.renames["specVersion"], "spdxVersion");
        assert_eq!(config.collections.len(), 5);
        assert_eq!(config.json_schema_draft, DRAFT_07);
    }

    #[test]
    fn toml_profile_overrides_defaults() {
        let config = GeneratorConfig::from_toml_str(
            r#"
namespace = "http://example.org/widgets#"
root_class = "Widget"
mandatory_properties = []
synthetic = []

[collections]
Part = "parts"
"#,
        )
        .unwrap();
        assert_eq!(config.class_iri("Widget"), "http://example.org/widgets#Widget");
        assert_eq!(
            config.class_iri("http://other.org/X"),
            "http://other.org/X"
        );
        assert_eq!(config.collections.get("Part").map(String::as_str), Some("parts"));
        assert!(config.synthetic.is_empty());
        // Untouched keys keep their defaults.
        assert_eq!(config.wire_name("specVersion"), "spdxVersion");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GeneratorConfig::from_toml_str("root = \"Widget\"\n").is_err());
    }

    #[test]
    fn synthetic_property_defaults_to_both_outputs() {
        let config = GeneratorConfig::from_toml_str(
            r#"
[[synthetic]]
name = "documentNamespace"
required = true
"#,
        )
        .unwrap();
        assert!(config.synthetic[0].xsd);
        assert!(config.synthetic[0].required);
    }
}
