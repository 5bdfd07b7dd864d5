//! Individual → symbol name registry.
//!
//! Enumeration members are emitted under public symbol names (`SHA256`,
//! `PACKAGE_MANAGER`) rather than their IRIs. The registry is an explicit
//! value handed to [`crate::enums::EnumResolver::new`]; an individual with no
//! entry is not an enum member.

use std::collections::HashMap;
use std::path::Path;

use owlschema_ontology::Ontology;
use serde::Deserialize;

use crate::config::ConfigError;
use crate::mapping::to_screaming_snake;

/// Maps individual IRIs to symbol names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolRegistry {
    symbols: HashMap<String, String>,
}

#[derive(Deserialize)]
struct SymbolFile {
    #[serde(default)]
    symbols: HashMap<String, String>,
}

impl SymbolRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the symbol for one individual.
    pub fn register(&mut self, individual: impl Into<String>, symbol: impl Into<String>) {
        self.symbols.insert(individual.into(), symbol.into());
    }

    /// Builder form of [`SymbolRegistry::register`].
    #[must_use]
    pub fn with(mut self, individual: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.register(individual, symbol);
        self
    }

    /// The symbol registered for `individual`, if any.
    #[must_use]
    pub fn symbol(&self, individual: &str) -> Option<&str> {
        self.symbols.get(individual).map(String::as_str)
    }

    /// Number of registered individuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Parses a `[symbols]` table of `"<individual IRI>" = "<SYMBOL>"` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is not valid TOML or the
    /// table values are not strings.
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let file: SymbolFile = toml::from_str(src)?;
        Ok(Self {
            symbols: file.symbols,
        })
    }

    /// Reads a symbol table file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_toml_str(&src)?;
        tracing::debug!(path = %path.display(), symbols = registry.len(), "loaded symbol table");
        Ok(registry)
    }

    /// Derives symbols for every individual by naming convention.
    ///
    /// SPDX individuals are named `<prefix>_<value>` (`checksumAlgorithm_sha256`,
    /// `referenceCategory_packageManager`); the part after the last `_` is
    /// converted to SCREAMING_SNAKE_CASE.
    #[must_use]
    pub fn derived(ontology: &Ontology) -> Self {
        let mut registry = Self::new();
        for ind in ontology.individuals() {
            let value = ind.name.rsplit('_').next().unwrap_or(&ind.name);
            if !value.is_empty() {
                registry.register(ind.iri.clone(), to_screaming_snake(value));
            }
        }
        registry
    }
}
