//! Enumeration detection.
//!
//! A class is an enumeration when it has named individuals and at least one of
//! them maps to a symbol in the [`SymbolRegistry`]. Individuals without a
//! symbol are dropped from the value set with a warning.

use std::collections::{HashMap, HashSet};

use owlschema_ontology::Ontology;

use crate::symbols::SymbolRegistry;

/// The permitted values of an enum-typed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    /// The enumeration class, or `None` for a property-level value set built
    /// from `owl:hasValue` or `owl:oneOf`.
    pub class: Option<String>,
    /// Symbols in individual traversal order, without duplicates.
    pub symbols: Vec<String>,
}

/// An individual left out of every value set because it has no symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedIndividual {
    /// Individual IRI.
    pub individual: String,
    /// The class whose value set it was dropped from.
    pub class: String,
}

/// Classifies value types as enumerations.
///
/// Built once per run; every class with individuals is mapped up front so that
/// each unmapped individual is reported exactly once.
#[derive(Debug)]
pub struct EnumResolver {
    registry: SymbolRegistry,
    enums: HashMap<String, EnumInfo>,
    order: Vec<String>,
    dropped: Vec<DroppedIndividual>,
}

impl EnumResolver {
    /// Maps the individuals of every class through `registry`.
    #[must_use]
    pub fn new(ontology: &Ontology, registry: SymbolRegistry) -> Self {
        let mut enums = HashMap::new();
        let mut order = Vec::new();
        let mut dropped = Vec::new();
        for class in ontology.classes() {
            if !ontology.is_enumeration(&class.iri) {
                continue;
            }
            let mut symbols: Vec<String> = Vec::new();
            for ind in ontology.individuals_of(&class.iri) {
                match registry.symbol(&ind.iri) {
                    Some(symbol) => {
                        if !symbols.iter().any(|s| s == symbol) {
                            symbols.push(symbol.to_string());
                        }
                    }
                    None => {
                        tracing::warn!(
                            individual = %ind.iri,
                            class = %class.iri,
                            "individual has no registered symbol; dropped from enumeration"
                        );
                        dropped.push(DroppedIndividual {
                            individual: ind.iri.clone(),
                            class: class.iri.clone(),
                        });
                    }
                }
            }
            if symbols.is_empty() {
                continue;
            }
            order.push(class.iri.clone());
            enums.insert(
                class.iri.clone(),
                EnumInfo {
                    class: Some(class.iri.clone()),
                    symbols,
                },
            );
        }
        tracing::debug!(
            enums = order.len(),
            dropped = dropped.len(),
            "classified enumeration classes"
        );
        Self {
            registry,
            enums,
            order,
            dropped,
        }
    }

    /// The enumeration for `class`, if it is one.
    #[must_use]
    pub fn classify(&self, class: &str) -> Option<&EnumInfo> {
        self.enums.get(class)
    }

    /// Enumeration classes in ontology order.
    pub fn enum_classes(&self) -> impl Iterator<Item = &EnumInfo> {
        self.order.iter().filter_map(|c| self.enums.get(c))
    }

    /// Maps individuals named by `owl:hasValue` or `owl:oneOf` to symbols.
    ///
    /// Individuals already reported while building the resolver are skipped
    /// silently; any other unmapped individual is warned about.
    pub fn symbols_for<'i>(&self, individuals: impl IntoIterator<Item = &'i str>) -> Vec<String> {
        let reported: HashSet<&str> = self
            .dropped
            .iter()
            .map(|d| d.individual.as_str())
            .collect();
        let mut symbols: Vec<String> = Vec::new();
        for ind in individuals {
            match self.registry.symbol(ind) {
                Some(symbol) => {
                    if !symbols.iter().any(|s| s == symbol) {
                        symbols.push(symbol.to_string());
                    }
                }
                None if reported.contains(ind) => {}
                None => {
                    tracing::warn!(individual = ind, "value individual has no registered symbol");
                }
            }
        }
        symbols
    }

    /// Individuals dropped while building the resolver.
    #[must_use]
    pub fn dropped(&self) -> &[DroppedIndividual] {
        &self.dropped
    }
}
