//! Document assembly.
//!
//! Runs collection and resolution for every structural class once and packs
//! the results into a [`SchemaDocument`]. Both emitters render the same
//! document; nothing downstream consults the ontology again.

use std::collections::{BTreeMap, HashMap};

use owlschema_ontology::model::iris::OWL_THING;
use owlschema_ontology::{local_name, Ontology};

use crate::collect::{collect, collect_properties, structural_bases};
use crate::config::{GeneratorConfig, SyntheticProperty};
use crate::enums::{DroppedIndividual, EnumResolver};
use crate::error::GenerationError;
use crate::mapping::pluralize;
use crate::resolve::{PropertyProfile, ResolutionError, Resolver, ResolverPolicy};
use crate::symbols::SymbolRegistry;

/// The resolved shape of one structural class.
#[derive(Debug, Clone)]
pub struct ClassProfile {
    /// Class IRI.
    pub iri: String,
    /// Local name; used as the XML Schema type name.
    pub name: String,
    /// Documentation, verbatim.
    pub comment: String,
    /// Every local and inherited property that resolved.
    pub properties: Vec<PropertyProfile>,
    /// Direct structural superclasses, in superclass order.
    pub structural_bases: Vec<String>,
}

impl ClassProfile {
    /// The profile for `property`, if this class carries it.
    #[must_use]
    pub fn property(&self, property: &str) -> Option<&PropertyProfile> {
        self.properties.iter().find(|p| p.property == property)
    }
}

/// A secondary top-level collection on the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Member class IRI.
    pub class: String,
    /// Property name on the root.
    pub name: String,
}

/// An enumeration class and its symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Class IRI.
    pub iri: String,
    /// Local name; used as the XML Schema simple type name.
    pub name: String,
    /// Documentation, verbatim.
    pub comment: String,
    /// Symbols in individual traversal order.
    pub symbols: Vec<String>,
}

/// A property left out of a class because it did not resolve.
#[derive(Debug, Clone)]
pub struct SkippedProperty {
    /// Class IRI.
    pub class: String,
    /// Property IRI.
    pub property: String,
    /// Why.
    pub error: ResolutionError,
}

/// Non-fatal problems found during one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Properties skipped on some class.
    pub skipped: Vec<SkippedProperty>,
    /// Individuals without a symbol.
    pub dropped: Vec<DroppedIndividual>,
}

impl Diagnostics {
    /// Returns true if the run was clean.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty() && self.dropped.is_empty()
    }
}

/// Everything both emitters need.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Root class IRI.
    pub root: String,
    /// Document title.
    pub title: String,
    /// JSON Schema `$id`.
    pub schema_id: String,
    /// JSON Schema `$schema`.
    pub draft: String,
    /// Secondary collections, ordered by configured class name.
    pub collections: Vec<Collection>,
    /// Injected root properties.
    pub synthetic: Vec<SyntheticProperty>,
    /// Structural classes in ontology order.
    pub classes: Vec<ClassProfile>,
    /// Enumeration classes in ontology order.
    pub enums: Vec<EnumType>,
    /// Non-fatal problems.
    pub diagnostics: Diagnostics,
    renames: BTreeMap<String, String>,
    class_index: HashMap<String, usize>,
}

impl SchemaDocument {
    /// The profile of a structural class.
    #[must_use]
    pub fn class(&self, iri: &str) -> Option<&ClassProfile> {
        self.class_index.get(iri).map(|&i| &self.classes[i])
    }

    /// The root class profile.
    #[must_use]
    pub fn root_class(&self) -> Option<&ClassProfile> {
        self.class(&self.root)
    }

    /// The public name of a property: renamed, and pluralized for lists when
    /// `plural` is set.
    #[must_use]
    pub fn wire_name(&self, profile: &PropertyProfile, plural: bool) -> String {
        let name = self.renames.get(&profile.name).unwrap_or(&profile.name);
        if plural && profile.multiplicity.is_list() {
            pluralize(name)
        } else {
            name.clone()
        }
    }
}

/// Assembles the schema document for `ontology` under `config`.
///
/// # Errors
///
/// Returns [`GenerationError::MissingClass`] if the root or a collection class
/// is absent, or [`GenerationError::MandatoryProperty`] if a mandatory property
/// fails to resolve.
pub fn assemble(
    ontology: &Ontology,
    config: &GeneratorConfig,
    symbols: SymbolRegistry,
) -> Result<SchemaDocument, GenerationError> {
    let root = config.class_iri(&config.root_class);
    if ontology.class(&root).is_none() {
        return Err(GenerationError::MissingClass(root));
    }
    let mut collections = Vec::new();
    for (class, name) in &config.collections {
        let iri = config.class_iri(class);
        if ontology.class(&iri).is_none() {
            return Err(GenerationError::MissingClass(iri));
        }
        collections.push(Collection {
            class: iri,
            name: name.clone(),
        });
    }

    let enums = EnumResolver::new(ontology, symbols);
    let policy = ResolverPolicy {
        text_fallbacks: config
            .text_fallbacks
            .iter()
            .map(|p| config.class_iri(p))
            .collect(),
        references: config
            .references
            .iter()
            .map(|(class, role)| (config.class_iri(class), role.clone()))
            .collect(),
    };
    let resolver = Resolver::new(ontology, &enums, policy);
    let mut diagnostics = Diagnostics::default();

    let mut classes = Vec::new();
    for class in ontology.classes() {
        if class.iri == OWL_THING || enums.classify(&class.iri).is_some() {
            continue;
        }
        let mut properties = Vec::new();
        for property in collect_properties(ontology, &class.iri) {
            let restrictions = collect(ontology, &class.iri, &property);
            match resolver.resolve(&class.iri, &property, &restrictions) {
                Ok(profile) => properties.push(profile),
                Err(source) if is_mandatory(config, &property) => {
                    return Err(GenerationError::MandatoryProperty {
                        class: class.iri.clone(),
                        property,
                        source,
                    });
                }
                Err(error) => {
                    tracing::warn!(class = %class.iri, %property, %error, "skipping property");
                    diagnostics.skipped.push(SkippedProperty {
                        class: class.iri.clone(),
                        property,
                        error,
                    });
                }
            }
        }
        tracing::debug!(class = %class.iri, properties = properties.len(), "profiled class");
        classes.push(ClassProfile {
            iri: class.iri.clone(),
            name: class.name.clone(),
            comment: class.description().to_string(),
            properties,
            structural_bases: structural_bases(ontology, &class.iri, |c| {
                enums.classify(c).is_some()
            }),
        });
    }

    let enum_types: Vec<EnumType> = enums
        .enum_classes()
        .filter_map(|info| {
            let iri = info.class.as_deref()?;
            Some(EnumType {
                iri: iri.to_string(),
                name: local_name(iri).to_string(),
                comment: ontology
                    .class(iri)
                    .map(|c| c.description().to_string())
                    .unwrap_or_default(),
                symbols: info.symbols.clone(),
            })
        })
        .collect();
    diagnostics.dropped = enums.dropped().to_vec();

    let class_index = classes
        .iter()
        .enumerate()
        .map(|(i, c): (usize, &ClassProfile)| (c.iri.clone(), i))
        .collect();
    tracing::info!(
        classes = classes.len(),
        enums = enum_types.len(),
        skipped = diagnostics.skipped.len(),
        dropped = diagnostics.dropped.len(),
        "assembled schema document"
    );

    Ok(SchemaDocument {
        root,
        title: config.title.clone(),
        schema_id: config.schema_id.clone(),
        draft: config.json_schema_draft.clone(),
        collections,
        synthetic: config.synthetic.clone(),
        classes,
        enums: enum_types,
        diagnostics,
        renames: config.renames.clone(),
        class_index,
    })
}

fn is_mandatory(config: &GeneratorConfig, property: &str) -> bool {
    let name = local_name(property);
    config
        .mandatory_properties
        .iter()
        .any(|m| m == name || m == property)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolve::{Multiplicity, ResolvedType};

    const LIBRARY: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix ex:   <http://example.org/lib#> .

ex:Catalog a owl:Class ;
    rdfs:comment "A library catalog." ;
    rdfs:subClassOf
        [ a owl:Restriction ; owl:onProperty ex:version ; owl:onDataRange xsd:string ;
          owl:cardinality "1"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ; owl:onProperty ex:broken ; owl:onClass ex:Book ] ,
        [ a owl:Restriction ; owl:onProperty ex:broken ; owl:onClass ex:Shelf ] .

ex:Item a owl:Class ;
    rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:title ; owl:onDataRange xsd:string ;
        owl:cardinality "1"^^xsd:nonNegativeInteger ] .
ex:Book a owl:Class ; rdfs:subClassOf ex:Item ,
    [ a owl:Restriction ; owl:onProperty ex:genre ; owl:onClass ex:Genre ;
      owl:minCardinality "0"^^xsd:nonNegativeInteger ] .
ex:Shelf a owl:Class ; rdfs:label "Bookshelf" .

ex:Genre a owl:Class ; rdfs:comment "Kinds of book." .
ex:genre_fiction a owl:NamedIndividual , ex:Genre .
ex:genre_poetry a owl:NamedIndividual , ex:Genre .

ex:version a owl:DatatypeProperty .
ex:title a owl:DatatypeProperty .
ex:genre a owl:ObjectProperty .
"#;

    fn config() -> GeneratorConfig {
        GeneratorConfig::from_toml_str(
            r#"
namespace = "http://example.org/lib#"
root_class = "Catalog"
mandatory_properties = ["version"]
synthetic = []
renames = { version = "catalogVersion" }

[collections]
Book = "books"
"#,
        )
        .unwrap()
    }

    fn iri(local: &str) -> String {
        format!("http://example.org/lib#{local}")
    }

    #[test]
    fn profiles_structural_classes_and_enums() {
        let o = Ontology::from_turtle(LIBRARY).unwrap();
        let doc = assemble(&o, &config(), SymbolRegistry::derived(&o)).unwrap();

        let names: Vec<&str> = doc.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Catalog", "Item", "Book", "Shelf"]);
        assert_eq!(doc.enums.len(), 1);
        assert_eq!(doc.enums[0].symbols, vec!["FICTION", "POETRY"]);
        assert_eq!(doc.enums[0].comment, "Kinds of book.");
        assert_eq!(doc.class(&iri("Shelf")).unwrap().comment, "Bookshelf");
        assert_eq!(doc.root_class().unwrap().comment, "A library catalog.");

        let book = doc.class(&iri("Book")).unwrap();
        assert_eq!(book.structural_bases, vec![iri("Item")]);
        let genre = book.property(&iri("genre")).unwrap();
        assert_eq!(genre.multiplicity, Multiplicity::List { min: 0, max: None });
        assert!(matches!(genre.resolved_type, ResolvedType::Enum(_)));
        assert_eq!(doc.wire_name(genre, true), "genres");
        assert_eq!(doc.wire_name(genre, false), "genre");
        assert!(book.property(&iri("title")).unwrap().required);

        assert_eq!(
            doc.collections,
            vec![Collection {
                class: iri("Book"),
                name: "books".into()
            }]
        );
    }

    #[test]
    fn unresolvable_properties_are_skipped_and_reported() {
        let o = Ontology::from_turtle(LIBRARY).unwrap();
        let doc = assemble(&o, &config(), SymbolRegistry::derived(&o)).unwrap();
        let catalog = doc.root_class().unwrap();
        assert!(catalog.property(&iri("broken")).is_none());
        assert_eq!(doc.diagnostics.skipped.len(), 1);
        assert!(matches!(
            doc.diagnostics.skipped[0].error,
            ResolutionError::AmbiguousType { .. }
        ));
        let version = catalog.property(&iri("version")).unwrap();
        assert_eq!(doc.wire_name(version, true), "catalogVersion");
    }

    #[test]
    fn mandatory_property_failure_is_fatal() {
        let o = Ontology::from_turtle(LIBRARY).unwrap();
        let mut config = config();
        config.mandatory_properties = vec!["broken".into()];
        let err = assemble(&o, &config, SymbolRegistry::derived(&o)).unwrap_err();
        assert!(matches!(err, GenerationError::MandatoryProperty { ref property, .. } if *property == iri("broken")));
    }

    #[test]
    fn missing_root_or_collection_is_fatal() {
        let o = Ontology::from_turtle(LIBRARY).unwrap();
        let mut config = config();
        config.collections.insert("Magazine".into(), "magazines".into());
        let err = assemble(&o, &config, SymbolRegistry::new()).unwrap_err();
        assert!(matches!(err, GenerationError::MissingClass(ref c) if *c == iri("Magazine")));

        let mut config = self::config();
        config.root_class = "Archive".into();
        assert!(matches!(
            assemble(&o, &config, SymbolRegistry::new()),
            Err(GenerationError::MissingClass(_))
        ));
    }

    #[test]
    fn collections_are_ordered_by_class_name() {
        let o = Ontology::from_turtle(LIBRARY).unwrap();
        let mut config = config();
        config.collections.insert("Shelf".into(), "shelves".into());
        config.collections.insert("Item".into(), "items".into());
        let doc = assemble(&o, &config, SymbolRegistry::derived(&o)).unwrap();
        let names: Vec<&str> = doc.collections.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["books", "items", "shelves"]);
    }

    #[test]
    fn dropped_individuals_are_reported() {
        let o = Ontology::from_turtle(LIBRARY).unwrap();
        let symbols = SymbolRegistry::new().with(iri("genre_fiction"), "FICTION");
        let doc = assemble(&o, &config(), symbols).unwrap();
        assert_eq!(doc.enums[0].symbols, vec!["FICTION"]);
        assert_eq!(doc.diagnostics.dropped.len(), 1);
        assert_eq!(doc.diagnostics.dropped[0].individual, iri("genre_poetry"));
    }
}
