//! Core ontology model types.
//!
//! A loaded ontology is an arena of classes, properties, and named individuals
//! addressed by IRI. Nothing in here is mutated after [`crate::Ontology::load`]
//! returns; every accessor hands out shared borrows.

use std::collections::HashMap;

/// Whether a property is a datatype, object, or annotation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `owl:DatatypeProperty`: relates a resource to an XSD literal.
    Datatype,
    /// `owl:ObjectProperty`: relates two resources.
    Object,
    /// `owl:AnnotationProperty`: documentation only.
    Annotation,
    /// Referenced by a restriction but never declared.
    Undeclared,
}

/// An anonymous `owl:Restriction` attached to a class through a superclass edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    /// Identifier of the restriction node (blank node label or IRI).
    pub node: String,
    /// Full IRI of the restricted property (`owl:onProperty`).
    pub on_property: String,
    /// Explicit value type (`owl:onClass`, `owl:onDataRange`,
    /// `owl:allValuesFrom` or `owl:someValuesFrom`).
    pub value_type: Option<ClassExpression>,
    /// Absolute cardinality (`owl:cardinality` / `owl:qualifiedCardinality`).
    pub cardinality: Option<u32>,
    /// Minimum cardinality (plain or qualified).
    pub min_cardinality: Option<u32>,
    /// Maximum cardinality (plain or qualified).
    pub max_cardinality: Option<u32>,
    /// Full IRI of the individual named by `owl:hasValue`.
    pub has_value: Option<String>,
}

/// A class expression appearing in a superclass list or as a value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassExpression {
    /// A named class or datatype.
    Named(String),
    /// A property restriction.
    Restriction(Box<Restriction>),
    /// `owl:unionOf` over the operands.
    Union(Vec<ClassExpression>),
    /// `owl:intersectionOf` over the operands.
    Intersection(Vec<ClassExpression>),
    /// `owl:oneOf` over the listed individuals, in list order.
    OneOf(Vec<String>),
    /// Any construct the compiler does not model (e.g. `owl:complementOf`).
    /// Holds the node identifier for diagnostics.
    Unsupported(String),
}

impl ClassExpression {
    /// Returns the IRI if this is a named reference.
    #[must_use]
    pub fn as_named(&self) -> Option<&str> {
        match self {
            ClassExpression::Named(iri) => Some(iri),
            _ => None,
        }
    }

    /// A stable textual key used to compare value-type references.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            ClassExpression::Named(iri) => iri.clone(),
            ClassExpression::Restriction(r) => format!("restriction({})", r.node),
            ClassExpression::Union(ops) => format!("unionOf({})", join_keys(ops)),
            ClassExpression::Intersection(ops) => format!("intersectionOf({})", join_keys(ops)),
            ClassExpression::OneOf(members) => format!("oneOf({})", members.join(" ")),
            ClassExpression::Unsupported(node) => format!("unsupported({node})"),
        }
    }
}

fn join_keys(ops: &[ClassExpression]) -> String {
    ops.iter().map(ClassExpression::key).collect::<Vec<_>>().join(" ")
}

/// An OWL class definition.
#[derive(Debug, Clone)]
pub struct OntologyClass {
    /// Full IRI (e.g., `"http://spdx.org/rdf/terms#Package"`).
    pub iri: String,
    /// Local name (e.g., `"Package"`).
    pub name: String,
    /// `rdfs:label`, if present.
    pub label: Option<String>,
    /// `rdfs:comment`, verbatim. Empty when absent.
    pub comment: String,
    /// Direct superclass expressions in document order.
    pub superclasses: Vec<ClassExpression>,
}

impl OntologyClass {
    /// Human-readable text for the class: the comment, else the label.
    #[must_use]
    pub fn description(&self) -> &str {
        match &self.label {
            Some(label) if self.comment.is_empty() => label,
            _ => &self.comment,
        }
    }
}

/// An OWL property definition.
#[derive(Debug, Clone)]
pub struct OntologyProperty {
    /// Full IRI.
    pub iri: String,
    /// Local name.
    pub name: String,
    /// `rdfs:comment`, verbatim. Empty when absent.
    pub comment: String,
    /// Datatype, object, or annotation property.
    pub kind: PropertyKind,
    /// Declared `rdfs:range`, if any.
    pub range: Option<ClassExpression>,
    /// Full IRIs of declared `rdfs:domain` classes.
    pub domains: Vec<String>,
    /// Whether the property carries `owl:deprecated true`.
    pub deprecated: bool,
}

/// A named individual, used exclusively to model enumeration members.
#[derive(Debug, Clone)]
pub struct Individual {
    /// Full IRI.
    pub iri: String,
    /// Local name.
    pub name: String,
    /// `rdfs:comment`, verbatim. Empty when absent.
    pub comment: String,
    /// Full IRIs of the classes this individual is an instance of.
    pub classes: Vec<String>,
}

/// A loaded ontology graph.
#[derive(Debug, Default)]
pub struct Ontology {
    /// The `owl:Ontology` subject IRI, if declared.
    pub iri: Option<String>,
    pub(crate) classes: Vec<OntologyClass>,
    pub(crate) properties: Vec<OntologyProperty>,
    pub(crate) individuals: Vec<Individual>,
    pub(crate) class_index: HashMap<String, usize>,
    pub(crate) property_index: HashMap<String, usize>,
    pub(crate) individual_index: HashMap<String, usize>,
}

impl Ontology {
    /// Looks up a class by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn class(&self, iri: &str) -> Option<&OntologyClass> {
        self.class_index.get(iri).map(|&i| &self.classes[i])
    }

    /// Looks up a property by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn property(&self, iri: &str) -> Option<&OntologyProperty> {
        self.property_index.get(iri).map(|&i| &self.properties[i])
    }

    /// Looks up a named individual by its full IRI. Returns `None` if not found.
    #[must_use]
    pub fn individual(&self, iri: &str) -> Option<&Individual> {
        self.individual_index.get(iri).map(|&i| &self.individuals[i])
    }

    /// All classes in document order.
    pub fn classes(&self) -> impl Iterator<Item = &OntologyClass> {
        self.classes.iter()
    }

    /// All properties in document order.
    pub fn properties(&self) -> impl Iterator<Item = &OntologyProperty> {
        self.properties.iter()
    }

    /// All individuals in document order.
    pub fn individuals(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    /// Individuals asserted to be instances of `class_iri`, in traversal order.
    pub fn individuals_of<'a>(&'a self, class_iri: &'a str) -> impl Iterator<Item = &'a Individual> {
        self.individuals
            .iter()
            .filter(move |ind| ind.classes.iter().any(|c| c == class_iri))
    }

    /// Returns true if named individuals of this class exist.
    #[must_use]
    pub fn is_enumeration(&self, class_iri: &str) -> bool {
        self.individuals_of(class_iri).next().is_some()
    }

    /// Properties whose declared domain includes `class_iri`.
    pub fn properties_with_domain<'a>(
        &'a self,
        class_iri: &'a str,
    ) -> impl Iterator<Item = &'a OntologyProperty> {
        self.properties
            .iter()
            .filter(move |p| p.domains.iter().any(|d| d == class_iri))
    }

    /// Returns the total number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Returns the total number of properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Returns the total number of named individuals.
    #[must_use]
    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }
}

/// Extracts the local name from a full IRI (after the last `/` or `#`).
#[must_use]
pub fn local_name(iri: &str) -> &str {
    let after_slash = iri.rsplit('/').next().unwrap_or(iri);
    after_slash.rsplit('#').next().unwrap_or(after_slash)
}

/// Standard IRI constants.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdf:first`.
    pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    /// `rdf:rest`.
    pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    /// `rdf:nil`.
    pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";

    /// `rdfs:Class`.
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:seeAlso`.
    pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:Literal`.
    pub const RDFS_LITERAL: &str = "http://www.w3.org/2000/01/rdf-schema#Literal";

    /// `owl:Ontology`.
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:NamedIndividual`.
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:DatatypeProperty`.
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    /// `owl:AnnotationProperty`.
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
    /// `owl:FunctionalProperty`.
    pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";
    /// `owl:Restriction`.
    pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
    /// `owl:onProperty`.
    pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
    /// `owl:onClass`.
    pub const OWL_ON_CLASS: &str = "http://www.w3.org/2002/07/owl#onClass";
    /// `owl:onDataRange`.
    pub const OWL_ON_DATA_RANGE: &str = "http://www.w3.org/2002/07/owl#onDataRange";
    /// `owl:allValuesFrom`.
    pub const OWL_ALL_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#allValuesFrom";
    /// `owl:someValuesFrom`.
    pub const OWL_SOME_VALUES_FROM: &str = "http://www.w3.org/2002/07/owl#someValuesFrom";
    /// `owl:hasValue`.
    pub const OWL_HAS_VALUE: &str = "http://www.w3.org/2002/07/owl#hasValue";
    /// `owl:cardinality`.
    pub const OWL_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#cardinality";
    /// `owl:qualifiedCardinality`.
    pub const OWL_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#qualifiedCardinality";
    /// `owl:minCardinality`.
    pub const OWL_MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";
    /// `owl:minQualifiedCardinality`.
    pub const OWL_MIN_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#minQualifiedCardinality";
    /// `owl:maxCardinality`.
    pub const OWL_MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
    /// `owl:maxQualifiedCardinality`.
    pub const OWL_MAX_QUALIFIED_CARDINALITY: &str =
        "http://www.w3.org/2002/07/owl#maxQualifiedCardinality";
    /// `owl:unionOf`.
    pub const OWL_UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
    /// `owl:intersectionOf`.
    pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
    /// `owl:oneOf`.
    pub const OWL_ONE_OF: &str = "http://www.w3.org/2002/07/owl#oneOf";
    /// `owl:equivalentClass`.
    pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
    /// `owl:deprecated`.
    pub const OWL_DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";

    // XSD datatypes
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:int`.
    pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    /// `xsd:long`.
    pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    /// `xsd:positiveInteger`.
    pub const XSD_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    /// `xsd:nonNegativeInteger`.
    pub const XSD_NON_NEGATIVE_INTEGER: &str =
        "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    /// `xsd:decimal`.
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    /// `xsd:double`.
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// `xsd:float`.
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
}
