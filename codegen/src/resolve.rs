//! Type and cardinality resolution.
//!
//! Turns the restrictions collected for one (class, property) pair into a
//! single [`PropertyProfile`]. Both emitters render profiles; neither looks at
//! restrictions directly.

use owlschema_ontology::model::iris::OWL_THING;
use owlschema_ontology::{local_name, ClassExpression, Ontology, Restriction};

use crate::enums::{EnumInfo, EnumResolver};
use crate::mapping::xsd_to_primitive;

/// Scalar value categories shared by JSON Schema and XML Schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `xsd:boolean`.
    Boolean,
    /// `xsd:integer` and its restrictions.
    Integer,
    /// `xsd:decimal`, `xsd:double`, `xsd:float`.
    Number,
    /// Every other literal datatype.
    String,
}

/// The single value-type decision for a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedType {
    /// A literal.
    Primitive(Primitive),
    /// One of a fixed set of symbols.
    Enum(EnumInfo),
    /// An identifier pointing at an instance elsewhere in the document.
    Reference {
        /// The referenced class IRI.
        class: String,
        /// Human-readable role, e.g. `SPDX ID`.
        role: String,
    },
    /// A nested structure of the given class IRI.
    Object(String),
}

/// How many values a property carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    /// At most one value.
    Scalar,
    /// An ordered collection.
    List {
        /// Lower bound.
        min: u32,
        /// Upper bound; `None` is unbounded.
        max: Option<u32>,
    },
}

impl Multiplicity {
    /// Returns true for [`Multiplicity::List`].
    #[must_use]
    pub fn is_list(self) -> bool {
        matches!(self, Multiplicity::List { .. })
    }
}

/// The resolved shape of one property on one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyProfile {
    /// Property IRI.
    pub property: String,
    /// Local name (before renaming).
    pub name: String,
    /// Documentation, verbatim.
    pub comment: String,
    /// Value type.
    pub resolved_type: ResolvedType,
    /// Whether instances must carry at least one value.
    pub required: bool,
    /// Scalar or list.
    pub multiplicity: Multiplicity,
    /// `owl:deprecated true` on the property.
    pub deprecated: bool,
}

/// Why a (class, property) pair has no profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Restrictions name more than one distinct value type.
    #[error("property {property} of {class} has conflicting value types: {}", candidates.join(", "))]
    AmbiguousType {
        /// Class IRI.
        class: String,
        /// Property IRI.
        property: String,
        /// Distinct candidates, in restriction order.
        candidates: Vec<String>,
    },
    /// No restriction, range, or fallback supplies a value type.
    #[error("property {property} of {class} has no value type")]
    NoType {
        /// Class IRI.
        class: String,
        /// Property IRI.
        property: String,
    },
    /// The value type IRI is neither a datatype nor a declared class.
    #[error("property {property} has unknown value type {value_type}")]
    UnknownValueType {
        /// Property IRI.
        property: String,
        /// The unknown IRI.
        value_type: String,
    },
    /// The value type is an anonymous expression with no schema equivalent.
    #[error("property {property} has unsupported value type {expression}")]
    UnsupportedValueType {
        /// Property IRI.
        property: String,
        /// Key of the offending expression.
        expression: String,
    },
}

/// Ontology-specific resolution settings.
#[derive(Debug, Clone, Default)]
pub struct ResolverPolicy {
    /// Property IRIs typed as strings when nothing else applies.
    pub text_fallbacks: Vec<String>,
    /// Reference-like class IRIs and their roles.
    pub references: Vec<(String, String)>,
}

/// Produces [`PropertyProfile`]s.
#[derive(Debug)]
pub struct Resolver<'a> {
    ontology: &'a Ontology,
    enums: &'a EnumResolver,
    policy: ResolverPolicy,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over one ontology.
    #[must_use]
    pub fn new(ontology: &'a Ontology, enums: &'a EnumResolver, policy: ResolverPolicy) -> Self {
        Self {
            ontology,
            enums,
            policy,
        }
    }

    /// Resolves `property` on `class` from the restrictions collected for it.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] when the value type is ambiguous, missing,
    /// unknown, or has no schema equivalent.
    pub fn resolve(
        &self,
        class: &str,
        property: &str,
        restrictions: &[&Restriction],
    ) -> Result<PropertyProfile, ResolutionError> {
        let decl = self.ontology.property(property);

        let has_values: Vec<&str> = restrictions
            .iter()
            .filter_map(|r| r.has_value.as_deref())
            .collect();
        let has_value_symbols = self.enums.symbols_for(has_values.iter().copied());

        let mut candidates: Vec<ClassExpression> = Vec::new();
        let explicit = restrictions
            .iter()
            .filter_map(|r| r.value_type.clone())
            .chain(has_values.iter().filter_map(|iri| {
                self.ontology
                    .individual(iri)
                    .and_then(|ind| ind.classes.first())
                    .map(|c| ClassExpression::Named(c.clone()))
            }));
        for expr in explicit {
            if !candidates.iter().any(|c| c.key() == expr.key()) {
                candidates.push(expr);
            }
        }
        if candidates.len() > 1 {
            return Err(ResolutionError::AmbiguousType {
                class: class.to_string(),
                property: property.to_string(),
                candidates: candidates.iter().map(ClassExpression::key).collect(),
            });
        }

        let value_type = match candidates.pop() {
            Some(expr) => Some(expr),
            None => decl.and_then(|p| p.range.clone()),
        };
        let resolved_type = match value_type {
            Some(expr) => self.classify(property, &expr, has_value_symbols)?,
            None if !has_value_symbols.is_empty() => ResolvedType::Enum(EnumInfo {
                class: None,
                symbols: has_value_symbols,
            }),
            None if self.policy.text_fallbacks.iter().any(|p| p == property) => {
                ResolvedType::Primitive(Primitive::String)
            }
            None => {
                return Err(ResolutionError::NoType {
                    class: class.to_string(),
                    property: property.to_string(),
                })
            }
        };

        Ok(PropertyProfile {
            property: property.to_string(),
            name: decl.map_or_else(|| local_name(property).to_string(), |p| p.name.clone()),
            comment: decl.map(|p| p.comment.clone()).unwrap_or_default(),
            resolved_type,
            required: is_required(restrictions),
            multiplicity: multiplicity(restrictions),
            deprecated: decl.is_some_and(|p| p.deprecated),
        })
    }

    fn classify(
        &self,
        property: &str,
        expr: &ClassExpression,
        has_value_symbols: Vec<String>,
    ) -> Result<ResolvedType, ResolutionError> {
        match expr {
            ClassExpression::Named(iri) => {
                if let Some(p) = xsd_to_primitive(iri) {
                    return Ok(ResolvedType::Primitive(p));
                }
                if let Some(info) = self.enums.classify(iri) {
                    return Ok(ResolvedType::Enum(info.clone()));
                }
                if !has_value_symbols.is_empty() {
                    return Ok(ResolvedType::Enum(EnumInfo {
                        class: None,
                        symbols: has_value_symbols,
                    }));
                }
                if self.ontology.class(iri).is_none() && iri != OWL_THING {
                    return Err(ResolutionError::UnknownValueType {
                        property: property.to_string(),
                        value_type: iri.clone(),
                    });
                }
                Ok(match self.reference_role(iri) {
                    Some(role) => ResolvedType::Reference {
                        class: iri.clone(),
                        role,
                    },
                    None => ResolvedType::Object(iri.clone()),
                })
            }
            ClassExpression::OneOf(members) => {
                let symbols = self.enums.symbols_for(members.iter().map(String::as_str));
                if symbols.is_empty() {
                    return Err(self.unsupported(property, expr));
                }
                Ok(ResolvedType::Enum(EnumInfo {
                    class: None,
                    symbols,
                }))
            }
            ClassExpression::Union(ops) => {
                let mut primitives = ops
                    .iter()
                    .map(|op| op.as_named().and_then(xsd_to_primitive));
                match primitives.next() {
                    Some(Some(first)) if primitives.all(|p| p == Some(first)) => {
                        Ok(ResolvedType::Primitive(first))
                    }
                    _ => Err(self.unsupported(property, expr)),
                }
            }
            ClassExpression::Restriction(_)
            | ClassExpression::Intersection(_)
            | ClassExpression::Unsupported(_) => Err(self.unsupported(property, expr)),
        }
    }

    fn unsupported(&self, property: &str, expr: &ClassExpression) -> ResolutionError {
        ResolutionError::UnsupportedValueType {
            property: property.to_string(),
            expression: expr.key(),
        }
    }

    /// The role of `class` if it, or a named ancestor, is reference-like.
    fn reference_role(&self, class: &str) -> Option<String> {
        let mut stack = vec![class.to_string()];
        let mut visited: Vec<String> = Vec::new();
        while let Some(iri) = stack.pop() {
            if visited.contains(&iri) {
                continue;
            }
            if let Some((_, role)) = self.policy.references.iter().find(|(c, _)| *c == iri) {
                return Some(role.clone());
            }
            if let Some(c) = self.ontology.class(&iri) {
                stack.extend(
                    c.superclasses
                        .iter()
                        .filter_map(ClassExpression::as_named)
                        .map(str::to_string),
                );
            }
            visited.push(iri);
        }
        None
    }
}

/// Required iff some restriction sets a minimum or absolute cardinality above 0.
#[must_use]
pub fn is_required(restrictions: &[&Restriction]) -> bool {
    restrictions.iter().any(|r| {
        r.cardinality.is_some_and(|n| n > 0) || r.min_cardinality.is_some_and(|n| n > 0)
    })
}

/// Scalar or list, from the collected cardinalities.
///
/// A list as soon as one restriction allows more than one value. The list
/// bounds then tighten over all restrictions: the largest minimum and the
/// smallest maximum.
///
/// Any `owl:minCardinality` makes the property a list, even `0` and even
/// without a maximum. SPDX only ever writes minimum cardinalities on
/// collection-valued properties and this rule depends on that convention.
#[must_use]
pub fn multiplicity(restrictions: &[&Restriction]) -> Multiplicity {
    let absolute = restrictions.iter().filter_map(|r| r.cardinality).max();
    let min = restrictions.iter().filter_map(|r| r.min_cardinality).max();
    let max = restrictions.iter().filter_map(|r| r.max_cardinality).min();
    let list = absolute.is_some_and(|n| n > 1)
        || restrictions
            .iter()
            .any(|r| r.max_cardinality.is_some_and(|n| n > 1))
        || min.is_some();
    if !list {
        return Multiplicity::Scalar;
    }
    match absolute {
        Some(n) => Multiplicity::List {
            min: n,
            max: Some(n),
        },
        None => Multiplicity::List {
            min: min.unwrap_or(0),
            max,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::collect::collect;
    use crate::symbols::SymbolRegistry;

    const SHOP: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix ex:   <http://example.org/s#> .

ex:Element a owl:Class .
ex:Item a owl:Class ; rdfs:subClassOf ex:Element .
ex:Tag a owl:Class .
ex:Label a owl:Class .

ex:Status a owl:Class .
ex:status_open a owl:NamedIndividual , ex:Status .
ex:status_closed a owl:NamedIndividual , ex:Status .

ex:Order a owl:Class ;
    rdfs:subClassOf
        [ a owl:Restriction ; owl:onProperty ex:note ; owl:maxCardinality "1"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ; owl:onProperty ex:line ; owl:onClass ex:Item ;
          owl:minCardinality "1"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ; owl:onProperty ex:slot ; owl:cardinality "3"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ; owl:onProperty ex:tag ; owl:onClass ex:Tag ] ,
        [ a owl:Restriction ; owl:onProperty ex:tag ; owl:onClass ex:Label ] ,
        [ a owl:Restriction ; owl:onProperty ex:status ; owl:onClass ex:Status ;
          owl:cardinality "1"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ; owl:onProperty ex:flag ; owl:hasValue ex:status_open ] ,
        [ a owl:Restriction ; owl:onProperty ex:size ;
          owl:allValuesFrom [ owl:unionOf ( xsd:int xsd:integer ) ] ] ,
        [ a owl:Restriction ; owl:onProperty ex:odd ;
          owl:allValuesFrom [ owl:unionOf ( xsd:int xsd:string ) ] ] ,
        [ a owl:Restriction ; owl:onProperty ex:ghost ; owl:onClass ex:Nowhere ] .

ex:note a owl:DatatypeProperty ; rdfs:range xsd:string ; rdfs:comment "Free text." .
ex:line a owl:ObjectProperty .
ex:slot a owl:DatatypeProperty ; rdfs:range xsd:integer .
ex:untyped a owl:DatatypeProperty ; rdfs:domain ex:Order .
ex:old a owl:DatatypeProperty ; rdfs:domain ex:Order ; rdfs:range xsd:boolean ;
    owl:deprecated "true"^^xsd:boolean .
"#;

    fn iri(local: &str) -> String {
        format!("http://example.org/s#{local}")
    }

    fn resolve_on(
        class: &str,
        property: &str,
        policy: ResolverPolicy,
    ) -> Result<PropertyProfile, ResolutionError> {
        let o = Ontology::from_turtle(SHOP).unwrap();
        let registry = SymbolRegistry::new()
            .with(iri("status_open"), "OPEN")
            .with(iri("status_closed"), "CLOSED");
        let enums = EnumResolver::new(&o, registry);
        let resolver = Resolver::new(&o, &enums, policy);
        let restrictions = collect(&o, &iri(class), &iri(property));
        resolver.resolve(&iri(class), &iri(property), &restrictions)
    }

    fn order(property: &str) -> Result<PropertyProfile, ResolutionError> {
        resolve_on("Order", property, ResolverPolicy::default())
    }

    #[test]
    fn max_one_is_optional_scalar() {
        let p = order("note").unwrap();
        assert_eq!(p.multiplicity, Multiplicity::Scalar);
        assert!(!p.required);
        assert_eq!(p.resolved_type, ResolvedType::Primitive(Primitive::String));
        assert_eq!(p.comment, "Free text.");
    }

    // Relies on the authoring convention that a minimum cardinality marks a
    // collection-valued property.
    #[test]
    fn min_one_is_required_unbounded_list() {
        let p = order("line").unwrap();
        assert_eq!(p.multiplicity, Multiplicity::List { min: 1, max: None });
        assert!(p.required);
        assert_eq!(p.resolved_type, ResolvedType::Object(iri("Item")));
    }

    #[test]
    fn exact_three_is_fixed_list() {
        let p = order("slot").unwrap();
        assert_eq!(
            p.multiplicity,
            Multiplicity::List {
                min: 3,
                max: Some(3)
            }
        );
        assert_eq!(p.resolved_type, ResolvedType::Primitive(Primitive::Integer));
    }

    #[test]
    fn any_maximum_above_one_makes_a_list() {
        let bounded = |node: &str, max| Restriction {
            node: node.to_string(),
            on_property: iri("note"),
            value_type: None,
            cardinality: None,
            min_cardinality: None,
            max_cardinality: Some(max),
            has_value: None,
        };
        let (one, three) = (bounded("_:a", 1), bounded("_:b", 3));
        let expected = Multiplicity::List {
            min: 0,
            max: Some(1),
        };
        assert_eq!(multiplicity(&[&one, &three]), expected);
        assert_eq!(multiplicity(&[&three, &one]), expected);
        assert!(!is_required(&[&one, &three]));
    }

    #[test]
    fn conflicting_value_types_are_ambiguous() {
        let err = order("tag").unwrap_err();
        assert_eq!(
            err,
            ResolutionError::AmbiguousType {
                class: iri("Order"),
                property: iri("tag"),
                candidates: vec![iri("Tag"), iri("Label")],
            }
        );
    }

    #[test]
    fn enumeration_class_value_type() {
        let p = order("status").unwrap();
        assert!(p.required);
        let ResolvedType::Enum(info) = p.resolved_type else {
            unreachable!("status resolves to an enum");
        };
        assert_eq!(info.symbols, vec!["OPEN", "CLOSED"]);
    }

    #[test]
    fn has_value_uses_the_individual_class() {
        let p = order("flag").unwrap();
        assert!(matches!(p.resolved_type, ResolvedType::Enum(ref e) if e.class.as_deref() == Some(iri("Status").as_str())));
        assert_eq!(p.name, "flag");
    }

    #[test]
    fn datatype_unions() {
        assert_eq!(
            order("size").unwrap().resolved_type,
            ResolvedType::Primitive(Primitive::Integer)
        );
        assert!(matches!(
            order("odd").unwrap_err(),
            ResolutionError::UnsupportedValueType { .. }
        ));
    }

    #[test]
    fn unknown_and_missing_types() {
        assert!(matches!(
            order("ghost").unwrap_err(),
            ResolutionError::UnknownValueType { .. }
        ));
        assert!(matches!(
            order("untyped").unwrap_err(),
            ResolutionError::NoType { .. }
        ));
        let fallback = ResolverPolicy {
            text_fallbacks: vec![iri("untyped")],
            references: Vec::new(),
        };
        assert_eq!(
            resolve_on("Order", "untyped", fallback).unwrap().resolved_type,
            ResolvedType::Primitive(Primitive::String)
        );
    }

    #[test]
    fn reference_role_is_inherited() {
        let policy = ResolverPolicy {
            text_fallbacks: Vec::new(),
            references: vec![(iri("Element"), "Element ID".to_string())],
        };
        let p = resolve_on("Order", "line", policy).unwrap();
        assert_eq!(
            p.resolved_type,
            ResolvedType::Reference {
                class: iri("Item"),
                role: "Element ID".to_string()
            }
        );
    }

    #[test]
    fn deprecated_flag_is_carried() {
        let p = order("old").unwrap();
        assert!(p.deprecated);
        assert_eq!(p.multiplicity, Multiplicity::Scalar);
        assert!(!p.required);
    }
}
