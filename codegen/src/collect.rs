//! Restriction collection over the superclass lattice.
//!
//! Restrictions on a property are rarely attached to the class that uses it;
//! they sit on ancestors, inside union operands, or inside intersections. The
//! walk here is a depth-first traversal of superclass expressions with an
//! explicit visited set, so cyclic `rdfs:subClassOf` graphs terminate.

use std::collections::HashSet;

use owlschema_ontology::model::iris::OWL_THING;
use owlschema_ontology::{ClassExpression, Ontology, Restriction};

/// Everything reachable from one class.
struct Lattice<'a> {
    /// Named classes in first-visit order, starting with the class itself.
    classes: Vec<&'a str>,
    /// Restriction nodes in first-visit order, de-duplicated by node.
    restrictions: Vec<&'a Restriction>,
}

struct Walker<'a> {
    ontology: &'a Ontology,
    visited: HashSet<&'a str>,
    nodes: HashSet<&'a str>,
    out: Lattice<'a>,
}

impl<'a> Walker<'a> {
    fn class(&mut self, iri: &'a str) {
        if !self.visited.insert(iri) {
            return;
        }
        self.out.classes.push(iri);
        if let Some(class) = self.ontology.class(iri) {
            for expr in &class.superclasses {
                self.expression(expr);
            }
        }
    }

    fn expression(&mut self, expr: &'a ClassExpression) {
        match expr {
            ClassExpression::Named(iri) => self.class(iri),
            ClassExpression::Restriction(r) => {
                if self.nodes.insert(&r.node) {
                    self.out.restrictions.push(r);
                }
            }
            // Union operands are existential and intersection operands are
            // conjunctive; either way every operand can carry a constraint.
            ClassExpression::Union(ops) | ClassExpression::Intersection(ops) => {
                for op in ops {
                    self.expression(op);
                }
            }
            ClassExpression::OneOf(_) | ClassExpression::Unsupported(_) => {}
        }
    }
}

fn lattice<'a>(ontology: &'a Ontology, class: &str) -> Lattice<'a> {
    let mut walker = Walker {
        ontology,
        visited: HashSet::new(),
        nodes: HashSet::new(),
        out: Lattice {
            classes: Vec::new(),
            restrictions: Vec::new(),
        },
    };
    if let Some(c) = ontology.class(class) {
        walker.class(&c.iri);
    }
    tracing::debug!(
        class,
        visited = walker.out.classes.len(),
        restrictions = walker.out.restrictions.len(),
        "walked superclass lattice"
    );
    walker.out
}

/// Every restriction on `property` that transitively constrains `class`.
///
/// A class with no restrictions on the property yields an empty list. Each
/// restriction node appears once even when reachable along several paths.
#[must_use]
pub fn collect<'a>(ontology: &'a Ontology, class: &str, property: &str) -> Vec<&'a Restriction> {
    lattice(ontology, class)
        .restrictions
        .into_iter()
        .filter(|r| r.on_property == property)
        .collect()
}

/// Every property relevant to `class`, in first-appearance order.
///
/// Properties restricted anywhere in the lattice come first, followed by
/// properties whose declared `rdfs:domain` is one of the visited classes.
#[must_use]
pub fn collect_properties(ontology: &Ontology, class: &str) -> Vec<String> {
    let lattice = lattice(ontology, class);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for r in &lattice.restrictions {
        if seen.insert(&r.on_property) {
            out.push(r.on_property.clone());
        }
    }
    for &visited in &lattice.classes {
        for prop in ontology.properties_with_domain(visited) {
            if seen.insert(&prop.iri) {
                out.push(prop.iri.clone());
            }
        }
    }
    out
}

/// Direct named superclasses usable as an XML Schema extension base.
///
/// Named operands of a direct intersection count as direct superclasses.
/// `owl:Thing`, the class itself, undeclared classes, and classes for which
/// `is_enum` holds are skipped.
#[must_use]
pub fn structural_bases(
    ontology: &Ontology,
    class: &str,
    is_enum: impl Fn(&str) -> bool,
) -> Vec<String> {
    let Some(c) = ontology.class(class) else {
        return Vec::new();
    };
    let mut candidates: Vec<&str> = Vec::new();
    for expr in &c.superclasses {
        match expr {
            ClassExpression::Named(iri) => candidates.push(iri),
            ClassExpression::Intersection(ops) => {
                candidates.extend(ops.iter().filter_map(ClassExpression::as_named));
            }
            _ => {}
        }
    }
    let mut bases: Vec<String> = Vec::new();
    for iri in candidates {
        if iri == OWL_THING
            || iri == class
            || ontology.class(iri).is_none()
            || is_enum(iri)
            || bases.iter().any(|b| b == iri)
        {
            continue;
        }
        bases.push(iri.to_string());
    }
    bases
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LATTICE: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix ex:   <http://example.org/l#> .

ex:Base a owl:Class ;
    rdfs:subClassOf [ a owl:Restriction ;
        owl:onProperty ex:id ;
        owl:cardinality "1"^^xsd:nonNegativeInteger ] .

ex:Mid a owl:Class ;
    rdfs:subClassOf ex:Base ,
        [ owl:unionOf ( ex:Other
                        [ a owl:Restriction ;
                          owl:onProperty ex:note ;
                          owl:maxCardinality "1"^^xsd:nonNegativeInteger ] ) ] .

ex:Leaf a owl:Class ;
    rdfs:subClassOf ex:Mid , ex:Base , owl:Thing ,
        [ a owl:Restriction ;
          owl:onProperty ex:id ;
          owl:onDataRange xsd:string ;
          owl:minCardinality "1"^^xsd:nonNegativeInteger ] .

ex:Other a owl:Class .

ex:Loop1 a owl:Class ; rdfs:subClassOf ex:Loop2 .
ex:Loop2 a owl:Class ; rdfs:subClassOf ex:Loop1 ,
    [ a owl:Restriction ; owl:onProperty ex:id ; owl:maxCardinality "2"^^xsd:nonNegativeInteger ] .

ex:label a owl:DatatypeProperty ; rdfs:domain ex:Base .
ex:id a owl:DatatypeProperty ; rdfs:domain ex:Base .
"#;

    fn iri(local: &str) -> String {
        format!("http://example.org/l#{local}")
    }

    #[test]
    fn collects_through_named_superclasses() {
        let o = Ontology::from_turtle(LATTICE).unwrap();
        let found = collect(&o, &iri("Leaf"), &iri("id"));
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|r| r.cardinality == Some(1)));
        assert!(found.iter().any(|r| r.min_cardinality == Some(1)));
    }

    #[test]
    fn finds_restriction_inside_union_operand() {
        let o = Ontology::from_turtle(LATTICE).unwrap();
        let found = collect(&o, &iri("Mid"), &iri("note"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].max_cardinality, Some(1));
    }

    #[test]
    fn unrestricted_class_yields_nothing() {
        let o = Ontology::from_turtle(LATTICE).unwrap();
        assert!(collect(&o, &iri("Other"), &iri("id")).is_empty());
        assert!(collect(&o, &iri("Missing"), &iri("id")).is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let o = Ontology::from_turtle(LATTICE).unwrap();
        let found = collect(&o, &iri("Loop1"), &iri("id"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].max_cardinality, Some(2));
    }

    #[test]
    fn property_order_is_restrictions_then_domains() {
        let o = Ontology::from_turtle(LATTICE).unwrap();
        assert_eq!(
            collect_properties(&o, &iri("Leaf")),
            vec![iri("id"), iri("note"), iri("label")]
        );
    }

    #[test]
    fn bases_skip_thing_and_duplicates() {
        let o = Ontology::from_turtle(LATTICE).unwrap();
        assert_eq!(
            structural_bases(&o, &iri("Leaf"), |_| false),
            vec![iri("Mid"), iri("Base")]
        );
        assert_eq!(structural_bases(&o, &iri("Mid"), |_| false), vec![iri("Base")]);
        assert!(structural_bases(&o, &iri("Mid"), |c| c == iri("Base")).is_empty());
    }
}
