//! Builds the [`Ontology`] arena from parsed RDF statements.
//!
//! Class declarations, property declarations and individuals are discovered
//! from `rdf:type` statements in document order. Superclass edges are turned
//! into [`ClassExpression`] trees; anonymous restriction, union, intersection
//! and `oneOf` nodes are resolved eagerly so that later stages never touch the
//! raw graph.

use std::collections::{HashMap, HashSet};

use crate::error::OntologyError;
use crate::model::iris::*;
use crate::model::{
    local_name, ClassExpression, Individual, Ontology, OntologyClass, OntologyProperty,
    PropertyKind, Restriction,
};
use crate::rdf::{RdfGraph, RdfNode, RdfObject};

const VALUE_TYPE_PREDICATES: &[&str] = &[
    OWL_ON_CLASS,
    OWL_ON_DATA_RANGE,
    OWL_ALL_VALUES_FROM,
    OWL_SOME_VALUES_FROM,
];

/// Builds the ontology arena.
///
/// # Errors
///
/// Returns an error on malformed lists, restrictions without a property, or
/// non-numeric cardinalities.
pub fn build(graph: &RdfGraph) -> Result<Ontology, OntologyError> {
    let mut ontology = Ontology::default();
    let mut class_order: Vec<String> = Vec::new();
    let mut property_order: Vec<(String, PropertyKind)> = Vec::new();

    for st in graph.statements() {
        let Some(subject) = st.subject.as_iri() else {
            continue;
        };
        if st.predicate == RDFS_SUBCLASS_OF {
            push_unique(&mut class_order, subject);
            continue;
        }
        if st.predicate != RDF_TYPE {
            continue;
        }
        match st.object.as_iri() {
            Some(OWL_ONTOLOGY) => {
                if ontology.iri.is_none() {
                    ontology.iri = Some(subject.to_string());
                }
            }
            Some(OWL_CLASS) | Some(RDFS_CLASS) => push_unique(&mut class_order, subject),
            Some(OWL_OBJECT_PROPERTY) => declare_property(&mut property_order, subject, PropertyKind::Object),
            Some(OWL_DATATYPE_PROPERTY) => {
                declare_property(&mut property_order, subject, PropertyKind::Datatype)
            }
            Some(OWL_ANNOTATION_PROPERTY) => {
                declare_property(&mut property_order, subject, PropertyKind::Annotation)
            }
            Some(OWL_FUNCTIONAL_PROPERTY) => {
                declare_property(&mut property_order, subject, PropertyKind::Undeclared)
            }
            _ => {}
        }
    }

    let declared: HashSet<&str> = class_order.iter().map(String::as_str).collect();

    for iri in &class_order {
        let class = build_class(graph, iri)?;
        ontology.class_index.insert(iri.clone(), ontology.classes.len());
        ontology.classes.push(class);
    }

    for (iri, kind) in &property_order {
        let property = build_property(graph, iri, *kind)?;
        ontology
            .property_index
            .insert(iri.clone(), ontology.properties.len());
        ontology.properties.push(property);
    }

    collect_individuals(graph, &declared, &mut ontology)?;

    tracing::debug!(
        classes = ontology.classes.len(),
        properties = ontology.properties.len(),
        individuals = ontology.individuals.len(),
        "built ontology arena"
    );
    Ok(ontology)
}

fn push_unique(order: &mut Vec<String>, iri: &str) {
    if !order.iter().any(|c| c == iri) {
        order.push(iri.to_string());
    }
}

fn declare_property(order: &mut Vec<(String, PropertyKind)>, iri: &str, kind: PropertyKind) {
    match order.iter_mut().find(|(p, _)| p == iri) {
        // `owl:FunctionalProperty` alone does not tell us the kind.
        Some((_, existing)) if *existing == PropertyKind::Undeclared => *existing = kind,
        Some(_) => {}
        None => order.push((iri.to_string(), kind)),
    }
}

fn build_class(graph: &RdfGraph, iri: &str) -> Result<OntologyClass, OntologyError> {
    let node = RdfNode::Iri(iri.to_string());
    let mut visiting = HashSet::new();
    let mut superclasses = Vec::new();

    for predicate in [RDFS_SUBCLASS_OF, OWL_EQUIVALENT_CLASS] {
        for object in graph.objects(&node, predicate) {
            let Some(target) = object.as_node() else {
                continue;
            };
            if target.as_iri() == Some(iri) {
                continue;
            }
            superclasses.push(class_expression(graph, target, &mut visiting)?);
        }
    }

    // A named class defined directly as a union or intersection.
    if let Some(head) = graph.object(&node, OWL_UNION_OF) {
        superclasses.push(ClassExpression::Union(operands(graph, head, &mut visiting)?));
    }
    if let Some(head) = graph.object(&node, OWL_INTERSECTION_OF) {
        superclasses.push(ClassExpression::Intersection(operands(
            graph,
            head,
            &mut visiting,
        )?));
    }

    Ok(OntologyClass {
        iri: iri.to_string(),
        name: local_name(iri).to_string(),
        label: graph.literal(&node, RDFS_LABEL).map(str::to_string),
        comment: graph
            .literal(&node, RDFS_COMMENT)
            .unwrap_or_default()
            .to_string(),
        superclasses,
    })
}

fn build_property(
    graph: &RdfGraph,
    iri: &str,
    kind: PropertyKind,
) -> Result<OntologyProperty, OntologyError> {
    let node = RdfNode::Iri(iri.to_string());
    let mut visiting = HashSet::new();

    let range = match graph.object(&node, RDFS_RANGE).and_then(RdfObject::as_node) {
        Some(target) => Some(class_expression(graph, target, &mut visiting)?),
        None => None,
    };

    let mut domains = Vec::new();
    for object in graph.objects(&node, RDFS_DOMAIN) {
        let Some(target) = object.as_node() else {
            continue;
        };
        match class_expression(graph, target, &mut visiting)? {
            ClassExpression::Named(d) => domains.push(d),
            ClassExpression::Union(ops) => {
                domains.extend(ops.iter().filter_map(|o| o.as_named().map(str::to_string)));
            }
            _ => {}
        }
    }

    let deprecated = graph
        .literal(&node, OWL_DEPRECATED)
        .is_some_and(|v| v == "true" || v == "1");

    Ok(OntologyProperty {
        iri: iri.to_string(),
        name: local_name(iri).to_string(),
        comment: graph
            .literal(&node, RDFS_COMMENT)
            .unwrap_or_default()
            .to_string(),
        kind,
        range,
        domains,
        deprecated,
    })
}

/// Individuals are IRI subjects typed with a declared class, plus the members
/// of `owl:oneOf` class definitions.
fn collect_individuals(
    graph: &RdfGraph,
    declared: &HashSet<&str>,
    ontology: &mut Ontology,
) -> Result<(), OntologyError> {
    let mut memberships: Vec<(String, String)> = Vec::new();

    for st in graph.statements() {
        let (Some(subject), Some(class)) = (st.subject.as_iri(), st.object.as_iri()) else {
            continue;
        };
        if st.predicate == RDF_TYPE && declared.contains(class) {
            memberships.push((subject.to_string(), class.to_string()));
        }
    }

    for class in ontology.classes.iter().map(|c| c.iri.clone()).collect::<Vec<_>>() {
        let node = RdfNode::Iri(class.clone());
        if let Some(head) = graph.object(&node, OWL_ONE_OF) {
            for member in list_members(graph, head)? {
                if let Some(iri) = member.as_iri() {
                    memberships.push((iri.to_string(), class.clone()));
                }
            }
        }
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    for (iri, class) in memberships {
        let slot = match index.get(&iri) {
            Some(&i) => i,
            None => {
                let node = RdfNode::Iri(iri.clone());
                ontology.individuals.push(Individual {
                    name: local_name(&iri).to_string(),
                    comment: graph
                        .literal(&node, RDFS_COMMENT)
                        .unwrap_or_default()
                        .to_string(),
                    iri: iri.clone(),
                    classes: Vec::new(),
                });
                index.insert(iri, ontology.individuals.len() - 1);
                ontology.individuals.len() - 1
            }
        };
        let individual = &mut ontology.individuals[slot];
        if !individual.classes.contains(&class) {
            individual.classes.push(class);
        }
    }
    ontology.individual_index = index;
    Ok(())
}

fn class_expression(
    graph: &RdfGraph,
    node: &RdfNode,
    visiting: &mut HashSet<RdfNode>,
) -> Result<ClassExpression, OntologyError> {
    let id = match node {
        RdfNode::Iri(iri) => return Ok(ClassExpression::Named(iri.clone())),
        RdfNode::Blank(id) => id.clone(),
    };
    if !visiting.insert(node.clone()) {
        return Ok(ClassExpression::Unsupported(id));
    }

    let expression = if graph.has_type(node, OWL_RESTRICTION) || graph.has(node, OWL_ON_PROPERTY) {
        ClassExpression::Restriction(Box::new(restriction(graph, node, &id, visiting)?))
    } else if let Some(head) = graph.object(node, OWL_UNION_OF) {
        ClassExpression::Union(operands(graph, head, visiting)?)
    } else if let Some(head) = graph.object(node, OWL_INTERSECTION_OF) {
        ClassExpression::Intersection(operands(graph, head, visiting)?)
    } else if let Some(head) = graph.object(node, OWL_ONE_OF) {
        ClassExpression::OneOf(
            list_members(graph, head)?
                .iter()
                .filter_map(|m| m.as_iri().map(str::to_string))
                .collect(),
        )
    } else {
        ClassExpression::Unsupported(id)
    };

    visiting.remove(node);
    Ok(expression)
}

fn restriction(
    graph: &RdfGraph,
    node: &RdfNode,
    id: &str,
    visiting: &mut HashSet<RdfNode>,
) -> Result<Restriction, OntologyError> {
    let on_property = graph
        .object(node, OWL_ON_PROPERTY)
        .and_then(RdfObject::as_iri)
        .ok_or_else(|| OntologyError::MissingOnProperty(id.to_string()))?
        .to_string();

    let value_type = match VALUE_TYPE_PREDICATES
        .iter()
        .find_map(|p| graph.object(node, p).and_then(RdfObject::as_node))
    {
        Some(target) => Some(class_expression(graph, target, visiting)?),
        None => None,
    };

    Ok(Restriction {
        node: id.to_string(),
        on_property,
        value_type,
        cardinality: cardinality(graph, node, id, &[OWL_CARDINALITY, OWL_QUALIFIED_CARDINALITY])?,
        min_cardinality: cardinality(
            graph,
            node,
            id,
            &[OWL_MIN_CARDINALITY, OWL_MIN_QUALIFIED_CARDINALITY],
        )?,
        max_cardinality: cardinality(
            graph,
            node,
            id,
            &[OWL_MAX_CARDINALITY, OWL_MAX_QUALIFIED_CARDINALITY],
        )?,
        has_value: graph
            .object(node, OWL_HAS_VALUE)
            .and_then(RdfObject::as_iri)
            .map(str::to_string),
    })
}

fn cardinality(
    graph: &RdfGraph,
    node: &RdfNode,
    id: &str,
    predicates: &[&str],
) -> Result<Option<u32>, OntologyError> {
    let Some(value) = predicates.iter().find_map(|p| graph.literal(node, p)) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| OntologyError::InvalidCardinality {
            node: id.to_string(),
            value: value.to_string(),
        })
}

fn operands(
    graph: &RdfGraph,
    head: &RdfObject,
    visiting: &mut HashSet<RdfNode>,
) -> Result<Vec<ClassExpression>, OntologyError> {
    let mut out = Vec::new();
    for member in list_members(graph, head)? {
        match member.as_node() {
            Some(node) => out.push(class_expression(graph, node, visiting)?),
            None => return Err(OntologyError::MalformedList(describe(head))),
        }
    }
    Ok(out)
}

/// Walks an `rdf:List` from `head` to `rdf:nil`.
fn list_members(graph: &RdfGraph, head: &RdfObject) -> Result<Vec<RdfObject>, OntologyError> {
    let mut members = Vec::new();
    let mut seen: HashSet<&RdfNode> = HashSet::new();
    let mut cursor = head;
    loop {
        let node = match cursor {
            RdfObject::Node(RdfNode::Iri(iri)) if iri == RDF_NIL => return Ok(members),
            RdfObject::Node(node) => node,
            RdfObject::Literal(_) => return Err(OntologyError::MalformedList(describe(head))),
        };
        if !seen.insert(node) {
            return Err(OntologyError::MalformedList(describe(head)));
        }
        let first = graph
            .object(node, RDF_FIRST)
            .ok_or_else(|| OntologyError::MalformedList(describe(head)))?;
        members.push(first.clone());
        cursor = graph
            .object(node, RDF_REST)
            .ok_or_else(|| OntologyError::MalformedList(describe(head)))?;
    }
}

fn describe(object: &RdfObject) -> String {
    match object {
        RdfObject::Node(node) => node.id().to_string(),
        RdfObject::Literal(lex) => format!("{lex:?}"),
    }
}
