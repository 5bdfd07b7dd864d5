//! RDF intake.
//!
//! Parses Turtle, N-Triples, or RDF/XML with the sophia parsers and keeps the
//! resulting statements in document order, indexed by subject. Only the subset
//! of the term model that OWL class axioms need is retained: IRIs, blank nodes,
//! and literal lexical forms.

use std::collections::HashMap;
use std::convert::Infallible;
use std::io::BufRead;
use std::path::Path;

use sophia_api::source::TripleSource;
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple;

use crate::error::OntologyError;

/// RDF serializations accepted by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// Turtle 1.1.
    Turtle,
    /// N-Triples.
    NTriples,
    /// RDF/XML (the usual `.owl` serialization).
    RdfXml,
}

impl RdfFormat {
    /// Picks a format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnsupportedFormat`] for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self, OntologyError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            "nt" => Ok(RdfFormat::NTriples),
            "owl" | "rdf" | "xml" => Ok(RdfFormat::RdfXml),
            _ => Err(OntologyError::UnsupportedFormat(ext)),
        }
    }

    /// Human-readable name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "Turtle",
            RdfFormat::NTriples => "N-Triples",
            RdfFormat::RdfXml => "RDF/XML",
        }
    }
}

/// A subject or non-literal object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RdfNode {
    /// An absolute IRI.
    Iri(String),
    /// A blank node label, unique within one document.
    Blank(String),
}

impl RdfNode {
    /// Returns the IRI if this node is named.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfNode::Iri(iri) => Some(iri),
            RdfNode::Blank(_) => None,
        }
    }

    /// The IRI or blank node label.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            RdfNode::Iri(s) | RdfNode::Blank(s) => s,
        }
    }
}

/// A statement object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RdfObject {
    /// A resource.
    Node(RdfNode),
    /// A literal; only the lexical form is kept.
    Literal(String),
}

impl RdfObject {
    /// Returns the node if the object is a resource.
    #[must_use]
    pub fn as_node(&self) -> Option<&RdfNode> {
        match self {
            RdfObject::Node(n) => Some(n),
            RdfObject::Literal(_) => None,
        }
    }

    /// Returns the IRI if the object is a named resource.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        self.as_node().and_then(RdfNode::as_iri)
    }

    /// Returns the lexical form if the object is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            RdfObject::Literal(s) => Some(s),
            RdfObject::Node(_) => None,
        }
    }
}

/// One triple.
#[derive(Debug, Clone)]
pub struct Statement {
    /// Subject.
    pub subject: RdfNode,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: RdfObject,
}

/// All statements of one document, indexed by subject.
#[derive(Debug, Default)]
pub struct RdfGraph {
    statements: Vec<Statement>,
    by_subject: HashMap<RdfNode, Vec<usize>>,
}

impl RdfGraph {
    /// Builds the subject index over `statements`, keeping their order.
    #[must_use]
    pub fn new(statements: Vec<Statement>) -> Self {
        let mut by_subject: HashMap<RdfNode, Vec<usize>> = HashMap::new();
        for (i, st) in statements.iter().enumerate() {
            by_subject.entry(st.subject.clone()).or_default().push(i);
        }
        Self {
            statements,
            by_subject,
        }
    }

    /// Parses a whole document.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Parse`] if the parser rejects the input.
    pub fn parse<R: BufRead>(reader: R, format: RdfFormat) -> Result<Self, OntologyError> {
        let mut out: Vec<Statement> = Vec::new();
        let parse_error = |e: &dyn std::fmt::Display| OntologyError::Parse {
            format: format.name(),
            message: e.to_string(),
        };
        match format {
            RdfFormat::Turtle => sophia_turtle::parser::turtle::parse_bufread(reader)
                .try_for_each_triple(|t| collect_triple(&mut out, &t))
                .map_err(|e| parse_error(&e))?,
            RdfFormat::NTriples => sophia_turtle::parser::nt::parse_bufread(reader)
                .try_for_each_triple(|t| collect_triple(&mut out, &t))
                .map_err(|e| parse_error(&e))?,
            RdfFormat::RdfXml => sophia_xml::parser::parse_bufread(reader)
                .try_for_each_triple(|t| collect_triple(&mut out, &t))
                .map_err(|e| parse_error(&e))?,
        }
        tracing::debug!(format = format.name(), triples = out.len(), "parsed RDF document");
        Ok(Self::new(out))
    }

    /// All statements in document order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Statements about `subject` in document order.
    pub fn about<'a>(&'a self, subject: &RdfNode) -> impl Iterator<Item = &'a Statement> + 'a {
        self.by_subject
            .get(subject)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.statements[i])
    }

    /// Objects of `(subject, predicate, ?)` in document order.
    pub fn objects<'a, 'p>(
        &'a self,
        subject: &RdfNode,
        predicate: &'p str,
    ) -> impl Iterator<Item = &'a RdfObject> + 'p
    where
        'a: 'p,
    {
        self.about(subject)
            .filter(move |st| st.predicate == predicate)
            .map(|st| &st.object)
    }

    /// The first object of `(subject, predicate, ?)`.
    #[must_use]
    pub fn object(&self, subject: &RdfNode, predicate: &str) -> Option<&RdfObject> {
        self.about(subject)
            .find(|st| st.predicate == predicate)
            .map(|st| &st.object)
    }

    /// The first literal object of `(subject, predicate, ?)`.
    #[must_use]
    pub fn literal(&self, subject: &RdfNode, predicate: &str) -> Option<&str> {
        self.about(subject)
            .filter(|st| st.predicate == predicate)
            .find_map(|st| st.object.as_literal())
    }

    /// Returns true if the subject has any statement with this predicate.
    #[must_use]
    pub fn has(&self, subject: &RdfNode, predicate: &str) -> bool {
        self.object(subject, predicate).is_some()
    }

    /// Returns true if `(subject, rdf:type, type_iri)` is asserted.
    #[must_use]
    pub fn has_type(&self, subject: &RdfNode, type_iri: &str) -> bool {
        self.objects(subject, crate::model::iris::RDF_TYPE)
            .any(|o| o.as_iri() == Some(type_iri))
    }
}

fn collect_triple<T: Triple>(out: &mut Vec<Statement>, t: &T) -> Result<(), Infallible> {
    let (Some(subject), Some(RdfNode::Iri(predicate)), Some(object)) =
        (node(t.s()), node(t.p()), object(t.o()))
    else {
        return Ok(());
    };
    out.push(Statement {
        subject,
        predicate,
        object,
    });
    Ok(())
}

fn node<T: Term>(term: T) -> Option<RdfNode> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| RdfNode::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| RdfNode::Blank(id.as_str().to_string())),
        _ => None,
    }
}

fn object<T: Term>(term: T) -> Option<RdfObject> {
    match term.kind() {
        TermKind::Literal => term
            .lexical_form()
            .map(|lex| RdfObject::Literal(lex.to_string())),
        _ => node(term).map(RdfObject::Node),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
@prefix ex:   <http://example.org/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

ex:A rdfs:comment "first" ;
     rdfs:subClassOf [ rdfs:label "anon" ] .
"#;

    #[test]
    fn turtle_statements_keep_document_order() {
        let graph = RdfGraph::parse(SMALL.as_bytes(), RdfFormat::Turtle).unwrap();
        let a = RdfNode::Iri("http://example.org/A".into());
        assert_eq!(
            graph.literal(&a, crate::model::iris::RDFS_COMMENT),
            Some("first")
        );
        let sup = graph
            .object(&a, crate::model::iris::RDFS_SUBCLASS_OF)
            .and_then(RdfObject::as_node)
            .unwrap();
        assert!(matches!(sup, RdfNode::Blank(_)));
        assert_eq!(
            graph.literal(sup, crate::model::iris::RDFS_LABEL),
            Some("anon")
        );
    }

    #[test]
    fn lookups_outlive_a_temporary_predicate() {
        let graph = RdfGraph::parse(SMALL.as_bytes(), RdfFormat::Turtle).unwrap();
        let a = RdfNode::Iri("http://example.org/A".into());
        let comment = {
            let predicate = format!("{}comment", "http://www.w3.org/2000/01/rdf-schema#");
            graph.literal(&a, &predicate)
        };
        let sup = {
            let predicate = crate::model::iris::RDFS_SUBCLASS_OF.to_string();
            graph.object(&a, &predicate)
        };
        assert_eq!(comment, Some("first"));
        assert!(sup.and_then(RdfObject::as_node).is_some());
        let predicate = crate::model::iris::RDFS_COMMENT.to_string();
        assert_eq!(graph.objects(&a, &predicate).count(), 1);
    }

    #[test]
    fn ntriples_parse() {
        let nt = "<http://example.org/A> <http://www.w3.org/2000/01/rdf-schema#label> \"A\" .\n";
        let graph = RdfGraph::parse(nt.as_bytes(), RdfFormat::NTriples).unwrap();
        assert_eq!(graph.statements().len(), 1);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            RdfFormat::from_path(Path::new("spdx.owl")).unwrap(),
            RdfFormat::RdfXml
        );
        assert_eq!(
            RdfFormat::from_path(Path::new("model.TTL")).unwrap(),
            RdfFormat::Turtle
        );
        assert!(matches!(
            RdfFormat::from_path(Path::new("model.json")),
            Err(OntologyError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = RdfGraph::parse("ex:A ex:b".as_bytes(), RdfFormat::Turtle).unwrap_err();
        assert!(matches!(err, OntologyError::Parse { format: "Turtle", .. }));
    }
}
