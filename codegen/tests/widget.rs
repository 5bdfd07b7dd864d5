//! End-to-end generation for a two-class widget ontology.

#![allow(clippy::unwrap_used)]

use owlschema_codegen::xsd::{to_xsd, write_xsd, ElementType, Occurs};
use owlschema_codegen::{
    assemble, generate_json_schema, generate_xsd, GenerationError, GeneratorConfig,
    SchemaDocument, SymbolRegistry,
};
use owlschema_ontology::Ontology;
use serde_json::json;

const WIDGET: &str = r#"
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix ex:   <http://example.org/widget#> .

<http://example.org/widget> a owl:Ontology .

ex:Widget a owl:Class ;
    rdfs:comment "An assembled widget." ;
    rdfs:subClassOf
        [ a owl:Restriction ;
          owl:onProperty ex:name ;
          owl:onDataRange xsd:string ;
          owl:qualifiedCardinality "1"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ;
          owl:onProperty ex:colors ;
          owl:onClass ex:Color ;
          owl:minQualifiedCardinality "0"^^xsd:nonNegativeInteger ] ,
        [ a owl:Restriction ;
          owl:onProperty ex:part ;
          owl:onClass ex:Part ;
          owl:qualifiedCardinality "1"^^xsd:nonNegativeInteger ] .

ex:Part a owl:Class ;
    rdfs:comment "A replaceable component." ;
    rdfs:subClassOf
        [ a owl:Restriction ;
          owl:onProperty ex:serial ;
          owl:onDataRange xsd:string ;
          owl:qualifiedCardinality "1"^^xsd:nonNegativeInteger ] .

ex:Color a owl:Class .
ex:red   a owl:NamedIndividual , ex:Color .
ex:green a owl:NamedIndividual , ex:Color .
ex:blue  a owl:NamedIndividual , ex:Color .

ex:name a owl:DatatypeProperty .
ex:colors a owl:ObjectProperty .
ex:part a owl:ObjectProperty .
ex:serial a owl:DatatypeProperty .
"#;

const PROFILE: &str = r#"
namespace = "http://example.org/widget#"
root_class = "Widget"
schema_id = "http://example.org/widget/schema"
title = "Widget"
mandatory_properties = ["name"]
synthetic = []
collections = {}
"#;

fn symbols() -> SymbolRegistry {
    SymbolRegistry::new()
        .with("http://example.org/widget#red", "RED")
        .with("http://example.org/widget#green", "GREEN")
        .with("http://example.org/widget#blue", "BLUE")
}

fn document() -> SchemaDocument {
    let ontology = Ontology::from_turtle(WIDGET).unwrap();
    let config = GeneratorConfig::from_toml_str(PROFILE).unwrap();
    assemble(&ontology, &config, symbols()).unwrap()
}

#[test]
fn json_schema_for_widget() {
    let schema = owlschema_codegen::json::to_json_schema(&document());
    assert_eq!(schema["required"], json!(["name", "part"]));
    assert_eq!(
        schema["properties"]["colors"],
        json!({
            "type": "array",
            "items": { "type": "string", "enum": ["RED", "GREEN", "BLUE"] }
        })
    );
    assert_eq!(schema["properties"]["name"], json!({ "type": "string" }));
    let part = &schema["properties"]["part"];
    assert_eq!(part["type"], "object");
    assert_eq!(part["description"], "A replaceable component.");
    assert_eq!(part["required"], json!(["serial"]));
}

#[test]
fn xsd_for_widget() {
    let schema = to_xsd(&document()).unwrap();
    let widget = schema.complex_type("Widget").unwrap();
    let occurs: Vec<u32> = widget.particles.iter().map(|p| p.min_occurs).collect();
    assert_eq!(occurs, vec![1, 0, 1]);
    assert_eq!(widget.particles[1].max_occurs, Occurs::Unbounded);
    assert_eq!(
        widget.particles[1].element_type,
        ElementType::Named("Color".into())
    );
    assert_eq!(
        widget.particles[2].element_type,
        ElementType::Named("Part".into())
    );
    assert_eq!(schema.simple_types.len(), 1);
    assert_eq!(schema.simple_types[0].values, vec!["RED", "GREEN", "BLUE"]);

    let xml = write_xsd(&schema).unwrap();
    assert!(xml.contains(
        "<xs:element name=\"colors\" type=\"Color\" minOccurs=\"0\" maxOccurs=\"unbounded\"/>"
    ));
    assert!(xml.contains("<xs:documentation>An assembled widget.</xs:documentation>"));
}

#[test]
fn files_are_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let ontology = Ontology::from_turtle(WIDGET).unwrap();
    let config = GeneratorConfig::from_toml_str(PROFILE).unwrap();

    let json_path = dir.path().join("widget.schema.json");
    let report = generate_json_schema(&ontology, &config, symbols(), &json_path).unwrap();
    assert_eq!(report.class_count, 2);
    assert_eq!(report.enum_count, 1);
    assert_eq!(report.property_count, 4);
    assert_eq!(report.dropped_count, 0);
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(written["title"], "Widget");

    let xsd_path = dir.path().join("widget.xsd");
    generate_xsd(&ontology, &config, symbols(), &xsd_path).unwrap();
    assert!(std::fs::read_to_string(&xsd_path)
        .unwrap()
        .contains("<xs:complexType name=\"Widget\">"));

    let again = generate_xsd(&ontology, &config, symbols(), &xsd_path).unwrap_err();
    assert!(matches!(again, GenerationError::OutputExists(_)));
}

#[test]
fn unregistered_color_is_dropped_with_one_diagnostic() {
    let ontology = Ontology::from_turtle(WIDGET).unwrap();
    let config = GeneratorConfig::from_toml_str(PROFILE).unwrap();
    let partial = SymbolRegistry::new()
        .with("http://example.org/widget#red", "RED")
        .with("http://example.org/widget#blue", "BLUE");
    let doc = assemble(&ontology, &config, partial).unwrap();
    assert_eq!(doc.diagnostics.dropped.len(), 1);
    assert_eq!(
        doc.diagnostics.dropped[0].individual,
        "http://example.org/widget#green"
    );
    let schema = owlschema_codegen::json::to_json_schema(&doc);
    assert_eq!(
        schema["properties"]["colors"]["items"]["enum"],
        json!(["RED", "BLUE"])
    );
}
