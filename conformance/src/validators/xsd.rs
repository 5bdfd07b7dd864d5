//! XML Schema artifact validator.
//!
//! Reads a generated schema back with quick-xml into a light model and checks:
//! - exactly one top-level element, whose type is declared
//! - every referenced type and extension base is declared or built in
//! - `minOccurs <= maxOccurs` on every particle
//! - enumerations are non-empty; abstract types carry no particles

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::report::{ConformanceReport, TestResult};

/// One `xs:element` particle read back from a complex type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Particle {
    /// Element name.
    pub name: String,
    /// `type` attribute; `None` for inline simple types.
    pub type_name: Option<String>,
    /// `minOccurs` (default 1).
    pub min_occurs: u64,
    /// `maxOccurs`; `None` is `unbounded`.
    pub max_occurs: Option<u64>,
    /// Inline enumeration values.
    pub inline_values: Vec<String>,
}

/// One named `xs:complexType`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexTypeDecl {
    /// Type name.
    pub name: String,
    /// `abstract="true"`.
    pub is_abstract: bool,
    /// `xs:extension` base.
    pub base: Option<String>,
    /// Local particles.
    pub particles: Vec<Particle>,
}

/// A schema read back from text.
#[derive(Debug, Clone, Default)]
pub struct ParsedXsd {
    /// Top-level `(name, type)` element declarations.
    pub elements: Vec<(String, Option<String>)>,
    /// Complex types in document order.
    pub complex_types: Vec<ComplexTypeDecl>,
    /// Named simple types and their enumeration values.
    pub simple_types: Vec<(String, Vec<String>)>,
}

impl ParsedXsd {
    /// Looks up a complex type by name.
    pub fn complex_type(&self, name: &str) -> Option<&ComplexTypeDecl> {
        self.complex_types.iter().find(|t| t.name == name)
    }

    /// Particles of `name` including those inherited through `xs:extension`.
    pub fn flattened(&self, name: &str) -> Vec<&Particle> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut next = self.complex_type(name);
        while let Some(ty) = next {
            if !seen.insert(ty.name.as_str()) {
                break;
            }
            out.extend(ty.particles.iter());
            next = ty.base.as_deref().and_then(|b| self.complex_type(b));
        }
        out
    }

    fn declares(&self, type_name: &str) -> bool {
        type_name.starts_with("xs:")
            || self.complex_type(type_name).is_some()
            || self.simple_types.iter().any(|(n, _)| n == type_name)
    }
}

fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a?;
        if a.key.as_ref() == key {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn occurs(value: Option<String>, what: &str) -> Result<Option<u64>> {
    match value.as_deref() {
        None => Ok(Some(1)),
        Some("unbounded") => Ok(None),
        Some(n) => n
            .parse()
            .map(Some)
            .with_context(|| format!("invalid {what} {n:?}")),
    }
}

#[derive(Default)]
struct Parser {
    out: ParsedXsd,
    stack: Vec<String>,
    complex: Option<ComplexTypeDecl>,
    simple: Option<(String, Vec<String>)>,
    in_particle: bool,
}

impl Parser {
    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let parent = self.stack.last().map(String::as_str);
        match name.as_str() {
            "xs:element" if parent == Some("xs:schema") => {
                let Some(element) = attr(e, b"name")? else {
                    bail!("top-level xs:element without a name");
                };
                self.out.elements.push((element, attr(e, b"type")?));
            }
            "xs:element" => {
                let Some(ty) = self.complex.as_mut() else {
                    return Ok(());
                };
                ty.particles.push(Particle {
                    name: attr(e, b"name")?.unwrap_or_default(),
                    type_name: attr(e, b"type")?,
                    min_occurs: occurs(attr(e, b"minOccurs")?, "minOccurs")?.unwrap_or(0),
                    max_occurs: occurs(attr(e, b"maxOccurs")?, "maxOccurs")?,
                    inline_values: Vec::new(),
                });
                self.in_particle = true;
            }
            "xs:complexType" => {
                self.complex = Some(ComplexTypeDecl {
                    name: attr(e, b"name")?.unwrap_or_default(),
                    is_abstract: attr(e, b"abstract")?.as_deref() == Some("true"),
                    ..ComplexTypeDecl::default()
                });
            }
            "xs:extension" => {
                if let Some(ty) = self.complex.as_mut() {
                    ty.base = attr(e, b"base")?;
                }
            }
            "xs:simpleType" if !self.in_particle => {
                self.simple = Some((attr(e, b"name")?.unwrap_or_default(), Vec::new()));
            }
            "xs:enumeration" => {
                let value = attr(e, b"value")?.unwrap_or_default();
                if self.in_particle {
                    if let Some(p) = self.complex.as_mut().and_then(|t| t.particles.last_mut()) {
                        p.inline_values.push(value);
                    }
                } else if let Some((_, values)) = self.simple.as_mut() {
                    values.push(value);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &str) {
        match name {
            "xs:element" => self.in_particle = false,
            "xs:complexType" => {
                if let Some(ty) = self.complex.take() {
                    self.out.complex_types.push(ty);
                }
            }
            "xs:simpleType" if !self.in_particle => {
                if let Some(simple) = self.simple.take() {
                    self.out.simple_types.push(simple);
                }
            }
            _ => {}
        }
    }
}

/// Reads schema text into a [`ParsedXsd`].
///
/// # Errors
///
/// Returns an error if the text is not well-formed XML or an occurrence bound
/// is not a number.
pub fn parse(text: &str) -> Result<ParsedXsd> {
    let mut reader = Reader::from_reader(text.as_bytes());
    reader.trim_text(true);
    let mut parser = Parser::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                parser.open(&e)?;
                parser
                    .stack
                    .push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Empty(e) => {
                parser.open(&e)?;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                parser.close(&name);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                parser.stack.pop();
                parser.close(&name);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    tracing::debug!(
        complex_types = parser.out.complex_types.len(),
        simple_types = parser.out.simple_types.len(),
        "parsed XML Schema"
    );
    Ok(parser.out)
}

/// Validates the XML Schema file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not well-formed.
pub fn validate(path: &Path) -> Result<ConformanceReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let schema =
        parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(validate_parsed(&schema))
}

/// Validates an already-parsed schema.
pub fn validate_parsed(schema: &ParsedXsd) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    match schema.elements.as_slice() {
        [(name, Some(ty))] if schema.complex_type(ty).is_some() => report.push(TestResult::pass(
            "xsd/root",
            format!("Single root element {name} of a declared type"),
        )),
        [(name, _)] => report.push(TestResult::fail(
            "xsd/root",
            format!("Root element {name} has no declared complex type"),
        )),
        elements => report.push(TestResult::fail(
            "xsd/root",
            format!("Expected one top-level element, found {}", elements.len()),
        )),
    }

    let mut unresolved = Vec::new();
    let mut bounds = Vec::new();
    let mut abstract_content = Vec::new();
    for ty in &schema.complex_types {
        if let Some(base) = &ty.base {
            if schema.complex_type(base).is_none() {
                unresolved.push(format!("{}: extension base {base}", ty.name));
            }
        }
        if ty.is_abstract && !ty.particles.is_empty() {
            abstract_content.push(ty.name.clone());
        }
        for p in &ty.particles {
            match &p.type_name {
                Some(t) if !schema.declares(t) => {
                    unresolved.push(format!("{}/{}: type {t}", ty.name, p.name));
                }
                None if p.inline_values.is_empty() => {
                    unresolved.push(format!("{}/{}: no type", ty.name, p.name));
                }
                _ => {}
            }
            if p.max_occurs.is_some_and(|max| p.min_occurs > max) {
                bounds.push(format!("{}/{}", ty.name, p.name));
            }
        }
    }
    let empty_enums: Vec<String> = schema
        .simple_types
        .iter()
        .filter(|(_, values)| values.is_empty())
        .map(|(name, _)| name.clone())
        .collect();

    report.push(TestResult::check(
        "xsd/types",
        "Every referenced type is declared",
        "Unresolved type references",
        unresolved,
    ));
    report.push(TestResult::check(
        "xsd/occurs",
        "minOccurs <= maxOccurs on every particle",
        "Particles with inverted bounds",
        bounds,
    ));
    report.push(TestResult::check(
        "xsd/abstract",
        "Abstract types carry no particles",
        "Abstract types with content",
        abstract_content,
    ));
    report.push(TestResult::check(
        "xsd/enumerations",
        "Every simple type enumerates at least one value",
        "Empty enumerations",
        empty_enums,
    ));
    report
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Port" type="Port"/>
  <xs:simpleType name="Flag">
    <xs:restriction base="xs:string">
      <xs:enumeration value="RED"/>
      <xs:enumeration value="BLUE"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:complexType name="Vessel" abstract="true">
  </xs:complexType>
  <xs:complexType name="Ship">
    <xs:complexContent>
      <xs:extension base="Vessel">
        <xs:all>
          <xs:element name="flag" type="Flag" minOccurs="1" maxOccurs="1"/>
          <xs:element name="crew" type="xs:integer" minOccurs="0" maxOccurs="unbounded"/>
        </xs:all>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
  <xs:complexType name="Port">
    <xs:annotation><xs:documentation>A harbour.</xs:documentation></xs:annotation>
    <xs:all>
      <xs:element name="status" minOccurs="0" maxOccurs="1">
        <xs:simpleType>
          <xs:restriction base="xs:string">
            <xs:enumeration value="OPEN"/>
          </xs:restriction>
        </xs:simpleType>
      </xs:element>
      <xs:element name="ships" type="Ship" minOccurs="0" maxOccurs="unbounded"/>
    </xs:all>
  </xs:complexType>
</xs:schema>
"#;

    #[test]
    fn parses_types_and_particles() {
        let schema = parse(SHIPS).unwrap();
        assert_eq!(
            schema.elements,
            vec![("Port".to_string(), Some("Port".to_string()))]
        );
        assert_eq!(
            schema.simple_types,
            vec![(
                "Flag".to_string(),
                vec!["RED".to_string(), "BLUE".to_string()]
            )]
        );
        let ship = schema.complex_type("Ship").unwrap();
        assert_eq!(ship.base.as_deref(), Some("Vessel"));
        assert_eq!(ship.particles[1].max_occurs, None);
        let port = schema.complex_type("Port").unwrap();
        assert_eq!(port.particles[0].inline_values, vec!["OPEN"]);
        assert!(schema.complex_type("Vessel").unwrap().is_abstract);
        assert_eq!(schema.flattened("Ship").len(), 2);
    }

    #[test]
    fn well_formed_schema_passes() {
        let report = validate_parsed(&parse(SHIPS).unwrap());
        assert!(report.all_passed(), "{:#?}", report.results);
    }

    #[test]
    fn dangling_references_fail() {
        let broken = SHIPS
            .replace("type=\"Flag\"", "type=\"Ensign\"")
            .replace("base=\"Vessel\"", "base=\"Hull\"");
        let report = validate_parsed(&parse(&broken).unwrap());
        let types = report
            .failures()
            .find(|r| r.validator == "xsd/types")
            .unwrap();
        assert_eq!(types.details.len(), 2);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(parse("<xs:schema><xs:element></xs:schema>").is_err());
        assert!(parse(&SHIPS.replace("maxOccurs=\"1\"", "maxOccurs=\"one\"")).is_err());
    }
}
