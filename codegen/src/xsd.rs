//! XML Schema rendering.
//!
//! [`to_xsd`] lowers a [`SchemaDocument`] to an [`XsdSchema`] model;
//! [`write_xsd`] serializes the model with quick-xml. Classes become complex
//! types over one `xs:all` group, enumeration classes become simple types, and
//! single inheritance becomes `xs:extension`.
//!
//! List particles inside `xs:all` and `xs:all` inside `xs:extension` need XML
//! Schema 1.1; the schema element declares `vc:minVersion="1.1"`.
//!
//! A subclass only extends its base when every inherited property resolves to
//! the same particle in both classes. A subclass that tightens an inherited
//! property (say, makes it required) is emitted flat, without a base.

use std::collections::HashSet;
use std::fmt;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::assemble::{ClassProfile, SchemaDocument};
use crate::error::GenerationError;
use crate::mapping::xsd_builtin;
use crate::resolve::{Multiplicity, PropertyProfile, ResolvedType};

/// The XML Schema namespace.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// The XML Schema versioning namespace.
pub const VC_NAMESPACE: &str = "http://www.w3.org/2007/XMLSchema-versioning";

/// `maxOccurs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurs {
    /// A finite bound.
    Bounded(u32),
    /// `unbounded`.
    Unbounded,
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurs::Bounded(n) => write!(f, "{n}"),
            Occurs::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// The type of an element particle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// A named built-in, simple, or complex type.
    Named(String),
    /// An anonymous string restriction with the listed facets.
    InlineEnum(Vec<String>),
}

/// One `xs:element` inside an `xs:all` group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementParticle {
    /// Element name.
    pub name: String,
    /// Element type.
    pub element_type: ElementType,
    /// `minOccurs`.
    pub min_occurs: u32,
    /// `maxOccurs`.
    pub max_occurs: Occurs,
    /// `xs:documentation`; empty for none.
    pub documentation: String,
}

/// One `xs:complexType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    /// Type name.
    pub name: String,
    /// `xs:documentation`; empty for none.
    pub documentation: String,
    /// `abstract="true"`; set for classes without any property.
    pub is_abstract: bool,
    /// `xs:extension` base type.
    pub base: Option<String>,
    /// Particles of the `xs:all` group.
    pub particles: Vec<ElementParticle>,
}

/// One named `xs:simpleType` enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    /// Type name.
    pub name: String,
    /// `xs:documentation`; empty for none.
    pub documentation: String,
    /// `xs:enumeration` values in order.
    pub values: Vec<String>,
}

/// A whole schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XsdSchema {
    /// Name of the single top-level element.
    pub root_element: String,
    /// Type of the top-level element.
    pub root_type: String,
    /// Simple types in ontology order.
    pub simple_types: Vec<SimpleType>,
    /// Complex types in ontology order.
    pub complex_types: Vec<ComplexType>,
}

impl XsdSchema {
    /// Looks up a complex type by name.
    #[must_use]
    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types.iter().find(|t| t.name == name)
    }
}

/// Lowers the document to the XML Schema model.
///
/// # Errors
///
/// Returns [`GenerationError::AmbiguousBase`] if a class has more than one
/// structural superclass.
pub fn to_xsd(doc: &SchemaDocument) -> Result<XsdSchema, GenerationError> {
    let simple_types = doc
        .enums
        .iter()
        .map(|e| SimpleType {
            name: e.name.clone(),
            documentation: e.comment.clone(),
            values: e.symbols.clone(),
        })
        .collect();

    let mut complex_types = Vec::with_capacity(doc.classes.len());
    for class in &doc.classes {
        complex_types.push(complex_type(doc, class)?);
    }

    let root_type = doc.root_class().map_or_else(
        || owlschema_ontology::local_name(&doc.root).to_string(),
        |c| c.name.clone(),
    );
    Ok(XsdSchema {
        root_element: root_type.clone(),
        root_type,
        simple_types,
        complex_types,
    })
}

fn complex_type(
    doc: &SchemaDocument,
    class: &ClassProfile,
) -> Result<ComplexType, GenerationError> {
    let base = match class.structural_bases.as_slice() {
        [] => None,
        [base] => doc.class(base),
        bases => {
            return Err(GenerationError::AmbiguousBase {
                class: class.iri.clone(),
                bases: bases.to_vec(),
            })
        }
    };

    let base = base.filter(|b| extends_unchanged(doc, class, b));
    let inherited: HashSet<&str> = base
        .map(|b| b.properties.iter().map(|p| p.property.as_str()).collect())
        .unwrap_or_default();
    let mut particles: Vec<ElementParticle> = class
        .properties
        .iter()
        .filter(|p| !inherited.contains(p.property.as_str()))
        .map(|p| particle(doc, p))
        .collect();

    let is_root = class.iri == doc.root;
    if is_root {
        particles.extend(doc.synthetic.iter().filter(|s| s.xsd).map(|s| ElementParticle {
            name: s.name.clone(),
            element_type: ElementType::Named("xs:string".to_string()),
            min_occurs: u32::from(s.required),
            max_occurs: Occurs::Bounded(1),
            documentation: s.description.clone(),
        }));
        for collection in &doc.collections {
            let target = doc.class(&collection.class);
            particles.push(ElementParticle {
                name: collection.name.clone(),
                element_type: ElementType::Named(target.map_or_else(
                    || owlschema_ontology::local_name(&collection.class).to_string(),
                    |c| c.name.clone(),
                )),
                min_occurs: 0,
                max_occurs: Occurs::Unbounded,
                documentation: target.map(|c| c.comment.clone()).unwrap_or_default(),
            });
        }
    }

    Ok(ComplexType {
        name: class.name.clone(),
        documentation: class.comment.clone(),
        is_abstract: class.properties.is_empty() && !is_root,
        base: base.map(|b| b.name.clone()),
        particles,
    })
}

/// True when `class` carries every property of `base` with the same particle.
fn extends_unchanged(doc: &SchemaDocument, class: &ClassProfile, base: &ClassProfile) -> bool {
    let unchanged = base.properties.iter().all(|inherited| {
        class
            .property(&inherited.property)
            .is_some_and(|own| particle(doc, own) == particle(doc, inherited))
    });
    if !unchanged {
        tracing::debug!(
            class = %class.name,
            base = %base.name,
            "inherited property tightened, emitting without a base"
        );
    }
    unchanged
}

fn particle(doc: &SchemaDocument, profile: &PropertyProfile) -> ElementParticle {
    let element_type = match &profile.resolved_type {
        ResolvedType::Primitive(p) => ElementType::Named(xsd_builtin(*p).to_string()),
        ResolvedType::Enum(info) => match &info.class {
            Some(class) => ElementType::Named(owlschema_ontology::local_name(class).to_string()),
            None => ElementType::InlineEnum(info.symbols.clone()),
        },
        ResolvedType::Reference { .. } => ElementType::Named("xs:string".to_string()),
        ResolvedType::Object(class) => ElementType::Named(
            doc.class(class)
                .map_or_else(|| "xs:anyType".to_string(), |c| c.name.clone()),
        ),
    };
    let (min_occurs, max_occurs) = match profile.multiplicity {
        Multiplicity::Scalar => (u32::from(profile.required), Occurs::Bounded(1)),
        Multiplicity::List { min, max } => (min, max.map_or(Occurs::Unbounded, Occurs::Bounded)),
    };
    ElementParticle {
        name: doc.wire_name(profile, false),
        element_type,
        min_occurs: if profile.deprecated { 0 } else { min_occurs },
        max_occurs,
        documentation: profile.comment.clone(),
    }
}

/// Serializes the model as an indented XML document.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn write_xsd(schema: &XsdSchema) -> Result<String, GenerationError> {
    let mut w = Writer::new_with_indent(Vec::new(), b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.write_event(Event::Start(
        BytesStart::new("xs:schema").with_attributes([
            ("xmlns:xs", XS_NAMESPACE),
            ("xmlns:vc", VC_NAMESPACE),
            ("vc:minVersion", "1.1"),
        ]),
    ))?;

    w.write_event(Event::Empty(BytesStart::new("xs:element").with_attributes([
        ("name", schema.root_element.as_str()),
        ("type", schema.root_type.as_str()),
    ])))?;

    for simple in &schema.simple_types {
        w.write_event(Event::Start(
            BytesStart::new("xs:simpleType").with_attributes([("name", simple.name.as_str())]),
        ))?;
        write_documentation(&mut w, &simple.documentation)?;
        write_enumeration(&mut w, &simple.values)?;
        w.write_event(Event::End(BytesEnd::new("xs:simpleType")))?;
    }

    for complex in &schema.complex_types {
        let mut start = BytesStart::new("xs:complexType");
        start.push_attribute(("name", complex.name.as_str()));
        if complex.is_abstract {
            start.push_attribute(("abstract", "true"));
        }
        w.write_event(Event::Start(start))?;
        write_documentation(&mut w, &complex.documentation)?;
        match &complex.base {
            Some(base) => {
                w.write_event(Event::Start(BytesStart::new("xs:complexContent")))?;
                w.write_event(Event::Start(
                    BytesStart::new("xs:extension").with_attributes([("base", base.as_str())]),
                ))?;
                write_all(&mut w, &complex.particles)?;
                w.write_event(Event::End(BytesEnd::new("xs:extension")))?;
                w.write_event(Event::End(BytesEnd::new("xs:complexContent")))?;
            }
            None => write_all(&mut w, &complex.particles)?,
        }
        w.write_event(Event::End(BytesEnd::new("xs:complexType")))?;
    }

    w.write_event(Event::End(BytesEnd::new("xs:schema")))?;
    let xml = String::from_utf8(w.into_inner())?;
    tracing::debug!(
        simple_types = schema.simple_types.len(),
        complex_types = schema.complex_types.len(),
        bytes = xml.len(),
        "rendered XML Schema"
    );
    Ok(xml)
}

fn write_all(w: &mut Writer<Vec<u8>>, particles: &[ElementParticle]) -> Result<(), GenerationError> {
    if particles.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("xs:all")))?;
    for p in particles {
        let min = p.min_occurs.to_string();
        let max = p.max_occurs.to_string();
        let mut start = BytesStart::new("xs:element");
        start.push_attribute(("name", p.name.as_str()));
        if let ElementType::Named(type_name) = &p.element_type {
            start.push_attribute(("type", type_name.as_str()));
        }
        start.push_attribute(("minOccurs", min.as_str()));
        start.push_attribute(("maxOccurs", max.as_str()));

        let inline = match &p.element_type {
            ElementType::InlineEnum(values) => Some(values),
            ElementType::Named(_) => None,
        };
        if p.documentation.is_empty() && inline.is_none() {
            w.write_event(Event::Empty(start))?;
            continue;
        }
        w.write_event(Event::Start(start))?;
        write_documentation(w, &p.documentation)?;
        if let Some(values) = inline {
            w.write_event(Event::Start(BytesStart::new("xs:simpleType")))?;
            write_enumeration(w, values)?;
            w.write_event(Event::End(BytesEnd::new("xs:simpleType")))?;
        }
        w.write_event(Event::End(BytesEnd::new("xs:element")))?;
    }
    w.write_event(Event::End(BytesEnd::new("xs:all")))?;
    Ok(())
}

fn write_enumeration(w: &mut Writer<Vec<u8>>, values: &[String]) -> Result<(), GenerationError> {
    w.write_event(Event::Start(
        BytesStart::new("xs:restriction").with_attributes([("base", "xs:string")]),
    ))?;
    for value in values {
        w.write_event(Event::Empty(
            BytesStart::new("xs:enumeration").with_attributes([("value", value.as_str())]),
        ))?;
    }
    w.write_event(Event::End(BytesEnd::new("xs:restriction")))?;
    Ok(())
}

fn write_documentation(w: &mut Writer<Vec<u8>>, text: &str) -> Result<(), GenerationError> {
    if text.is_empty() {
        return Ok(());
    }
    w.write_event(Event::Start(BytesStart::new("xs:annotation")))?;
    w.write_event(Event::Start(BytesStart::new("xs:documentation")))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new("xs:documentation")))?;
    w.write_event(Event::End(BytesEnd::new("xs:annotation")))?;
    Ok(())
}
