//! Ontology → schema mapping tables.
//!
//! Deterministic mappings from OWL datatypes and names to JSON Schema and XML
//! Schema primitives and wire names.

use owlschema_ontology::model::iris::*;

use crate::resolve::Primitive;

pub use owlschema_ontology::local_name;

/// Maps an XSD (or RDFS literal) IRI to its primitive category.
///
/// Unrecognised XSD datatypes (dates, URIs, binary encodings) are carried as
/// strings. Returns `None` for IRIs outside the XSD/RDFS literal space.
pub fn xsd_to_primitive(iri: &str) -> Option<Primitive> {
    match iri {
        XSD_BOOLEAN => Some(Primitive::Boolean),
        XSD_INTEGER | XSD_INT | XSD_LONG | XSD_POSITIVE_INTEGER | XSD_NON_NEGATIVE_INTEGER => {
            Some(Primitive::Integer)
        }
        XSD_DECIMAL | XSD_DOUBLE | XSD_FLOAT => Some(Primitive::Number),
        XSD_STRING | RDFS_LITERAL => Some(Primitive::String),
        _ if iri.starts_with(XSD) => Some(Primitive::String),
        _ => None,
    }
}

/// JSON Schema `type` keyword for a primitive.
pub fn json_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Boolean => "boolean",
        Primitive::Integer => "integer",
        Primitive::Number => "number",
        Primitive::String => "string",
    }
}

/// XML Schema built-in type for a primitive.
pub fn xsd_builtin(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Boolean => "xs:boolean",
        Primitive::Integer => "xs:integer",
        Primitive::Number => "xs:decimal",
        Primitive::String => "xs:string",
    }
}

/// Collection name for a list-valued property.
///
/// Names already ending in `s` are left alone (`licenseInfoFromFiles`), a
/// consonant-`y` ending becomes `ies`, sibilant endings take `es`, anything
/// else takes `s`.
pub fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        return name.to_string();
    }
    if let Some(stem) = name.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiou".contains(c.to_ascii_lowercase())) {
            return format!("{stem}ies");
        }
    }
    if name.ends_with('x') || name.ends_with("ch") || name.ends_with("sh") {
        return format!("{name}es");
    }
    format!("{name}s")
}

/// Converts a camelCase or PascalCase name into SCREAMING_SNAKE_CASE.
pub fn to_screaming_snake(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();
    for (i, &ch) in chars.iter().enumerate() {
        if ch == '-' || ch == ' ' || ch == '.' {
            result.push('_');
            continue;
        }
        if ch.is_uppercase() && i > 0 {
            // Don't split runs of capitals (e.g., "SHA256" or "URLs")
            let prev = chars[i - 1];
            if prev.is_lowercase() || prev.is_ascii_digit() {
                result.push('_');
            }
        }
        result.extend(ch.to_uppercase());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_collection_names() {
        assert_eq!(pluralize("checksum"), "checksums");
        assert_eq!(pluralize("hasFile"), "hasFiles");
        assert_eq!(pluralize("licenseInfoFromFiles"), "licenseInfoFromFiles");
        assert_eq!(pluralize("colors"), "colors");
        assert_eq!(pluralize("externalDocumentRef"), "externalDocumentRefs");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("relay"), "relays");
        assert_eq!(pluralize("patch"), "patches");
        assert_eq!(pluralize("box"), "boxes");
    }

    #[test]
    fn screaming_snake_conversion() {
        assert_eq!(to_screaming_snake("describes"), "DESCRIBES");
        assert_eq!(to_screaming_snake("operatingSystem"), "OPERATING_SYSTEM");
        assert_eq!(to_screaming_snake("sha256"), "SHA256");
        assert_eq!(to_screaming_snake("SHA3_256"), "SHA3_256");
        assert_eq!(to_screaming_snake("package-manager"), "PACKAGE_MANAGER");
    }

    #[test]
    fn xsd_primitive_mapping() {
        assert_eq!(xsd_to_primitive(XSD_BOOLEAN), Some(Primitive::Boolean));
        assert_eq!(
            xsd_to_primitive(XSD_NON_NEGATIVE_INTEGER),
            Some(Primitive::Integer)
        );
        assert_eq!(
            xsd_to_primitive("http://www.w3.org/2001/XMLSchema#anyURI"),
            Some(Primitive::String)
        );
        assert_eq!(xsd_to_primitive("http://example.org/Widget"), None);
    }

    #[test]
    fn local_name_extraction() {
        assert_eq!(local_name("http://spdx.org/rdf/terms#Package"), "Package");
        assert_eq!(
            local_name("http://www.w3.org/2001/XMLSchema#string"),
            "string"
        );
    }
}
