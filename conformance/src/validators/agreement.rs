//! Cross-format agreement.
//!
//! The JSON Schema and the XML Schema generated from one ontology must agree
//! on the number of required and list-valued properties of the root and of
//! every top-level collection member, even though property names differ
//! (JSON pluralizes list names) and XSD splits classes along `xs:extension`.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use super::xsd::{self, ParsedXsd, Particle};
use crate::report::{ConformanceReport, TestResult};

/// Required and list-valued property counts for one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    /// Properties instances must carry.
    pub required: usize,
    /// Collection-valued properties.
    pub lists: usize,
}

/// Counts over a JSON object schema.
pub fn json_counts(object: &Value) -> Counts {
    let required = object
        .get("required")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let lists = object
        .get("properties")
        .and_then(Value::as_object)
        .map_or(0, |props| {
            props
                .values()
                .filter(|p| p.get("type").and_then(Value::as_str) == Some("array"))
                .count()
        });
    Counts { required, lists }
}

/// Counts over flattened XSD particles.
pub fn xsd_counts(particles: &[&Particle]) -> Counts {
    Counts {
        required: particles.iter().filter(|p| p.min_occurs > 0).count(),
        lists: particles
            .iter()
            .filter(|p| p.max_occurs != Some(1))
            .count(),
    }
}

/// Compares the root and each collection member across both artifacts.
///
/// JSON-only document properties (such as `$schema`) are neither required nor
/// lists, so they do not disturb the counts.
pub fn validate(json: &Value, xsd: &ParsedXsd) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let Some((_, Some(root_type))) = xsd.elements.first() else {
        report.push(TestResult::fail(
            "agreement/root",
            "XML Schema has no typed root element",
        ));
        return report;
    };

    let mut mismatches = Vec::new();
    compare(
        "root",
        json_counts(json),
        xsd_counts(&xsd.flattened(root_type)),
        &mut mismatches,
    );

    // Collections are the only root particles whose name is the same in both
    // artifacts and whose JSON items are closed objects.
    let root_particles = xsd.flattened(root_type);
    if let Some(props) = json.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            let items = &prop["items"];
            if items.get("additionalProperties") != Some(&Value::Bool(false)) {
                continue;
            }
            let Some(ty) = root_particles
                .iter()
                .find(|p| &p.name == name)
                .and_then(|p| p.type_name.as_deref())
            else {
                mismatches.push(format!("{name}: collection missing from XML Schema root"));
                continue;
            };
            compare(
                name,
                json_counts(items),
                xsd_counts(&xsd.flattened(ty)),
                &mut mismatches,
            );
        }
    }

    report.push(TestResult::check(
        "agreement/counts",
        "JSON Schema and XML Schema agree on required and list-valued properties",
        "Required/list counts disagree",
        mismatches,
    ));
    report
}

/// Reads both artifacts and compares them.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn validate_files(json_schema: &Path, xml_schema: &Path) -> Result<ConformanceReport> {
    let json_text = std::fs::read_to_string(json_schema)
        .with_context(|| format!("Failed to read {}", json_schema.display()))?;
    let json: Value = serde_json::from_str(&json_text)
        .with_context(|| format!("Failed to parse {} as JSON", json_schema.display()))?;
    let xsd_text = std::fs::read_to_string(xml_schema)
        .with_context(|| format!("Failed to read {}", xml_schema.display()))?;
    let parsed = xsd::parse(&xsd_text)
        .with_context(|| format!("Failed to parse {}", xml_schema.display()))?;
    Ok(validate(&json, &parsed))
}

fn compare(label: &str, json: Counts, xsd: Counts, mismatches: &mut Vec<String>) {
    if json != xsd {
        mismatches.push(format!(
            "{label}: JSON required={} lists={}, XSD required={} lists={}",
            json.required, json.lists, xsd.required, xsd.lists
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::validators::xsd::parse;
    use serde_json::json;

    const XSD: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="Doc" type="Doc"/>
  <xs:complexType name="Base">
    <xs:all>
      <xs:element name="id" type="xs:string" minOccurs="1" maxOccurs="1"/>
    </xs:all>
  </xs:complexType>
  <xs:complexType name="Entry">
    <xs:complexContent>
      <xs:extension base="Base">
        <xs:all>
          <xs:element name="tag" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
        </xs:all>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
  <xs:complexType name="Doc">
    <xs:all>
      <xs:element name="title" type="xs:string" minOccurs="1" maxOccurs="1"/>
      <xs:element name="entries" type="Entry" minOccurs="0" maxOccurs="unbounded"/>
    </xs:all>
  </xs:complexType>
</xs:schema>"#;

    fn json_doc(entry_required: serde_json::Value) -> Value {
        json!({
            "type": "object",
            "properties": {
                "$schema": { "type": "string" },
                "title": { "type": "string" },
                "entries": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "tags": { "type": "array", "items": { "type": "string" } }
                        },
                        "required": entry_required,
                        "additionalProperties": false
                    }
                }
            },
            "required": ["title"],
            "additionalProperties": false
        })
    }

    #[test]
    fn matching_artifacts_agree() {
        let report = validate(&json_doc(json!(["id"])), &parse(XSD).unwrap());
        assert!(report.all_passed(), "{:#?}", report.results);
    }

    #[test]
    fn disagreement_names_the_collection() {
        let report = validate(&json_doc(json!([])), &parse(XSD).unwrap());
        let failure = report.failures().next().unwrap();
        assert_eq!(failure.details.len(), 1);
        assert!(failure.details[0].starts_with("entries:"));
    }
}
