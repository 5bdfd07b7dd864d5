//! JSON Schema artifact validator.
//!
//! Verifies that a generated schema is a well-formed draft-07 document:
//! - `$schema`, `$id`, `title` present; root `type: object` closed with
//!   `additionalProperties: false`
//! - every `required` entry names a declared property
//! - arrays carry `items`, and `minItems <= maxItems`
//! - `enum` value sets are non-empty and free of duplicates

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::report::{ConformanceReport, TestResult};

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Validates the JSON Schema file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON.
pub fn validate(path: &Path) -> Result<ConformanceReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
    Ok(validate_value(&value))
}

/// Validates an already-parsed schema.
pub fn validate_value(value: &Value) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    check_header(value, &mut report);

    let mut required = Vec::new();
    let mut arrays = Vec::new();
    let mut enums = Vec::new();
    walk(value, "#", &mut required, &mut arrays, &mut enums);

    report.push(TestResult::check(
        "json-schema/required",
        "Every required entry names a declared property",
        "Required entries without a property",
        required,
    ));
    report.push(TestResult::check(
        "json-schema/arrays",
        "Every array declares items with consistent bounds",
        "Malformed array schemas",
        arrays,
    ));
    report.push(TestResult::check(
        "json-schema/enums",
        "Every enum is a non-empty set of distinct strings",
        "Malformed enums",
        enums,
    ));
    report
}

fn check_header(value: &Value, report: &mut ConformanceReport) {
    match value.get("$schema").and_then(Value::as_str) {
        Some(DRAFT_07) => report.push(TestResult::pass(
            "json-schema/header",
            "$schema is JSON Schema draft-07",
        )),
        Some(other) => report.push(TestResult::warn(
            "json-schema/header",
            format!("$schema is {other}, expected draft-07"),
        )),
        None => report.push(TestResult::fail("json-schema/header", "Missing $schema")),
    }

    let missing: Vec<String> = ["$id", "title", "properties"]
        .iter()
        .filter(|k| value.get(**k).is_none())
        .map(|k| (*k).to_string())
        .collect();
    report.push(TestResult::check(
        "json-schema/header",
        "$id, title and properties present",
        "Missing top-level keywords",
        missing,
    ));

    let closed = value.get("type").and_then(Value::as_str) == Some("object")
        && value.get("additionalProperties") == Some(&Value::Bool(false));
    if closed {
        report.push(TestResult::pass(
            "json-schema/root",
            "Root is a closed object schema",
        ));
    } else {
        report.push(TestResult::fail(
            "json-schema/root",
            "Root must be type object with additionalProperties false",
        ));
    }
}

fn walk(
    schema: &Value,
    pointer: &str,
    required: &mut Vec<String>,
    arrays: &mut Vec<String>,
    enums: &mut Vec<String>,
) {
    let Some(object) = schema.as_object() else {
        return;
    };

    if let Some(names) = object.get("required").and_then(Value::as_array) {
        let props = object.get("properties").and_then(Value::as_object);
        for name in names {
            let declared = name
                .as_str()
                .is_some_and(|n| props.is_some_and(|p| p.contains_key(n)));
            if !declared {
                required.push(format!("{pointer}/required: {name}"));
            }
        }
    }

    if object.get("type").and_then(Value::as_str) == Some("array") {
        match object.get("items") {
            Some(items) => walk(items, &format!("{pointer}/items"), required, arrays, enums),
            None => arrays.push(format!("{pointer}: array without items")),
        }
        let min = object.get("minItems").and_then(Value::as_u64);
        let max = object.get("maxItems").and_then(Value::as_u64);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                arrays.push(format!("{pointer}: minItems {min} > maxItems {max}"));
            }
        }
    }

    if let Some(values) = object.get("enum") {
        match values.as_array() {
            Some(values) if !values.is_empty() => {
                let mut seen = HashSet::new();
                for v in values {
                    match v.as_str() {
                        Some(s) if seen.insert(s) => {}
                        Some(s) => enums.push(format!("{pointer}/enum: duplicate {s}")),
                        None => enums.push(format!("{pointer}/enum: non-string {v}")),
                    }
                }
            }
            _ => enums.push(format!("{pointer}/enum: empty or not an array")),
        }
    }

    if let Some(props) = object.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            walk(
                prop,
                &format!("{pointer}/properties/{name}"),
                required,
                arrays,
                enums,
            );
        }
    }
}
