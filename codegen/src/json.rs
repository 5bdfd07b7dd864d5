//! JSON Schema rendering.
//!
//! A pure function of the [`SchemaDocument`]. Object-valued properties are
//! inlined; a class already being expanded higher up the stack is cut off with
//! a placeholder object.

use serde_json::{json, Map, Value};

use crate::assemble::{ClassProfile, SchemaDocument};
use crate::mapping::json_type;
use crate::resolve::{Multiplicity, PropertyProfile, ResolvedType};

/// Renders the whole document as a JSON Schema value.
#[must_use]
pub fn to_json_schema(doc: &SchemaDocument) -> Value {
    let mut stack: Vec<&str> = Vec::new();
    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    for synthetic in &doc.synthetic {
        let mut schema = Map::new();
        schema.insert("type".into(), json!("string"));
        if !synthetic.description.is_empty() {
            schema.insert("description".into(), json!(synthetic.description));
        }
        properties.insert(synthetic.name.clone(), Value::Object(schema));
        if synthetic.required {
            required.push(json!(synthetic.name));
        }
    }

    let mut root_description = None;
    if let Some(root) = doc.root_class() {
        stack.push(&root.iri);
        add_properties(doc, root, &mut stack, &mut properties, &mut required);
        stack.pop();
        if !root.comment.is_empty() {
            root_description = Some(root.comment.clone());
        }
    }

    for collection in &doc.collections {
        let items = class_schema(doc, &collection.class, &mut stack, true);
        let mut schema = Map::new();
        if let Some(class) = doc.class(&collection.class) {
            if !class.comment.is_empty() {
                schema.insert("description".into(), json!(class.comment));
            }
        }
        schema.insert("type".into(), json!("array"));
        schema.insert("items".into(), items);
        properties.insert(collection.name.clone(), Value::Object(schema));
    }

    let mut out = Map::new();
    out.insert("$schema".into(), json!(doc.draft));
    out.insert("$id".into(), json!(doc.schema_id));
    out.insert("title".into(), json!(doc.title));
    if let Some(description) = root_description {
        out.insert("description".into(), json!(description));
    }
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".into(), Value::Array(required));
    }
    out.insert("additionalProperties".into(), json!(false));
    tracing::debug!(classes = doc.classes.len(), "rendered JSON Schema");
    Value::Object(out)
}

fn add_properties<'d>(
    doc: &'d SchemaDocument,
    class: &'d ClassProfile,
    stack: &mut Vec<&'d str>,
    properties: &mut Map<String, Value>,
    required: &mut Vec<Value>,
) {
    for profile in &class.properties {
        let name = doc.wire_name(profile, true);
        if profile.required && !profile.deprecated {
            required.push(json!(name));
        }
        properties.insert(name, property_schema(doc, profile, stack));
    }
}

fn class_schema<'d>(
    doc: &'d SchemaDocument,
    iri: &'d str,
    stack: &mut Vec<&'d str>,
    top_level: bool,
) -> Value {
    let Some(class) = doc.class(iri) else {
        return json!({ "type": "object" });
    };
    if stack.contains(&iri) {
        return json!({
            "type": "object",
            "description": format!("Recursive reference to {}", class.name),
        });
    }
    stack.push(iri);
    let mut properties = Map::new();
    let mut required = Vec::new();
    add_properties(doc, class, stack, &mut properties, &mut required);
    stack.pop();

    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    if !class.comment.is_empty() {
        schema.insert("description".into(), json!(class.comment));
    }
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    if top_level {
        schema.insert("additionalProperties".into(), json!(false));
    }
    Value::Object(schema)
}

fn property_schema<'d>(
    doc: &'d SchemaDocument,
    profile: &'d PropertyProfile,
    stack: &mut Vec<&'d str>,
) -> Value {
    let value = type_schema(doc, &profile.resolved_type, stack);
    let mut schema = match profile.multiplicity {
        Multiplicity::Scalar => match value {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        Multiplicity::List { min, max } => {
            let mut array = Map::new();
            array.insert("type".into(), json!("array"));
            array.insert("items".into(), value);
            if min > 0 {
                array.insert("minItems".into(), json!(min));
            }
            if let Some(max) = max {
                array.insert("maxItems".into(), json!(max));
            }
            array
        }
    };
    if !profile.comment.is_empty() {
        schema.insert("description".into(), json!(profile.comment));
    }
    Value::Object(schema)
}

fn type_schema<'d>(
    doc: &'d SchemaDocument,
    resolved: &'d ResolvedType,
    stack: &mut Vec<&'d str>,
) -> Value {
    match resolved {
        ResolvedType::Primitive(p) => json!({ "type": json_type(*p) }),
        ResolvedType::Enum(info) => json!({ "type": "string", "enum": info.symbols }),
        ResolvedType::Reference { class, role } => json!({
            "type": "string",
            "description": format!("{role} for {}", owlschema_ontology::local_name(class)),
        }),
        ResolvedType::Object(class) => class_schema(doc, class, stack, false),
    }
}
