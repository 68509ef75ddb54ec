//! The result contract rendered as each provider's JSON schema dialect.

use serde_json::{json, Map, Value};

use quizscan_core::traits::{FieldKind, OutputField};

/// Gemini `responseSchema`: OpenAPI subset with upper-case type names.
pub(crate) fn gemini_schema(fields: &[OutputField]) -> Value {
    build(fields, |kind| match kind {
        FieldKind::String => "STRING",
        FieldKind::Number => "NUMBER",
    })
    .map(|mut schema| {
        schema.insert("type".into(), json!("OBJECT"));
        Value::Object(schema)
    })
    .unwrap_or(Value::Null)
}

/// OpenAI strict `json_schema`: every field required, nothing extra allowed.
pub(crate) fn openai_schema(fields: &[OutputField]) -> Value {
    build(fields, |kind| match kind {
        FieldKind::String => "string",
        FieldKind::Number => "number",
    })
    .map(|mut schema| {
        schema.insert("type".into(), json!("object"));
        schema.insert("additionalProperties".into(), json!(false));
        Value::Object(schema)
    })
    .unwrap_or(Value::Null)
}

fn build(fields: &[OutputField], type_name: fn(FieldKind) -> &'static str) -> Option<Map<String, Value>> {
    if fields.is_empty() {
        return None;
    }
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| (f.name.to_string(), json!({ "type": type_name(f.kind) })))
        .collect();
    let required: Vec<&str> = fields.iter().map(|f| f.name).collect();

    let mut schema = Map::new();
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("required".into(), json!(required));
    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizscan_core::traits::RESULT_CONTRACT;

    #[test]
    fn gemini_dialect() {
        let schema = gemini_schema(RESULT_CONTRACT);
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["score"]["type"], "NUMBER");
        assert_eq!(schema["properties"]["studentName"]["type"], "STRING");
        assert_eq!(schema["required"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn openai_dialect_is_closed() {
        let schema = openai_schema(RESULT_CONTRACT);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["totalMarks"]["type"], "number");
    }

    #[test]
    fn empty_contract_has_no_schema() {
        assert!(gemini_schema(&[]).is_null());
    }
}
