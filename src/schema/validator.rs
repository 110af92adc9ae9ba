//! Record validation and coercion

use super::types::{FieldSchema, FieldType, StreamSchema};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;

/// Validate a raw record against a stream schema
///
/// Declared fields present in the record are coerced to their declared type.
/// Absent required fields fail; absent optional fields are omitted from the
/// output (no null-filling). Unknown fields pass through unchanged.
/// Validation is idempotent: validating an already-validated record returns
/// it unchanged.
pub fn validate_record(record: &JsonObject, schema: &StreamSchema) -> Result<JsonObject> {
    validate_fields(record, &schema.fields, "")
}

fn validate_fields(
    record: &JsonObject,
    fields: &BTreeMap<String, FieldSchema>,
    prefix: &str,
) -> Result<JsonObject> {
    let mut out = JsonObject::new();

    for (name, field) in fields {
        let path = qualify(prefix, name);
        match record.get(name) {
            Some(Value::Null) => {
                if field.nullable {
                    out.insert(name.clone(), Value::Null);
                } else {
                    return Err(Error::type_mismatch(path, field.field_type.to_string(), "null"));
                }
            }
            Some(value) => {
                out.insert(name.clone(), coerce_value(value, field, &path)?);
            }
            None => {
                if field.required {
                    return Err(Error::MissingRequiredField { field: path });
                }
            }
        }
    }

    // Permissive superset: anything the schema doesn't know about survives
    // untouched.
    for (name, value) in record {
        if !fields.contains_key(name) {
            out.insert(name.clone(), value.clone());
        }
    }

    Ok(out)
}

fn coerce_value(value: &Value, field: &FieldSchema, path: &str) -> Result<Value> {
    let mismatch = || Error::type_mismatch(path, field.field_type.to_string(), type_name(value));

    match field.field_type {
        FieldType::Any => Ok(value.clone()),

        FieldType::String => match value {
            Value::String(_) => Ok(value.clone()),
            _ => Err(mismatch()),
        },

        FieldType::Integer => match value {
            Value::Number(n) if is_integer_literal(n) => Ok(value.clone()),
            Value::String(s) => s
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },

        FieldType::Number => match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => serde_json::from_str::<serde_json::Number>(s.trim())
                .map(Value::Number)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },

        FieldType::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(mismatch()),
        },

        FieldType::DateTime => match value {
            Value::String(s) if DateTime::parse_from_rfc3339(s).is_ok() => Ok(value.clone()),
            _ => Err(mismatch()),
        },

        FieldType::Date => match value {
            Value::String(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {
                Ok(value.clone())
            }
            _ => Err(mismatch()),
        },

        FieldType::Object => match value {
            Value::Object(map) => match &field.properties {
                Some(properties) => Ok(Value::Object(validate_fields(map, properties, path)?)),
                None => Ok(value.clone()),
            },
            _ => Err(mismatch()),
        },

        FieldType::Array => match value {
            Value::Array(items) => match &field.items {
                Some(item_schema) => {
                    let coerced = items
                        .iter()
                        .map(|item| coerce_value(item, item_schema, path))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Value::Array(coerced))
                }
                None => Ok(value.clone()),
            },
            _ => Err(mismatch()),
        },
    }
}

/// Whether a JSON number is an integer literal (no fraction, no exponent)
///
/// With arbitrary precision enabled the text form is authoritative; `as_i64`
/// would wrongly reject integers outside the i64 range.
fn is_integer_literal(n: &serde_json::Number) -> bool {
    let text = n.to_string();
    !text.contains(['.', 'e', 'E'])
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
