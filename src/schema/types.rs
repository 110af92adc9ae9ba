//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    DateTime,
    Date,
    Object,
    Array,
    /// Accept any JSON value unchanged
    Any,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::DateTime => write!(f, "date-time"),
            FieldType::Date => write!(f, "date"),
            FieldType::Object => write!(f, "object"),
            FieldType::Array => write!(f, "array"),
            FieldType::Any => write!(f, "any"),
        }
    }
}

/// Schema for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field must be present in every record
    #[serde(default)]
    pub required: bool,

    /// Whether an explicit null is accepted
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Nested field schemas (for objects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, FieldSchema>>,

    /// Element schema (for arrays)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldSchema>>,
}

fn default_true() -> bool {
    true
}

impl FieldSchema {
    /// Create a field schema with the given type
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            nullable: true,
            properties: None,
            items: None,
        }
    }

    /// String field
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// Integer field
    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    /// Number field
    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    /// Boolean field
    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    /// RFC 3339 date-time field
    pub fn date_time() -> Self {
        Self::new(FieldType::DateTime)
    }

    /// `YYYY-MM-DD` date field
    pub fn date() -> Self {
        Self::new(FieldType::Date)
    }

    /// Field accepting any JSON value
    pub fn any() -> Self {
        Self::new(FieldType::Any)
    }

    /// Object field with nested properties
    pub fn object(properties: BTreeMap<String, FieldSchema>) -> Self {
        Self {
            field_type: FieldType::Object,
            required: false,
            nullable: true,
            properties: Some(properties),
            items: None,
        }
    }

    /// Array field with an element schema
    pub fn array(items: FieldSchema) -> Self {
        Self {
            field_type: FieldType::Array,
            required: false,
            nullable: true,
            properties: None,
            items: Some(Box::new(items)),
        }
    }

    /// Mark the field required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Reject explicit nulls
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Ordered field schema for one stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSchema {
    /// Field name to field schema
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSchema>,
}

impl StreamSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Get a field schema
    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Names of required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, f)| f.required)
            .map(|(name, _)| name.as_str())
    }
}
