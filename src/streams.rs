//! Stream definitions
//!
//! A stream is one logical data entity extracted independently. Definitions
//! are immutable descriptors created at configuration time; the built-in
//! catalog covers the Tempo worklogs entity.

use crate::error::{Error, Result};
use crate::pagination::PaginationMode;
use crate::schema::{FieldSchema, StreamSchema};
use crate::types::{JsonObject, ReplicationMethod};

/// Immutable descriptor for one stream
#[derive(Debug, Clone)]
pub struct StreamDefinition {
    /// Unique stream name
    pub name: String,
    /// API endpoint path, appended to the base URL
    pub path: String,
    /// JSON path to the record array in the response
    pub record_path: String,
    /// Field schema
    pub schema: StreamSchema,
    /// Primary key field set
    pub primary_key: Vec<String>,
    /// Field used to order records and detect incremental progress
    pub replication_key: Option<String>,
    /// How progress is tracked between runs
    pub replication_method: ReplicationMethod,
    /// Pagination strategy for this stream
    pub pagination: PaginationMode,
}

impl StreamDefinition {
    /// Create a full-table stream
    pub fn new(name: impl Into<String>, path: impl Into<String>, schema: StreamSchema) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            record_path: "$.results[*]".to_string(),
            schema,
            primary_key: Vec::new(),
            replication_key: None,
            replication_method: ReplicationMethod::FullTable,
            pagination: PaginationMode::default(),
        }
    }

    /// Set the primary key fields
    #[must_use]
    pub fn with_primary_key(mut self, fields: &[&str]) -> Self {
        self.primary_key = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// Make the stream incremental on the given replication key
    #[must_use]
    pub fn with_replication_key(mut self, field: impl Into<String>) -> Self {
        self.replication_key = Some(field.into());
        self.replication_method = ReplicationMethod::Incremental;
        self
    }

    /// Override the record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = path.into();
        self
    }

    /// Override the pagination strategy
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationMode) -> Self {
        self.pagination = pagination;
        self
    }

    /// Check that a record carries every primary key field
    ///
    /// A missing primary key is a fatal validation error for that record.
    pub fn check_primary_key(&self, record: &JsonObject) -> Result<()> {
        for field in &self.primary_key {
            match record.get(field) {
                None | Some(serde_json::Value::Null) => {
                    return Err(Error::MissingPrimaryKey {
                        stream: self.name.clone(),
                        field: field.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// The Tempo worklogs stream
pub fn worklogs() -> StreamDefinition {
    let attribute_value = FieldSchema::object(
        [
            ("key".to_string(), FieldSchema::string()),
            ("value".to_string(), FieldSchema::any()),
        ]
        .into(),
    );

    let schema = StreamSchema::new()
        .with_field("tempoWorklogId", FieldSchema::integer().required())
        .with_field("self", FieldSchema::string().required())
        .with_field("description", FieldSchema::string())
        .with_field(
            "attributes",
            FieldSchema::object(
                [
                    ("self".to_string(), FieldSchema::string()),
                    ("values".to_string(), FieldSchema::array(attribute_value)),
                ]
                .into(),
            ),
        )
        .with_field(
            "author",
            FieldSchema::object(
                [
                    ("self".to_string(), FieldSchema::string()),
                    ("accountId".to_string(), FieldSchema::string()),
                ]
                .into(),
            ),
        )
        .with_field(
            "issue",
            FieldSchema::object(
                [
                    ("self".to_string(), FieldSchema::string()),
                    ("id".to_string(), FieldSchema::integer()),
                ]
                .into(),
            ),
        )
        .with_field("billableSeconds", FieldSchema::integer())
        .with_field("timeSpentSeconds", FieldSchema::integer())
        .with_field("createdAt", FieldSchema::date_time())
        .with_field("updatedAt", FieldSchema::date_time())
        .with_field("startDate", FieldSchema::date())
        .with_field("startDateTimeUtc", FieldSchema::date_time());

    StreamDefinition::new("worklogs", "/worklogs", schema)
        .with_primary_key(&["tempoWorklogId"])
        .with_replication_key("updatedAt")
}

/// All built-in stream definitions
pub fn builtin_streams() -> Vec<StreamDefinition> {
    vec![worklogs()]
}

/// Look up a built-in stream by name
pub fn find_stream(name: &str) -> Result<StreamDefinition> {
    builtin_streams()
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| Error::StreamNotFound {
            stream: name.to_string(),
        })
}
