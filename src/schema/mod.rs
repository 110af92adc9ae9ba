//! Declarative stream schemas and record validation
//!
//! Each stream carries a field-type definition. Validation coerces present
//! fields to their declared types, rejects impossible coercions, and passes
//! unknown fields through unchanged so upstream schema additions don't break
//! the connector.

mod types;
mod validator;

pub use types::{FieldSchema, FieldType, StreamSchema};
pub use validator::validate_record;
