//! Record extraction from response bodies
//!
//! A response body is parsed once per page and queried with a fixed JSON
//! path to produce the ordered record sequence. Numeric literals survive as
//! exact decimal text (serde_json `arbitrary_precision`), so large
//! identifiers and currency-like values never round-trip through an f64.

mod extractor;

pub use extractor::{lookup_path, parse_body, RecordExtractor};

#[cfg(test)]
mod tests;
