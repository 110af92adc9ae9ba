//! Tests for record extraction

use super::*;
use crate::error::Error;
use serde_json::{json, Value};

#[test]
fn test_parse_body_rejects_invalid_json() {
    let err = parse_body("<html>502 Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[test]
fn test_lookup_path() {
    let body = json!({"metadata": {"next": "https://api/x?cursor=abc"}});

    assert_eq!(
        lookup_path(&body, "metadata.next").and_then(Value::as_str),
        Some("https://api/x?cursor=abc")
    );
    assert_eq!(
        lookup_path(&body, "$.metadata.next").and_then(Value::as_str),
        Some("https://api/x?cursor=abc")
    );
    assert!(lookup_path(&body, "metadata.prev").is_none());
    assert!(lookup_path(&body, "missing.next").is_none());
}

#[test]
fn test_extract_results_in_source_order() {
    let body = json!({
        "results": [
            {"tempoWorklogId": 3},
            {"tempoWorklogId": 1},
            {"tempoWorklogId": 2}
        ],
        "metadata": {"count": 3}
    });

    let extractor = RecordExtractor::default();
    let records = extractor.extract(&body).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["tempoWorklogId"], json!(3));
    assert_eq!(records[1]["tempoWorklogId"], json!(1));
    assert_eq!(records[2]["tempoWorklogId"], json!(2));
}

#[test]
fn test_extract_missing_results_is_empty() {
    let extractor = RecordExtractor::default();
    let records = extractor.extract(&json!({"metadata": {}})).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_extract_null_results_is_empty() {
    let extractor = RecordExtractor::new("results");
    let records = extractor.extract(&json!({"results": null})).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_extract_simple_path_without_wildcard() {
    let extractor = RecordExtractor::new("data.items");
    let body = json!({"data": {"items": [{"id": 1}, {"id": 2}]}});

    let records = extractor.extract(&body).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_numbers_preserve_exact_decimal_text() {
    let body = parse_body(r#"{"results": [{"billableSeconds": 123456789012345.5}]}"#).unwrap();

    let extractor = RecordExtractor::default();
    let records = extractor.extract(&body).unwrap();

    // Without arbitrary precision this would come back as an f64 and lose
    // the trailing .5 on a 15-digit mantissa.
    assert_eq!(
        records[0]["billableSeconds"].to_string(),
        "123456789012345.5"
    );
}

#[test]
fn test_large_integer_ids_survive() {
    let body = parse_body(r#"{"results": [{"tempoWorklogId": 9007199254740993}]}"#).unwrap();

    let extractor = RecordExtractor::default();
    let records = extractor.extract(&body).unwrap();

    // 2^53 + 1 is not representable as an f64
    assert_eq!(records[0]["tempoWorklogId"].to_string(), "9007199254740993");
}
