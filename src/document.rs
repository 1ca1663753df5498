//! # Document Codec
//!
//! Conversion between the store's BSON documents and the JSON seen by
//! HTTP clients.
//!
//! Native identifiers render as 24-digit hex strings and BSON dates as
//! RFC 3339 timestamps with millisecond precision, matching what the admin
//! panel displays.

use bson::{Bson, Document};
use chrono::SecondsFormat;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors raised while turning client JSON into store documents
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The payload was valid JSON but not an object
    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Convert a JSON value into its BSON counterpart.
///
/// Integers that fit in 32 bits become `Int32`, wider integers `Int64` and
/// everything else `Double`.
pub fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => number_to_bson(&n),
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(object_to_document(map)),
    }
}

/// Convert a JSON object into a document, rejecting any other JSON shape
pub fn json_to_document(value: Value) -> Result<Document, DocumentError> {
    match value {
        Value::Object(map) => Ok(object_to_document(map)),
        other => Err(DocumentError::NotAnObject(json_kind(&other))),
    }
}

fn object_to_document(map: Map<String, Value>) -> Document {
    map.into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

fn number_to_bson(n: &Number) -> Bson {
    match n.as_i64() {
        Some(i) => i32::try_from(i).map(Bson::Int32).unwrap_or(Bson::Int64(i)),
        None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a BSON value as client-facing JSON
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.to_chrono()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
        Bson::String(s) => Value::String(s.clone()),
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(doc) => document_to_json(doc),
        other => other.clone().into_relaxed_extjson(),
    }
}

/// Render a whole document as a JSON object
pub fn document_to_json(doc: &Document) -> Value {
    Value::Object(
        doc.iter()
            .map(|(key, value)| (key.clone(), bson_to_json(value)))
            .collect(),
    )
}

/// serde helper for result fields that carry a native BSON value
pub fn serialize_bson<S: Serializer>(value: &Bson, serializer: S) -> Result<S::Ok, S::Error> {
    bson_to_json(value).serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId, DateTime};
    use serde_json::json;

    #[test]
    fn test_json_object_becomes_document() {
        let doc = json_to_document(json!({
            "title": "A",
            "stars": 4,
            "ratio": 0.5,
            "big": 9_000_000_000i64,
            "tags": ["x"],
            "meta": {"live": true}
        }))
        .unwrap();

        assert_eq!(doc.get_str("title").unwrap(), "A");
        assert_eq!(doc.get("stars"), Some(&Bson::Int32(4)));
        assert_eq!(doc.get("ratio"), Some(&Bson::Double(0.5)));
        assert_eq!(doc.get("big"), Some(&Bson::Int64(9_000_000_000)));
        assert_eq!(doc.get_array("tags").unwrap(), &vec![Bson::String("x".into())]);
        assert!(doc.get_document("meta").unwrap().get_bool("live").unwrap());
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert_eq!(
            json_to_document(json!([1, 2])),
            Err(DocumentError::NotAnObject("array"))
        );
        assert_eq!(
            json_to_document(Value::Null),
            Err(DocumentError::NotAnObject("null"))
        );
    }

    #[test]
    fn test_object_id_renders_as_hex() {
        let oid = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap();
        let rendered = document_to_json(&doc! { "_id": oid, "title": "A" });

        assert_eq!(rendered, json!({"_id": "64b7f0c2a1b2c3d4e5f60718", "title": "A"}));
    }

    #[test]
    fn test_dates_render_as_rfc3339() {
        let rendered = bson_to_json(&Bson::DateTime(DateTime::from_millis(0)));
        assert_eq!(rendered, json!("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_non_finite_double_renders_as_null() {
        assert_eq!(bson_to_json(&Bson::Double(f64::NAN)), Value::Null);
    }
}
