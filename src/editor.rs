//! # Field Value Codec
//!
//! Typed editing of schema-less documents. The admin editor shows each
//! field as text; this module turns that text back into a store value
//! according to the kind of value the field held before the edit.
//!
//! `FieldValue::decode(v.kind(), &v.encode())` always yields `v` again.
//! Structured values are written as extended JSON so nested identifiers,
//! dates and 64-bit integers keep their store type.

use std::fmt;

use bson::{Bson, Document};
use serde_json::Value;
use thiserror::Error;

use crate::document::bson_to_json;

/// Marks a 64-bit integer whose value would also fit in 32 bits
const LONG_SUFFIX: char = 'L';

/// Errors raised while decoding editor input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("'{input}' is not a valid {kind}")]
    InvalidInput { kind: FieldKind, input: String },

    #[error("Invalid JSON for {kind} field: {reason}")]
    InvalidJson { kind: FieldKind, reason: String },
}

/// The editable kinds of field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldKind {
    /// Kind used to edit an existing value. Null and unknown values are
    /// edited as strings.
    pub fn of(value: &Bson) -> FieldKind {
        match value {
            Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) => FieldKind::Number,
            Bson::Boolean(_) => FieldKind::Boolean,
            Bson::Document(_) => FieldKind::Object,
            Bson::Array(_) => FieldKind::Array,
            _ => FieldKind::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric payload, keeping integers exact and at their stored width
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Float(f64),
}

impl Number {
    fn encode(&self) -> String {
        match self {
            Number::Int32(i) => i.to_string(),
            Number::Int64(i) if i32::try_from(*i).is_ok() => format!("{}{}", i, LONG_SUFFIX),
            Number::Int64(i) => i.to_string(),
            Number::Float(f) => format!("{:?}", f),
        }
    }

    /// Narrowest integer width that holds the input, else a finite float
    fn parse(input: &str) -> Option<Number> {
        if let Some(digits) = input.strip_suffix(LONG_SUFFIX) {
            return digits.parse().ok().map(Number::Int64);
        }
        if let Ok(i) = input.parse::<i32>() {
            return Some(Number::Int32(i));
        }
        if let Ok(i) = input.parse::<i64>() {
            return Some(Number::Int64(i));
        }
        input
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Float)
    }
}

/// A field value as the editor sees it
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(Number),
    Bool(bool),
    Object(Document),
    Array(Vec<Bson>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Bool(_) => FieldKind::Boolean,
            FieldValue::Object(_) => FieldKind::Object,
            FieldValue::Array(_) => FieldKind::Array,
        }
    }

    /// Editor view of a stored value. Values with no editable kind
    /// (identifiers, dates, null) are shown as their display string.
    pub fn from_bson(value: &Bson) -> FieldValue {
        match value {
            Bson::String(s) => FieldValue::String(s.clone()),
            Bson::Int32(i) => FieldValue::Number(Number::Int32(*i)),
            Bson::Int64(i) => FieldValue::Number(Number::Int64(*i)),
            Bson::Double(f) => FieldValue::Number(Number::Float(*f)),
            Bson::Boolean(b) => FieldValue::Bool(*b),
            Bson::Document(doc) => FieldValue::Object(doc.clone()),
            Bson::Array(items) => FieldValue::Array(items.clone()),
            Bson::Null | Bson::Undefined => FieldValue::String(String::new()),
            other => match bson_to_json(other) {
                Value::String(s) => FieldValue::String(s),
                json => FieldValue::String(json.to_string()),
            },
        }
    }

    pub fn into_bson(self) -> Bson {
        match self {
            FieldValue::String(s) => Bson::String(s),
            FieldValue::Number(Number::Int32(i)) => Bson::Int32(i),
            FieldValue::Number(Number::Int64(i)) => Bson::Int64(i),
            FieldValue::Number(Number::Float(f)) => Bson::Double(f),
            FieldValue::Bool(b) => Bson::Boolean(b),
            FieldValue::Object(doc) => Bson::Document(doc),
            FieldValue::Array(items) => Bson::Array(items),
        }
    }

    /// Text shown in the editor: strings verbatim, structures as
    /// pretty-printed extended JSON. A 64-bit integer small enough for
    /// 32 bits carries an `L` suffix.
    pub fn encode(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Number(n) => n.encode(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Object(doc) => pretty(&editor_json(&Bson::Document(doc.clone()))),
            FieldValue::Array(items) => pretty(&editor_json(&Bson::Array(items.clone()))),
        }
    }

    /// Parse editor text as a value of `kind`
    pub fn decode(kind: FieldKind, input: &str) -> Result<FieldValue, EditorError> {
        let invalid = || EditorError::InvalidInput {
            kind,
            input: input.to_string(),
        };

        match kind {
            FieldKind::String => Ok(FieldValue::String(input.to_string())),
            FieldKind::Number => Number::parse(input.trim())
                .map(FieldValue::Number)
                .ok_or_else(invalid),
            FieldKind::Boolean => match input.trim() {
                "true" => Ok(FieldValue::Bool(true)),
                "false" => Ok(FieldValue::Bool(false)),
                _ => Err(invalid()),
            },
            FieldKind::Object | FieldKind::Array => {
                let json: Value =
                    serde_json::from_str(input).map_err(|e| EditorError::InvalidJson {
                        kind,
                        reason: e.to_string(),
                    })?;
                let value = Bson::try_from(json).map_err(|e| EditorError::InvalidJson {
                    kind,
                    reason: e.to_string(),
                })?;
                match (kind, value) {
                    (FieldKind::Object, Bson::Document(doc)) => Ok(FieldValue::Object(doc)),
                    (FieldKind::Array, Bson::Array(items)) => Ok(FieldValue::Array(items)),
                    _ => Err(invalid()),
                }
            }
        }
    }
}

/// Relaxed extended JSON, except `Int64` keeps its canonical
/// `$numberLong` form so the width survives parsing
fn editor_json(value: &Bson) -> Value {
    match value {
        Bson::Int64(i) => serde_json::json!({ "$numberLong": i.to_string() }),
        Bson::Document(doc) => Value::Object(
            doc.iter()
                .map(|(key, value)| (key.clone(), editor_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.iter().map(editor_json).collect()),
        other => other.clone().into_relaxed_extjson(),
    }
}

fn pretty(json: &Value) -> String {
    serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
}

/// Apply one edited field, decoding `input` by the field's current kind.
/// Fields that do not exist yet are edited as strings. A 64-bit integer
/// field stays 64-bit when the new value is small.
pub fn apply_field_edit(doc: &mut Document, field: &str, input: &str) -> Result<(), EditorError> {
    let current = doc.get(field);
    let kind = current.map(FieldKind::of).unwrap_or(FieldKind::String);
    let value = match (current, FieldValue::decode(kind, input)?) {
        (Some(Bson::Int64(_)), FieldValue::Number(Number::Int32(i))) => {
            FieldValue::Number(Number::Int64(i64::from(i)))
        }
        (_, value) => value,
    };
    doc.insert(field, value.into_bson());
    Ok(())
}

/// Drop empty-string and null fields before saving
pub fn prepare_for_save(doc: Document) -> Document {
    doc.into_iter()
        .filter(|(_, value)| match value {
            Bson::Null => false,
            Bson::String(s) => !s.is_empty(),
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId, DateTime};

    #[test]
    fn test_kind_of() {
        assert_eq!(FieldKind::of(&Bson::Int32(1)), FieldKind::Number);
        assert_eq!(FieldKind::of(&Bson::Double(1.5)), FieldKind::Number);
        assert_eq!(FieldKind::of(&Bson::Boolean(true)), FieldKind::Boolean);
        assert_eq!(FieldKind::of(&Bson::Array(vec![])), FieldKind::Array);
        assert_eq!(FieldKind::of(&Bson::Document(doc! {})), FieldKind::Object);
        assert_eq!(FieldKind::of(&Bson::Null), FieldKind::String);
        assert_eq!(FieldKind::of(&Bson::ObjectId(ObjectId::new())), FieldKind::String);
    }

    #[test]
    fn test_encode_decode_is_reversible() {
        let values = vec![
            FieldValue::String("hello world".to_string()),
            FieldValue::String(String::new()),
            FieldValue::Number(Number::Int32(42)),
            FieldValue::Number(Number::Int64(5)),
            FieldValue::Number(Number::Int64(-7_000_000_000)),
            FieldValue::Number(Number::Float(2.5)),
            FieldValue::Number(Number::Float(3.0)),
            FieldValue::Bool(true),
            FieldValue::Bool(false),
            FieldValue::Object(doc! { "level": 4, "name": "Rust" }),
            FieldValue::Array(vec![Bson::String("x".into()), Bson::Int32(1)]),
            FieldValue::Object(doc! { "n": Bson::Int64(5), "big": Bson::Int64(1 << 40) }),
            FieldValue::Object(doc! {
                "ref": ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap(),
                "at": DateTime::from_millis(1_700_000_000_123),
                "score": 0.5,
                "nested": { "tags": ["a"], "count": Bson::Int64(2) },
            }),
            FieldValue::Array(vec![
                Bson::ObjectId(ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap()),
                Bson::Int64(7),
                Bson::Null,
            ]),
        ];

        for value in values {
            let decoded = FieldValue::decode(value.kind(), &value.encode()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn test_decode_rejects_mismatched_input() {
        assert!(matches!(
            FieldValue::decode(FieldKind::Number, "twelve"),
            Err(EditorError::InvalidInput { .. })
        ));
        assert!(FieldValue::decode(FieldKind::Number, "NaN").is_err());
        assert!(FieldValue::decode(FieldKind::Boolean, "yes").is_err());
        assert!(matches!(
            FieldValue::decode(FieldKind::Object, "{oops"),
            Err(EditorError::InvalidJson { .. })
        ));
        assert!(FieldValue::decode(FieldKind::Object, "[1]").is_err());
        assert!(FieldValue::decode(FieldKind::Array, "{}").is_err());
    }

    #[test]
    fn test_from_bson_roundtrips_editable_values() {
        for value in [
            Bson::String("a".into()),
            Bson::Int32(5),
            Bson::Int64(5),
            Bson::Int64(9_000_000_000),
            Bson::Double(0.25),
            Bson::Boolean(true),
            Bson::Document(doc! { "a": 1 }),
            Bson::Document(doc! { "a": Bson::Int64(1) }),
        ] {
            assert_eq!(FieldValue::from_bson(&value).into_bson(), value);
        }
    }

    #[test]
    fn test_number_encoding() {
        assert_eq!(FieldValue::Number(Number::Int32(5)).encode(), "5");
        assert_eq!(FieldValue::Number(Number::Int64(5)).encode(), "5L");
        assert_eq!(FieldValue::Number(Number::Int64(1 << 40)).encode(), "1099511627776");
        assert_eq!(FieldValue::Number(Number::Float(3.0)).encode(), "3.0");

        assert_eq!(
            FieldValue::decode(FieldKind::Number, " 12 ").unwrap(),
            FieldValue::Number(Number::Int32(12))
        );
        assert_eq!(
            FieldValue::decode(FieldKind::Number, "3000000000").unwrap(),
            FieldValue::Number(Number::Int64(3_000_000_000))
        );
        assert!(FieldValue::decode(FieldKind::Number, "1.5L").is_err());
    }

    #[test]
    fn test_structured_values_keep_store_types() {
        let oid = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap();
        let value = FieldValue::Object(doc! { "ref": oid, "n": Bson::Int64(5) });

        let text = value.encode();
        assert!(text.contains("$oid"));
        assert!(text.contains("$numberLong"));

        let FieldValue::Object(decoded) = FieldValue::decode(FieldKind::Object, &text).unwrap()
        else {
            panic!("expected an object");
        };
        assert_eq!(decoded.get_object_id("ref").unwrap(), oid);
        assert_eq!(decoded.get("n"), Some(&Bson::Int64(5)));

        // hand-written JSON still decodes
        assert_eq!(
            FieldValue::decode(FieldKind::Object, r#"{"level": 4}"#).unwrap(),
            FieldValue::Object(doc! { "level": 4 })
        );
    }

    #[test]
    fn test_from_bson_non_editable_values() {
        let oid = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap();
        assert_eq!(
            FieldValue::from_bson(&Bson::ObjectId(oid)),
            FieldValue::String("64b7f0c2a1b2c3d4e5f60718".to_string())
        );
        assert_eq!(
            FieldValue::from_bson(&Bson::Null),
            FieldValue::String(String::new())
        );
    }

    #[test]
    fn test_apply_field_edit_uses_current_kind() {
        let mut doc = doc! { "title": "A", "level": 3, "live": false, "tags": ["x"] };

        apply_field_edit(&mut doc, "level", "4").unwrap();
        apply_field_edit(&mut doc, "live", "true").unwrap();
        apply_field_edit(&mut doc, "tags", r#"["x", "y"]"#).unwrap();
        apply_field_edit(&mut doc, "title", "42").unwrap();
        apply_field_edit(&mut doc, "summary", "new").unwrap();

        assert_eq!(
            doc,
            doc! {
                "title": "42",
                "level": 4,
                "live": true,
                "tags": ["x", "y"],
                "summary": "new"
            }
        );

        assert!(apply_field_edit(&mut doc, "level", "high").is_err());
        assert_eq!(doc.get_i32("level").unwrap(), 4);
    }

    #[test]
    fn test_apply_field_edit_keeps_long_width() {
        let mut doc = doc! { "views": Bson::Int64(10) };
        apply_field_edit(&mut doc, "views", "11").unwrap();
        assert_eq!(doc.get("views"), Some(&Bson::Int64(11)));
    }

    #[test]
    fn test_prepare_for_save() {
        let doc = doc! { "title": "A", "summary": "", "link": Bson::Null, "stars": 0 };
        assert_eq!(prepare_for_save(doc), doc! { "title": "A", "stars": 0 });
    }
}
