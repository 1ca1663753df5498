//! # Filter Normalization
//!
//! Canonicalizes caller-supplied exact-match filters before they reach the
//! store. Identifier values arrive from HTTP clients as hex strings, but the
//! store only matches them against its native `ObjectId`, so an
//! unnormalized `_id` silently matches nothing.
//!
//! Precedence between `_id` and the compatibility alias `id`:
//! - a valid hex `_id` string is converted in place
//! - a valid hex `id` string is always removed; it becomes `_id` only when
//!   the filter has no `_id` of its own
//! - an `id` that is not a valid hex string is an ordinary field and stays

use bson::{oid::ObjectId, Bson, Document};

/// The store's identifier field
pub const ID_FIELD: &str = "_id";

/// Compatibility alias used by older portfolio payloads
pub const ALIAS_FIELD: &str = "id";

/// Parse a value as a native identifier if it is a 24-digit hex string
pub fn as_object_id(value: &Bson) -> Option<ObjectId> {
    match value {
        Bson::String(s) => ObjectId::parse_str(s).ok(),
        _ => None,
    }
}

/// Normalize a filter. Pure, and never fails: malformed identifiers are
/// passed through and simply match nothing downstream.
pub fn normalize_filter(filter: &Document) -> Document {
    let mut prepared = filter.clone();

    if let Some(oid) = prepared.get(ID_FIELD).and_then(as_object_id) {
        prepared.insert(ID_FIELD, oid);
    }

    if let Some(oid) = prepared.get(ALIAS_FIELD).and_then(as_object_id) {
        prepared.remove(ALIAS_FIELD);
        if !prepared.contains_key(ID_FIELD) {
            prepared.insert(ID_FIELD, oid);
        }
    }

    prepared
}

/// Remove the compatibility alias from a payload so it cannot collide with
/// the store-assigned identifier
pub fn strip_alias(mut data: Document) -> Document {
    data.remove(ALIAS_FIELD);
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    const HEX: &str = "64b7f0c2a1b2c3d4e5f60718";

    fn oid() -> ObjectId {
        ObjectId::parse_str(HEX).unwrap()
    }

    #[test]
    fn test_hex_id_becomes_object_id() {
        let normalized = normalize_filter(&doc! { "_id": HEX, "title": "A" });
        assert_eq!(normalized, doc! { "_id": oid(), "title": "A" });
    }

    #[test]
    fn test_non_hex_ids_pass_through() {
        for value in [
            Bson::String("not-an-id".into()),
            Bson::String("64b7f0c2a1b2c3d4e5f6071".into()),
            Bson::String("zzb7f0c2a1b2c3d4e5f60718".into()),
            Bson::Int32(7),
            Bson::Null,
        ] {
            let filter = doc! { "_id": value.clone() };
            assert_eq!(normalize_filter(&filter), filter, "value {:?}", value);
        }
    }

    #[test]
    fn test_existing_object_id_is_unchanged() {
        let filter = doc! { "_id": oid() };
        assert_eq!(normalize_filter(&filter), filter);
    }

    #[test]
    fn test_alias_becomes_id() {
        let normalized = normalize_filter(&doc! { "id": HEX });
        assert_eq!(normalized, doc! { "_id": oid() });
    }

    #[test]
    fn test_explicit_id_wins_over_alias() {
        let other = "650000000000000000000001";
        let normalized = normalize_filter(&doc! { "_id": HEX, "id": other });

        assert_eq!(normalized, doc! { "_id": oid() });
    }

    #[test]
    fn test_non_hex_alias_is_a_plain_field() {
        let filter = doc! { "id": 1, "title": "A" };
        assert_eq!(normalize_filter(&filter), filter);
    }

    #[test]
    fn test_strip_alias() {
        let data = strip_alias(doc! { "id": 1, "title": "A" });
        assert_eq!(data, doc! { "title": "A" });
    }
}
