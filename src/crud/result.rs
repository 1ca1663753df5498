//! # Operation Results
//!
//! Uniform result shapes returned by the CRUD layer, serialized with the
//! camelCase keys the admin panel reads.

use bson::{Bson, Document};
use serde::Serialize;
use serde_json::Value;

use crate::document::{document_to_json, serialize_bson};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub message: String,
    #[serde(serialize_with = "serialize_bson")]
    pub inserted_id: Bson,
}

impl InsertResult {
    pub fn new(inserted_id: Bson) -> Self {
        Self {
            message: "Document inserted successfully".to_string(),
            inserted_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub message: String,
    pub modified_count: u64,
    pub matched_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            message: "Document updated successfully".to_string(),
            modified_count,
            matched_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub message: String,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            message: "Document deleted successfully".to_string(),
            deleted_count,
        }
    }
}

/// Output of a routed request, one variant per verb
#[derive(Debug, Clone, PartialEq)]
pub enum RouterOutput {
    Documents(Vec<Document>),
    Inserted(InsertResult),
    Updated(UpdateResult),
    Deleted(DeleteResult),
}

impl RouterOutput {
    /// JSON body for the HTTP layer
    pub fn to_json(&self) -> Value {
        match self {
            RouterOutput::Documents(docs) => {
                Value::Array(docs.iter().map(document_to_json).collect())
            }
            RouterOutput::Inserted(r) => serde_json::to_value(r).unwrap_or(Value::Null),
            RouterOutput::Updated(r) => serde_json::to_value(r).unwrap_or(Value::Null),
            RouterOutput::Deleted(r) => serde_json::to_value(r).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn test_insert_result_serialization() {
        let oid = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap();
        let json = serde_json::to_value(InsertResult::new(Bson::ObjectId(oid))).unwrap();

        assert_eq!(
            json,
            json!({
                "message": "Document inserted successfully",
                "insertedId": "64b7f0c2a1b2c3d4e5f60718"
            })
        );
    }

    #[test]
    fn test_update_result_serialization() {
        let json = serde_json::to_value(UpdateResult::new(1, 0)).unwrap();
        assert_eq!(json["matchedCount"], 1);
        assert_eq!(json["modifiedCount"], 0);
    }

    #[test]
    fn test_documents_output() {
        let output = RouterOutput::Documents(vec![doc! { "title": "A" }]);
        assert_eq!(output.to_json(), json!([{"title": "A"}]));
    }
}
