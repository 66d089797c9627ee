use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_types::{DocumentId, Schema};

use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;

/// Name of the internal identifier field in stored documents.
pub const ID_FIELD: &str = "_id";

/// A raw stored document: the store-assigned native id plus the fields
/// exactly as they were written.
///
/// Serializes flat, with the id under [`ID_FIELD`] in its native form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// A document that has not been stored yet.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { id: None, fields }
    }

    pub fn with_id(id: DocumentId, fields: Map<String, Value>) -> Self {
        Self {
            id: Some(id),
            fields,
        }
    }

    /// Serialize a schema value into document fields.
    pub fn fields_of<S: Schema>(value: &S) -> StoreResult<Map<String, Value>> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::InvalidDocument(format!(
                "{} must serialize to an object, got {other}",
                S::COLLECTION
            ))),
        }
    }

    /// Decode the fields back into a schema value.
    pub fn decode<S: Schema>(&self) -> StoreResult<S> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn matches(&self, filter: &Filter) -> bool {
        filter.matches(&self.fields)
    }
}

/// Reject field maps that try to set the store-owned id.
pub(crate) fn check_fields(fields: &Map<String, Value>) -> StoreResult<()> {
    if fields.contains_key(ID_FIELD) {
        return Err(StoreError::InvalidDocument(format!(
            "field {ID_FIELD:?} is assigned by the store"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storefront_types::Product;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn stored_form_is_flat_with_native_id() {
        let id = DocumentId::from_raw([1; 12]);
        let doc = Document::with_id(id, fields(json!({ "title": "Mug" })));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["title"], "Mug");
        assert!(value[ID_FIELD].is_array());

        let back: Document = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
        assert!(!back.fields.contains_key(ID_FIELD));
    }

    #[test]
    fn unstored_document_has_no_id_field() {
        let doc = Document::new(fields(json!({ "a": 1 })));
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get(ID_FIELD).is_none());
    }

    #[test]
    fn schema_fields_roundtrip_through_document() {
        let product = Product::new("Mug", 349.0, "Home");
        let doc = Document::new(Document::fields_of(&product).unwrap());
        assert_eq!(doc.get("category"), Some(&json!("Home")));
        assert_eq!(doc.decode::<Product>().unwrap(), product);
    }

    #[test]
    fn reserved_id_field_is_rejected() {
        let err = check_fields(&fields(json!({ "_id": "x" }))).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }
}
