use serde_json::{Map, Value};

use crate::document::Document;

/// Name of the identifier field in the externally visible form.
pub const PUBLIC_ID_FIELD: &str = "id";

/// Map a stored document to its external view.
///
/// All fields are copied; the native `_id` is dropped and replaced with a
/// string `id` holding its encoded form. The stored document is untouched.
/// No document in, no view out.
pub fn serialize(doc: Option<&Document>) -> Option<Map<String, Value>> {
    let doc = doc?;
    let mut view = doc.fields.clone();
    if let Some(id) = doc.id {
        view.insert(PUBLIC_ID_FIELD.to_string(), Value::String(id.to_hex()));
    }
    Some(view)
}

/// Serialize a list of stored documents into JSON objects.
pub fn serialize_all(docs: &[Document]) -> Vec<Value> {
    docs.iter()
        .filter_map(|doc| serialize(Some(doc)))
        .map(Value::Object)
        .collect()
}
