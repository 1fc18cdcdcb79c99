//! Kind-checked parsing of boundary parameters.

use crate::document::{Document, ValueKind};
use crate::error::{DocumentError, DocumentResult};
use serde_json::Value;

fn parse_value(text: &str, param: &str) -> DocumentResult<Value> {
    serde_json::from_str(text).map_err(|e| DocumentError::malformed(param, e.to_string()))
}

/// Parses `text` and requires the top-level value to be a document.
///
/// `param` names the parameter being parsed and is carried into any error
/// produced, so the caller's diagnostic reads "filter must be a document"
/// rather than pointing at an anonymous string.
pub fn parse_document(text: &str, param: &str) -> DocumentResult<Document> {
    let value = parse_value(text, param)?;
    Document::from_value(value).map_err(|actual| DocumentError::WrongKind {
        param: param.into(),
        expected: ValueKind::Document,
        actual,
    })
}

/// Parses `text` and requires an array whose elements are all documents.
pub fn parse_document_array(text: &str, param: &str) -> DocumentResult<Vec<Document>> {
    let value = parse_value(text, param)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(DocumentError::WrongKind {
                param: param.into(),
                expected: ValueKind::Array,
                actual: ValueKind::of(&other),
            })
        }
    };

    let mut documents = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let doc = Document::from_value(item).map_err(|actual| DocumentError::WrongElementKind {
            param: param.into(),
            index,
            expected: ValueKind::Document,
            actual,
        })?;
        documents.push(doc);
    }
    Ok(documents)
}

/// Encodes a slice of documents as a JSON array in text form.
pub fn encode_documents(documents: &[Document]) -> String {
    let items: Vec<Value> = documents.iter().map(|d| d.clone().into_value()).collect();
    Value::Array(items).to_string()
}
