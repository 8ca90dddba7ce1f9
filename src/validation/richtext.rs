//! Rich-text tree walking.
//!
//! Rich-text values are node trees: every node carries a `type`, text
//! leaves carry `text`, container nodes nest children under `content`, and
//! embedded reference nodes of type `reference` carry the pointer under
//! `data` (`recordId`, `contentType`). This module extracts the plain text
//! for the search index and collects embedded reference pointers for the
//! engine to validate.

use serde_json::Value;

/// A reference pointer embedded in a rich-text tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextReference {
    pub record_id: String,
    pub content_type: String,
}

/// Collect the text of every text-bearing node, in document order.
pub fn text_segments(tree: &Value, out: &mut Vec<String>) {
    match tree {
        Value::Object(map) => {
            if let Some(Value::String(text)) = map.get("text") {
                if !text.is_empty() {
                    out.push(text.clone());
                }
            }
            if let Some(Value::Array(children)) = map.get("content") {
                for child in children {
                    text_segments(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                text_segments(item, out);
            }
        }
        _ => {}
    }
}

/// Collect every embedded reference node's pointer, in document order.
/// Nodes without a usable `recordId` are skipped; the engine treats them as
/// structurally absent.
pub fn reference_pointers(tree: &Value, out: &mut Vec<RichTextReference>) {
    match tree {
        Value::Object(map) => {
            if map.get("type").and_then(Value::as_str) == Some("reference") {
                let data = map.get("data");
                let record_id = data
                    .and_then(|d| d.get("recordId"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if !record_id.is_empty() {
                    let content_type = data
                        .and_then(|d| d.get("contentType"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    out.push(RichTextReference {
                        record_id: record_id.to_string(),
                        content_type: content_type.to_string(),
                    });
                }
            }
            if let Some(Value::Array(children)) = map.get("content") {
                for child in children {
                    reference_pointers(child, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                reference_pointers(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "type": "doc",
            "content": [
                {
                    "type": "paragraph",
                    "content": [
                        { "type": "text", "text": "Hello" },
                        { "type": "text", "text": " " },
                        { "type": "text", "text": "World" }
                    ]
                },
                {
                    "type": "reference",
                    "data": { "recordId": "r9", "contentType": "article" }
                }
            ]
        })
    }

    #[test]
    fn test_text_extraction_in_document_order() {
        let mut segments = Vec::new();
        text_segments(&document(), &mut segments);
        assert_eq!(segments, vec!["Hello", " ", "World"]);
    }

    #[test]
    fn test_reference_pointer_collection() {
        let mut refs = Vec::new();
        reference_pointers(&document(), &mut refs);
        assert_eq!(
            refs,
            vec![RichTextReference {
                record_id: "r9".into(),
                content_type: "article".into(),
            }]
        );
    }

    #[test]
    fn test_reference_without_record_id_is_skipped() {
        let tree = json!({ "type": "reference", "data": {} });
        let mut refs = Vec::new();
        reference_pointers(&tree, &mut refs);
        assert!(refs.is_empty());
    }
}
