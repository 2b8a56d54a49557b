//! Structured rich text as delivered by the content source

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One node of a structured rich-text field (paragraph, heading, list item...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextNode {
    /// Node kind, e.g. `paragraph`
    #[serde(rename = "type")]
    pub kind: String,

    /// Text content, which may still contain inline markup
    pub text: String,

    /// Formatting spans, kept opaque
    pub spans: Vec<Value>,
}

impl TextNode {
    /// Create a paragraph node
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.into(),
            spans: Vec::new(),
        }
    }
}

/// An ordered sequence of rich-text nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<TextNode>);

impl RichText {
    /// Build rich text from an arbitrary JSON value.
    ///
    /// Arrays of node objects are the normal shape; a bare string becomes a
    /// single paragraph. Anything else is treated as empty.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => RichText(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(TextNode::paragraph(s.as_str())),
                        Value::Object(_) => serde_json::from_value(item.clone()).ok(),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::String(s) => RichText(vec![TextNode::paragraph(s.as_str())]),
            _ => RichText::default(),
        }
    }

    /// Concatenate the text of every node, separated by a space
    pub fn as_text(&self) -> String {
        self.0
            .iter()
            .map(|node| node.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|node| node.text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_node_array() {
        let value = json!([
            { "type": "paragraph", "text": "First paragraph", "spans": [] },
            { "type": "heading2", "text": "Second", "spans": [{ "start": 0, "end": 6, "type": "strong" }] }
        ]);
        let rich = RichText::from_value(&value);
        assert_eq!(rich.0.len(), 2);
        assert_eq!(rich.0[1].kind, "heading2");
        assert_eq!(rich.as_text(), "First paragraph Second");
    }

    #[test]
    fn test_from_plain_string() {
        let rich = RichText::from_value(&json!("Just text"));
        assert_eq!(rich.as_text(), "Just text");
    }

    #[test]
    fn test_from_unexpected_shape() {
        assert!(RichText::from_value(&json!(42)).is_empty());
        assert!(RichText::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn test_nodes_missing_fields_default() {
        let rich = RichText::from_value(&json!([{ "text": "no type" }, {}]));
        assert_eq!(rich.0.len(), 2);
        assert_eq!(rich.as_text(), "no type");
    }
}
