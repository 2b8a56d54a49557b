//! Raw documents as returned by the content source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document record whose `data` schema belongs to the content source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    /// Upstream document id
    pub id: Option<String>,

    /// Human-readable identity used in URLs
    pub uid: Option<String>,

    /// Document type
    #[serde(rename = "type")]
    pub doc_type: Option<String>,

    pub first_publication_date: Option<String>,

    pub last_publication_date: Option<String>,

    /// Custom fields
    pub data: Value,
}

impl RawRecord {
    /// Look up a custom field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name).filter(|v| !v.is_null())
    }

    /// Parsed first publication timestamp
    pub fn first_published_at(&self) -> Option<DateTime<Utc>> {
        self.first_publication_date
            .as_deref()
            .and_then(|s| parse_timestamp_logged(s, "first_publication_date"))
    }

    /// Parsed last publication timestamp
    pub fn last_published_at(&self) -> Option<DateTime<Utc>> {
        self.last_publication_date
            .as_deref()
            .and_then(|s| parse_timestamp_logged(s, "last_publication_date"))
    }
}

fn parse_timestamp_logged(s: &str, field: &str) -> Option<DateTime<Utc>> {
    let parsed = parse_timestamp(s);
    if parsed.is_none() {
        tracing::warn!("Ignoring unparseable {}: {:?}", field, s);
    }
    parsed
}

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339 and the colon-less offset form (`2021-03-25T19:25:28+0000`).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z"];
    for fmt in formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(parse_timestamp("2021-03-25T19:25:28+0000"), Some(expected));
        assert_eq!(parse_timestamp("2021-03-25T19:25:28+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-03-25T16:25:28-0300"), Some(expected));
        assert_eq!(parse_timestamp("2021-03-25T19:25:28Z"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_deserialize_record() {
        let record: RawRecord = serde_json::from_value(json!({
            "id": "YF1",
            "uid": "como-utilizar-hooks",
            "type": "posts",
            "first_publication_date": "2021-03-15T19:25:28+0000",
            "last_publication_date": null,
            "data": { "title": "Como utilizar Hooks", "subtitle": null }
        }))
        .unwrap();

        assert_eq!(record.uid.as_deref(), Some("como-utilizar-hooks"));
        assert_eq!(record.doc_type.as_deref(), Some("posts"));
        assert!(record.first_published_at().is_some());
        assert!(record.last_published_at().is_none());
        assert!(record.field("title").is_some());
        assert!(record.field("subtitle").is_none());
        assert!(record.field("author").is_none());
    }

    #[test]
    fn test_deserialize_record_without_data() {
        let record: RawRecord = serde_json::from_value(json!({ "uid": "bare" })).unwrap();
        assert_eq!(record.data, Value::Null);
        assert!(record.field("title").is_none());
    }
}
