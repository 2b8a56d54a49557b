//! Normalizes raw content-source records into post models

use serde_json::Value;

use super::{ContentBlock, NavPost, PostDetail, PostSummary, RawRecord, RichText};
use crate::error::{ContentError, Result};

/// Map a raw record to a listing summary.
///
/// Only `uid` is mandatory; every other field degrades to an empty value.
pub fn map_summary(record: &RawRecord) -> Result<PostSummary> {
    let uid = required_uid(record)?;

    Ok(PostSummary {
        uid,
        published_at: record.first_published_at(),
        title: text_field(record, "title"),
        subtitle: text_field(record, "subtitle"),
        author: text_field(record, "author"),
    })
}

/// Map a raw record to a full post
pub fn map_detail(record: &RawRecord) -> Result<PostDetail> {
    let summary = map_summary(record)?;

    let id = record
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| summary.uid.clone());

    let banner_url = record
        .field("banner")
        .and_then(|banner| banner.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let content = match record.field("content") {
        Some(Value::Array(blocks)) => blocks.iter().map(map_block).collect(),
        _ => Vec::new(),
    };

    Ok(PostDetail {
        summary,
        id,
        banner_url,
        content,
        last_published_at: record.last_published_at(),
    })
}

/// Map a raw record to a neighbor link
pub fn map_nav_post(record: &RawRecord) -> Result<NavPost> {
    Ok(NavPost {
        uid: required_uid(record)?,
        title: text_field(record, "title"),
    })
}

fn required_uid(record: &RawRecord) -> Result<String> {
    match record.uid.as_deref().map(str::trim) {
        Some(uid) if !uid.is_empty() => Ok(uid.to_string()),
        _ => Err(ContentError::MalformedRecord(format!(
            "record {} has no uid",
            record.id.as_deref().unwrap_or("<unknown id>")
        ))),
    }
}

fn map_block(value: &Value) -> ContentBlock {
    ContentBlock {
        heading: value.get("heading").map(value_as_text).unwrap_or_default(),
        body: value
            .get("body")
            .map(RichText::from_value)
            .unwrap_or_default(),
    }
}

fn text_field(record: &RawRecord, name: &str) -> String {
    record.field(name).map(value_as_text).unwrap_or_default()
}

/// Plain fields arrive as strings, title-like fields sometimes as rich text
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) => RichText::from_value(value).as_text(),
        _ => String::new(),
    }
}
