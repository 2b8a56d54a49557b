//! Shared test fixtures.
//!
//! The fixture series is five `posts` documents `p1`..`p5`, published one
//! day apart with `p1` the oldest, stored in publication order.

use serde_json::json;

use crate::content::RawRecord;
use crate::source::MemorySource;

/// Build a raw `posts` document
pub fn post_record(index: usize) -> RawRecord {
    serde_json::from_value(json!({
        "id": format!("doc-{}", index),
        "uid": format!("p{}", index),
        "type": "posts",
        "first_publication_date": format!("2021-03-{:02}T12:00:00+0000", 10 + index),
        "last_publication_date": format!("2021-04-{:02}T12:00:00+0000", 10 + index),
        "data": {
            "title": format!("Post {}", index),
            "subtitle": format!("Subtitle {}", index),
            "author": "Joseph Oliveira",
            "banner": { "url": format!("https://images.example/{}.png", index) },
            "content": [
                {
                    "heading": "Intro",
                    "body": [{ "type": "paragraph", "text": "Lorem ipsum dolor", "spans": [] }]
                }
            ]
        }
    }))
    .unwrap()
}

/// The five-post series
pub fn five_posts() -> Vec<RawRecord> {
    (1..=5).map(post_record).collect()
}

/// A memory source holding the five-post series
pub fn five_post_source() -> MemorySource {
    MemorySource::new(five_posts())
}
