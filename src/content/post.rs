//! Post models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::RichText;

/// A post as shown in the home listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    /// Stable identity, used for links and as the list key
    pub uid: String,

    /// First publication date
    pub published_at: Option<DateTime<Utc>>,

    pub title: String,

    pub subtitle: String,

    pub author: String,
}

/// A full post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,

    /// Upstream document id, anchor for neighbor queries
    pub id: String,

    pub banner_url: String,

    /// Body sections in display order
    pub content: Vec<ContentBlock>,

    /// Last publication date
    pub last_published_at: Option<DateTime<Utc>>,
}

/// Position of a block inside a post's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockIndex(pub usize);

/// A headed section of a post body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    /// Display heading; not unique, not an identity
    pub heading: String,

    pub body: RichText,
}

impl PostDetail {
    pub fn uid(&self) -> &str {
        &self.summary.uid
    }

    pub fn title(&self) -> &str {
        &self.summary.title
    }

    /// DOM anchor the comment widget attaches to
    pub fn comment_anchor(&self) -> &str {
        &self.summary.uid
    }

    /// Iterate over content blocks with their positional identity
    pub fn blocks(&self) -> impl Iterator<Item = (BlockIndex, &ContentBlock)> {
        self.content
            .iter()
            .enumerate()
            .map(|(i, block)| (BlockIndex(i), block))
    }

    /// Look up a block by position
    pub fn block(&self, index: BlockIndex) -> Option<&ContentBlock> {
        self.content.get(index.0)
    }

    /// Unique anchor for a block, e.g. `2-proin-et-varius`
    pub fn block_anchor(&self, index: BlockIndex) -> Option<String> {
        let block = self.block(index)?;
        let heading = slug::slugify(&block.heading);
        if heading.is_empty() {
            Some(index.0.to_string())
        } else {
            Some(format!("{}-{}", index.0, heading))
        }
    }
}

/// A neighbor link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavPost {
    pub uid: String,
    pub title: String,
}

/// Chronological neighbors of a post; `None` at the ends of the series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationLinks {
    pub previous: Option<NavPost>,
    pub next: Option<NavPost>,
}

/// Everything a detail page needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub post: PostDetail,
    pub reading_minutes: u32,
    pub navigation: NavigationLinks,
}
