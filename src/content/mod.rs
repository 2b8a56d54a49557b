//! Content module - post models, record mapping and derived metadata

pub mod mapper;
mod post;
pub mod reading;
mod record;
mod richtext;

pub use mapper::{map_detail, map_nav_post, map_summary};
pub use post::{
    BlockIndex, ContentBlock, NavPost, NavigationLinks, PostDetail, PostSummary, PostView,
};
pub use reading::reading_minutes;
pub use record::{parse_timestamp, RawRecord};
pub use richtext::{RichText, TextNode};
