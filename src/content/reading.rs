//! Reading time estimation

use super::{ContentBlock, RichText};
use crate::helpers::strip_html;

/// Reading speed used for estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Count the words of a rich-text body after removing inline markup
pub fn count_words(body: &RichText) -> usize {
    strip_html(&body.as_text()).split_whitespace().count()
}

/// Whole minutes needed to read one block, rounded up
pub fn block_minutes(block: &ContentBlock) -> u32 {
    if block.body.is_empty() {
        return 0;
    }
    let minutes = count_words(&block.body).div_ceil(WORDS_PER_MINUTE);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Estimated reading time of a post in minutes.
///
/// Each block is rounded up on its own and the block minutes are summed.
/// Headings are not counted.
pub fn reading_minutes(blocks: &[ContentBlock]) -> u32 {
    blocks
        .iter()
        .map(block_minutes)
        .fold(0u32, u32::saturating_add)
}
