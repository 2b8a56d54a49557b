//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // An opening, closing or comment tag; a bare `<` in prose is not one
    static ref TAG: Regex =
        Regex::new(r"</?[A-Za-z!][^<>]*>").expect("tag regex should compile");
}

/// Strip HTML tags from a string.
///
/// Each tag is replaced by a single space so that text on either side of a
/// block boundary (`<p>one</p><p>two</p>`) does not fuse into one word.
pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, " ").into_owned()
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
