//! Error types for content-source operations

use std::fmt;
use thiserror::Error;

/// Errors raised by the listing, detail and navigation pipeline
#[derive(Error, Debug)]
pub enum ContentError {
    /// A raw record lacks its mandatory identity field
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Transport failure, error status or undecodable upstream response
    #[error("content source unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Continuation requested past the end of the stream
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// No post with this identity exists at the resolved content reference
    #[error("{doc_type} '{uid}' not found")]
    NotFound { doc_type: String, uid: String },

    /// One or both neighbor queries failed
    #[error("navigation failed: {0}")]
    Navigation(NavigationFailure),
}

impl ContentError {
    /// Whether the caller may retry the whole operation later
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::UpstreamUnavailable(_) => true,
            Self::Navigation(failure) => failure.errors().any(ContentError::is_retryable),
            Self::MalformedRecord(_) | Self::InvalidCursor(_) | Self::NotFound { .. } => false,
        }
    }

    /// Whether the requested post does not exist (yet) at the resolved reference
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}

/// Outcome of a navigation lookup where at least one side failed.
///
/// Both sides are kept so a failure on one side never hides the other.
#[derive(Debug)]
pub struct NavigationFailure {
    pub previous: Option<Box<ContentError>>,
    pub next: Option<Box<ContentError>>,
}

impl NavigationFailure {
    /// Iterate over the errors that actually occurred
    pub fn errors(&self) -> impl Iterator<Item = &ContentError> {
        self.previous
            .iter()
            .chain(self.next.iter())
            .map(|err| err.as_ref())
    }
}

impl fmt::Display for NavigationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.previous, &self.next) {
            (Some(prev), Some(next)) => write!(f, "previous: {}; next: {}", prev, next),
            (Some(prev), None) => write!(f, "previous: {}", prev),
            (None, Some(next)) => write!(f, "next: {}", next),
            (None, None) => f.write_str("no error recorded"),
        }
    }
}

/// Result alias used across the library
pub type Result<T, E = ContentError> = std::result::Result<T, E>;
