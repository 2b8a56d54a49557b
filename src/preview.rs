//! Preview reconciliation - chooses the content revision a generation pass reads

use serde::{Deserialize, Serialize};

/// Preview state of one generation pass.
///
/// Built once from the incoming request and passed by reference into every
/// content query of that pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewContext {
    pub is_preview: bool,
    pub reference: Option<String>,
}

impl PreviewContext {
    /// A normal build against published content
    pub fn published() -> Self {
        Self::default()
    }

    /// A preview build against the draft revision `reference`
    pub fn preview(reference: impl Into<String>) -> Self {
        Self {
            is_preview: true,
            reference: Some(reference.into()),
        }
    }

    /// Build from request flags, as the CLI receives them
    pub fn from_flags(is_preview: bool, reference: Option<String>) -> Self {
        Self {
            is_preview,
            reference,
        }
    }

    /// See [`resolve_ref`]
    pub fn content_ref(&self) -> Option<&str> {
        resolve_ref(self)
    }
}

/// Content reference every query of the pass must target.
///
/// `None` selects the published (master) revision. A reference is only used
/// when the pass is a preview; a blank reference counts as absent.
pub fn resolve_ref(context: &PreviewContext) -> Option<&str> {
    if !context.is_preview {
        return None;
    }
    context
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
}
