//! Helper functions shared by the content pipeline and the CLI output

mod date;
mod html;

pub use date::*;
pub use html::*;
