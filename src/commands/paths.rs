//! List the post paths prebuilt at build time

use anyhow::Result;
use std::io::Write;

use super::OutputFormat;
use crate::source::ContentSource;
use crate::{Fallback, Spacetraveling};

pub async fn run<S: ContentSource, W: Write>(
    site: &Spacetraveling<S>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let paths = site.resolve_all_known_post_ids().await?;

    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, &paths)?;
        writeln!(out)?;
        return Ok(());
    }

    for uid in &paths.uids {
        writeln!(out, "/post/{}", uid)?;
    }
    match paths.fallback {
        Fallback::OnDemand => writeln!(out, "Other posts are generated on demand.")?,
    }

    Ok(())
}
