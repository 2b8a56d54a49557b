//! Show a single post

use anyhow::Result;
use std::io::Write;

use super::OutputFormat;
use crate::content::{NavPost, PostView};
use crate::helpers::{format_optional_date, strip_html};
use crate::preview::PreviewContext;
use crate::source::ContentSource;
use crate::Spacetraveling;

/// Shown while a post outside the prebuilt set is still being generated
pub const PLACEHOLDER: &str = "Carregando...";

/// Print the post `uid` with its reading time and neighbors
pub async fn run<S: ContentSource, W: Write>(
    site: &Spacetraveling<S>,
    uid: &str,
    preview: &PreviewContext,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let view = match site.get_post_detail(uid, preview).await {
        Ok(view) => view,
        Err(e) if e.is_not_found() => {
            tracing::info!("Post {} is not generated yet; it is built on first request", uid);
            writeln!(out, "{}", PLACEHOLDER)?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &view)?;
            writeln!(out)?;
        }
        OutputFormat::Text => print_view(site, &view, preview, out)?,
    }

    Ok(())
}

fn print_view<S, W: Write>(
    site: &Spacetraveling<S>,
    view: &PostView,
    preview: &PreviewContext,
    out: &mut W,
) -> Result<()> {
    let config = &site.config;
    let post = &view.post;

    if preview.is_preview {
        writeln!(out, "[preview] {}", preview.content_ref().unwrap_or("published"))?;
    }

    writeln!(out, "{}", post.title())?;
    if !post.banner_url.is_empty() {
        writeln!(out, "Banner: {}", post.banner_url)?;
    }
    writeln!(
        out,
        "{} | {} | {} min",
        format_optional_date(
            post.summary.published_at.as_ref(),
            &config.date_format,
            &config.language
        ),
        post.summary.author,
        view.reading_minutes
    )?;
    for (index, block) in post.blocks() {
        writeln!(out)?;
        match post.block_anchor(index) {
            Some(anchor) => writeln!(out, "## {} (#{})", block.heading, anchor)?,
            None => writeln!(out, "## {}", block.heading)?,
        }
        for node in &block.body.0 {
            let text = strip_html(&node.text);
            let text = text.trim();
            if !text.is_empty() {
                writeln!(out, "{}", text)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Previous: {}", nav_label(&view.navigation.previous))?;
    writeln!(out, "Next: {}", nav_label(&view.navigation.next))?;
    writeln!(out, "Comments: #{}", post.comment_anchor())?;

    Ok(())
}

fn nav_label(link: &Option<NavPost>) -> String {
    match link {
        Some(post) => format!("{} [{}]", post.title, post.uid),
        None => "-".to_string(),
    }
}
