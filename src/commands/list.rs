//! List posts, with "load more" continuation

use anyhow::Result;
use std::io::Write;
use std::num::NonZeroUsize;

use super::OutputFormat;
use crate::content::PostSummary;
use crate::helpers::{format_optional_date, truncate};
use crate::pagination::{Feed, Page};
use crate::preview::PreviewContext;
use crate::source::ContentSource;
use crate::Spacetraveling;

/// Print the first listing page, or every page when `all` is set
pub async fn run<S: ContentSource, W: Write>(
    site: &Spacetraveling<S>,
    page_size: NonZeroUsize,
    all: bool,
    preview: &PreviewContext,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let mut feed: Feed<PostSummary> = site.list_posts(page_size, preview).await?.into();

    if all {
        while feed.has_more() {
            let page = site.next_posts_page(feed.next_cursor(), preview).await?;
            tracing::debug!("Loaded {} more posts", page.results.len());
            feed = feed.append(page);
        }
    }

    print_feed(site, &feed, preview, format, out)
}

/// Print the page that follows `cursor`
pub async fn more<S: ContentSource, W: Write>(
    site: &Spacetraveling<S>,
    cursor: &str,
    preview: &PreviewContext,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let page: Page<PostSummary> = site.next_posts_page(Some(cursor), preview).await?;
    print_feed(site, &page.into(), preview, format, out)
}

fn print_feed<S, W: Write>(
    site: &Spacetraveling<S>,
    feed: &Feed<PostSummary>,
    preview: &PreviewContext,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, feed)?;
        writeln!(out)?;
        return Ok(());
    }

    let config = &site.config;

    if preview.is_preview {
        writeln!(out, "[preview] {}", preview.content_ref().unwrap_or("published"))?;
    }

    if feed.is_empty() {
        writeln!(out, "No posts.")?;
        return Ok(());
    }

    writeln!(out, "Posts ({}):", feed.len())?;
    for post in feed.items() {
        writeln!(
            out,
            "  {} - {} [{}]",
            format_optional_date(
                post.published_at.as_ref(),
                &config.date_format,
                &config.language
            ),
            post.title,
            post.uid
        )?;
        if !post.subtitle.is_empty() || !post.author.is_empty() {
            writeln!(
                out,
                "      {} ({})",
                truncate(&post.subtitle, 72, None),
                post.author
            )?;
        }
    }

    match feed.next_cursor() {
        Some(cursor) => writeln!(out, "More posts: {}", cursor)?,
        None => writeln!(out, "No more posts.")?,
    }

    Ok(())
}
