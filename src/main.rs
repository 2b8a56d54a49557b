//! CLI entry point for spacetraveling

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spacetraveling::commands::{self, OutputFormat};
use spacetraveling::config::SiteConfig;
use spacetraveling::preview::PreviewContext;
use spacetraveling::source::{ContentSource, HttpSource, MemorySource};
use spacetraveling::Spacetraveling;

#[derive(Parser)]
#[command(name = "spacetraveling")]
#[command(version)]
#[command(about = "Read the Spacetraveling blog from its headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Read draft content (requires --ref)
    #[arg(long, global = true)]
    preview: bool,

    /// Preview reference token
    #[arg(long = "ref", global = true)]
    reference: Option<String>,

    /// Read documents from a JSON fixture instead of the API
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts
    #[command(alias = "ls")]
    List {
        /// Posts per page (defaults to the configured page_size)
        #[arg(short, long)]
        page_size: Option<NonZeroUsize>,

        /// Keep loading pages until the end
        #[arg(short, long)]
        all: bool,
    },

    /// Load the page following a cursor
    More {
        /// Cursor printed by a previous list
        cursor: String,
    },

    /// Show a post
    Show {
        /// Post uid
        uid: String,
    },

    /// List the post paths prebuilt at build time
    Paths,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "spacetraveling=debug,info"
    } else {
        "spacetraveling=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Nothing else needs config or a connection
    if let Commands::Version = cli.command {
        return print_version(&mut std::io::stdout().lock());
    }

    // Determine base directory
    let base_dir = match cli.cwd.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let config = SiteConfig::load_from_dir(&base_dir)?;

    match cli.fixture.clone() {
        Some(path) => {
            let path = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
            tracing::debug!("Reading fixture {:?}", path);
            let source = MemorySource::load(&path)?;
            dispatch(&cli, Spacetraveling::new(config, source)).await
        }
        None => {
            let source = HttpSource::connect(&config.api_endpoint, config.access_token.as_deref())
                .await
                .with_context(|| format!("Failed to connect to {}", config.api_endpoint))?;
            tracing::debug!("Master ref: {}", source.master_ref());
            dispatch(&cli, Spacetraveling::new(config, source)).await
        }
    }
}

async fn dispatch<S: ContentSource>(cli: &Cli, site: Spacetraveling<S>) -> Result<()> {
    let preview = PreviewContext::from_flags(cli.preview, cli.reference.clone());
    if preview.is_preview && preview.content_ref().is_none() {
        tracing::warn!("--preview without --ref; reading published content");
    }

    let format = OutputFormat::from_json_flag(cli.json);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::List { page_size, all } => {
            let page_size = page_size.unwrap_or(site.config.page_size);
            commands::list::run(&site, page_size, *all, &preview, format, &mut out).await?;
        }

        Commands::More { cursor } => {
            commands::list::more(&site, cursor, &preview, format, &mut out).await?;
        }

        Commands::Show { uid } => {
            commands::show::run(&site, uid, &preview, format, &mut out).await?;
        }

        Commands::Paths => {
            commands::paths::run(&site, format, &mut out).await?;
        }

        Commands::Version => print_version(&mut out)?,
    }

    out.flush()?;
    Ok(())
}

fn print_version<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "spacetraveling {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
