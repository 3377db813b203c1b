//! CLI entry point for devlog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devlog")]
#[command(author = "Yukang Chen")]
#[command(version = "0.1.0")]
#[command(about = "A fast client for markdown blog sites", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all posts
    #[command(alias = "ls")]
    List {
        /// Sort newest-first instead of manifest order
        #[arg(short, long)]
        recent: bool,
    },

    /// Render a post to HTML
    Show {
        /// Post id (defaults to the first post)
        id: Option<u64>,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search posts by title and content
    Search {
        /// The search query
        query: String,

        /// Match title/summary/date only, without fetching content
        #[arg(short, long)]
        metadata: bool,
    },

    /// Print the post timeline grouped by year
    Timeline,

    /// Toggle the heart on a post
    Like {
        /// Post id
        id: u64,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devlog_rs=debug,info"
    } else {
        "devlog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());
    let viewer = devlog_rs::Viewer::new(&base_dir)?;

    match cli.command {
        Commands::List { recent } => {
            devlog_rs::commands::list::run(&viewer, recent).await?;
        }

        Commands::Show { id, output } => {
            devlog_rs::commands::show::run(&viewer, id, output.as_deref()).await?;
        }

        Commands::Search { query, metadata } => {
            devlog_rs::commands::search::run(&viewer, &query, metadata).await?;
        }

        Commands::Timeline => {
            devlog_rs::commands::timeline::run(&viewer).await?;
        }

        Commands::Like { id } => {
            devlog_rs::commands::like::run(&viewer, id).await?;
        }

        Commands::Version => {
            println!("devlog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
