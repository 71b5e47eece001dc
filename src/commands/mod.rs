mod render;
mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use citekit::Config;

/// Render cited assistant answers and resolve citations to their sources.
#[derive(Debug, Parser)]
#[command(name = "citekit", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a message JSON file to HTML (or plain text) with its citations
    Render {
        /// Message with `content` and the citation arrays
        message: PathBuf,
        /// Print wrapped plain text instead of HTML
        #[arg(long)]
        plain: bool,
        /// Print the rendered view as JSON
        #[arg(long, conflicts_with = "plain")]
        json: bool,
    },
    /// Resolve a citation id to the URL the viewer would load
    Resolve {
        /// Citation id, e.g. `doc42_7`
        citation_id: String,
        /// File name used to pick PDF, video or image handling
        #[arg(long)]
        file_name: Option<String>,
        /// Video timestamp (`H:MM:SS`, `MM:SS` or seconds)
        #[arg(long)]
        timestamp: Option<String>,
    },
}

pub async fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    match cli.command {
        Command::Render {
            message,
            plain,
            json,
        } => render::render(&message, plain, json),
        Command::Resolve {
            citation_id,
            file_name,
            timestamp,
        } => resolve::resolve(config, citation_id, file_name, timestamp).await,
    }
}
