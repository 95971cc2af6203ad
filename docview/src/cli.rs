//! Command-line interface definitions for docview

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the docview application
#[derive(Parser)]
#[command(name = "docview")]
#[command(version)]
#[command(about = "Navigate and render generated repository documentation", long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./docview.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read the markdown document from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Markdown document to read
    #[arg(value_name = "INPUT", required_unless_present = "repo", conflicts_with = "repo")]
    pub input: Option<PathBuf>,

    /// Read the latest stored document of this repository instead
    #[arg(long)]
    pub repo: Option<String>,

    /// Documentation store directory (overrides the configuration)
    #[arg(long, value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,
}

/// Available subcommands for docview
#[derive(Subcommand)]
pub enum Commands {
    /// Print the document title and section hierarchy
    Outline {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of an indented tree
        #[arg(long)]
        json: bool,

        /// Include section bodies in JSON output
        #[arg(long, requires = "json")]
        with_content: bool,
    },

    /// Render one section into content blocks
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Id of the section to render (see `outline`)
        #[arg(short, long)]
        section: String,

        /// Print the blocks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a standalone HTML viewer page
    View {
        #[command(flatten)]
        source: SourceArgs,

        /// Output HTML file
        #[arg(short, long, default_value = "docview.html")]
        output: PathBuf,

        /// Only show this section
        #[arg(short, long)]
        section: Option<String>,

        /// Hide the navigation sidebar
        #[arg(long)]
        no_sidebar: bool,
    },

    /// Print section and block totals for a document
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List stored documentation per repository
    List {
        /// Documentation store directory (overrides the configuration)
        #[arg(long, value_name = "DIR")]
        docs_dir: Option<PathBuf>,
    },
}
