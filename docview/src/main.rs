//! docview - viewer for generated repository documentation
//!
//! Segments one long markdown document into a navigable section hierarchy
//! and renders section bodies into paragraphs, code blocks and diagrams.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]
#![allow(dead_code)]

mod cli;
mod config;
mod doc_store;
mod document_model;
mod segmenter;

// Block-mode rendering (line classifier, renderer, inline markup)
mod content;

// Viewer page and diagram hand-off
mod diagram;
mod viewer;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, SourceArgs};
use config::ViewerConfig;
use content::ContentBlock;
use doc_store::DocStore;
use document_model::Document;
use std::path::{Path, PathBuf};

/// Main entry point for the docview CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ViewerConfig::discover(cli.config.as_deref(), Path::new("."))
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Outline {
            source,
            json,
            with_content,
        } => {
            let doc = load_document(&source, &config)?;
            handle_outline_command(&doc, json, with_content)?;
        }

        Commands::Render {
            source,
            section,
            json,
        } => {
            let doc = load_document(&source, &config)?;
            handle_render_command(&doc, &section, json, &config)?;
        }

        Commands::View {
            source,
            output,
            section,
            no_sidebar,
        } => {
            let doc = load_document(&source, &config)?;
            handle_view_command(&doc, &output, section, no_sidebar, &config)?;
        }

        Commands::Stats { source } => {
            let doc = load_document(&source, &config)?;
            handle_stats_command(&doc, &config);
        }

        Commands::List { docs_dir } => {
            handle_list_command(docs_dir.as_deref().unwrap_or(&config.docs_dir))?;
        }
    }

    Ok(())
}

/// Initialize logging; `RUST_LOG` applies unless verbose raises it to info
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Read the raw document and segment it
fn load_document(source: &SourceArgs, config: &ViewerConfig) -> Result<Document> {
    let raw = match (&source.input, &source.repo) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document {}", path.display()))?,
        (None, Some(repo)) => {
            let docs_dir: PathBuf = source
                .docs_dir
                .clone()
                .unwrap_or_else(|| config.docs_dir.clone());
            DocStore::new(&docs_dir)
                .read_latest(repo)
                .with_context(|| format!("Failed to load documentation for '{}'", repo))?
        }
        (None, None) => anyhow::bail!("Either an INPUT file or --repo is required"),
    };

    let doc = segmenter::segment_with(&raw, &config.segment_options());
    log::info!(
        "Loaded '{}' with {} section(s)",
        doc.title,
        doc.sections.len()
    );
    Ok(doc)
}

/// Handle the outline command
fn handle_outline_command(doc: &Document, json: bool, with_content: bool) -> Result<()> {
    if json {
        let value = if with_content {
            serde_json::to_value(doc)?
        } else {
            serde_json::json!({
                "title": doc.title,
                "sections": doc
                    .sections
                    .iter()
                    .map(|s| serde_json::json!({ "id": s.id, "title": s.title, "level": s.level }))
                    .collect::<Vec<_>>(),
            })
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", doc.title);
    if doc.is_empty() {
        println!("No sections found");
        return Ok(());
    }

    for section in &doc.sections {
        println!(
            "{}{}  {}",
            "  ".repeat(section.level),
            section.id,
            section.title
        );
    }

    Ok(())
}

/// Handle the render command
fn handle_render_command(
    doc: &Document,
    section_id: &str,
    json: bool,
    config: &ViewerConfig,
) -> Result<()> {
    let section = doc.section(section_id).with_context(|| {
        format!(
            "Section '{}' not found (document has {} sections). Run 'docview outline' to see section ids",
            section_id,
            doc.sections.len()
        )
    })?;

    let blocks = content::render_with(&section.content, &config.render_options());

    if json {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
        return Ok(());
    }

    println!("{} ({})", section.title, section.id);
    if blocks.is_empty() {
        println!("  (empty section)");
    }
    for (index, block) in blocks.iter().enumerate() {
        println!("{:>4}  {}", index + 1, describe_block(block));
    }

    Ok(())
}

/// One-line description of a block
fn describe_block(block: &ContentBlock) -> String {
    let detail = match block {
        ContentBlock::Paragraph { source, .. } => {
            let preview: String = source.chars().take(60).collect();
            let ellipsis = if source.chars().count() > 60 { "..." } else { "" };
            format!("{}{}", preview.replace('\n', " "), ellipsis)
        }
        ContentBlock::Code { language, .. } => format!(
            "[{}] {} line(s)",
            language.as_deref().unwrap_or("plain"),
            block.line_count()
        ),
        ContentBlock::Diagram { .. } => format!("{} line(s)", block.line_count()),
    };
    format!("{:<10} {}", block.kind_name(), detail)
}

/// Handle the view command
fn handle_view_command(
    doc: &Document,
    output: &Path,
    section: Option<String>,
    no_sidebar: bool,
    config: &ViewerConfig,
) -> Result<()> {
    let state = viewer::ViewState {
        selected_section: section,
        sidebar_visible: !no_sidebar,
    };
    let engine = diagram::MermaidEngine::new(config.mermaid_script_url.clone());

    viewer::to_html(doc, &state, &config.render_options(), &engine, output)
        .with_context(|| format!("Failed to write viewer page to {}", output.display()))?;

    println!("✓ Successfully wrote: {}", output.display());
    Ok(())
}

/// Handle the stats command
fn handle_stats_command(doc: &Document, config: &ViewerConfig) {
    let rendered = content::render_sections(&doc.sections, &config.render_options());

    let mut paragraphs = 0;
    let mut code_blocks = 0;
    let mut diagrams = 0;
    for block in rendered.iter().flatten() {
        match block {
            ContentBlock::Paragraph { .. } => paragraphs += 1,
            ContentBlock::Code { .. } => code_blocks += 1,
            ContentBlock::Diagram { .. } => diagrams += 1,
        }
    }

    println!("{}", doc.title);
    println!("  - {} sections", doc.sections.len());
    println!("  - {} paragraphs", paragraphs);
    println!("  - {} code blocks", code_blocks);
    println!("  - {} diagrams", diagrams);
    println!("  - {} words", doc.word_count());
}

/// Handle the list command
fn handle_list_command(docs_dir: &Path) -> Result<()> {
    let store = DocStore::new(docs_dir);
    let listing = store
        .list()
        .with_context(|| format!("Failed to list documentation in {}", docs_dir.display()))?;

    if listing.is_empty() {
        println!("No stored documentation in {}", store.repos_dir().display());
        return Ok(());
    }

    for repo in listing {
        println!("{} ({} version(s))", repo.repo, repo.docs.len());
        for doc in &repo.docs {
            println!("  {}  {}", doc.timestamp, doc.path.display());
        }
    }

    Ok(())
}
