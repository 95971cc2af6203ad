//! HTML viewer for segmented documents
//!
//! This module writes a standalone HTML page with:
//! - A navigation sidebar with one entry per section, indented by level
//! - The selected section (or every section) rendered block by block
//! - Diagram blocks handed to a [`DiagramEngine`] under a unique surface id

use crate::content::{self, ContentBlock, RenderOptions};
use crate::diagram::{DiagramEngine, SurfaceIds};
use crate::document_model::{Document, Section};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// Block-level runs the inline transformer emits inside paragraph markup
static BLOCK_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<h[23]>.*?</h[23]>|(?:<li>.*?</li>)+").expect("block run pattern is valid")
});

/// Errors that can occur while building the viewer page
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Section '{id}' not found (document has {available} sections)")]
    UnknownSection { id: String, available: usize },
}

/// View state owned by the caller and passed into every page build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Section to display; `None` shows every section
    pub selected_section: Option<String>,
    /// Whether the navigation sidebar is shown
    pub sidebar_visible: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected_section: None,
            sidebar_visible: true,
        }
    }
}

/// Write the viewer page for a document
///
/// # Parameters
/// * `doc` - The segmented document
/// * `state` - Current view state
/// * `options` - Renderer options
/// * `engine` - Diagram engine receiving diagram blocks
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
/// * `Ok(())` - Successfully wrote the page
/// * `Err(ViewError)` - Unknown section or IO error
pub fn to_html(
    doc: &Document,
    state: &ViewState,
    options: &RenderOptions,
    engine: &dyn DiagramEngine,
    output_path: &Path,
) -> Result<(), ViewError> {
    let output = render_page(doc, state, options, engine)?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(output_path)?;
    file.write_all(output.as_bytes())?;

    log::info!("Wrote viewer page to {}", output_path.display());
    Ok(())
}

/// Build the viewer page as a string
pub fn render_page(
    doc: &Document,
    state: &ViewState,
    options: &RenderOptions,
    engine: &dyn DiagramEngine,
) -> Result<String, ViewError> {
    let selected: Vec<&Section> = match &state.selected_section {
        Some(id) => vec![doc.section(id).ok_or_else(|| ViewError::UnknownSection {
            id: id.clone(),
            available: doc.sections.len(),
        })?],
        None => doc.sections.iter().collect(),
    };

    let mut output = String::new();
    write_html_header(&mut output, &doc.title);

    output.push_str("<body>\n");
    if state.sidebar_visible {
        write_sidebar(&mut output, doc, state.selected_section.as_deref());
    }

    output.push_str("<main class=\"container\">\n");
    output.push_str(&format!(
        "<h1 class=\"document-title\">{}</h1>\n",
        escape_html(&doc.title)
    ));

    let mut surfaces = SurfaceIds::new();
    if selected.is_empty() {
        output.push_str("<p class=\"empty\">No content available.</p>\n");
    } else if state.selected_section.is_some() {
        for section in &selected {
            let blocks = content::render_with(&section.content, options);
            write_section(&mut output, section, &blocks, engine, &mut surfaces);
        }
    } else {
        let rendered = content::render_sections(&doc.sections, options);
        for (section, blocks) in doc.sections.iter().zip(&rendered) {
            write_section(&mut output, section, blocks, engine, &mut surfaces);
        }
    }

    output.push_str("</main>\n");
    if surfaces.allocated() > 0 {
        if let Some(script) = engine.page_script() {
            output.push_str(&script);
        }
    }
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    Ok(output)
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

/// Write the navigation sidebar
fn write_sidebar(output: &mut String, doc: &Document, current: Option<&str>) {
    output.push_str("<nav class=\"sidebar\">\n<ul>\n");

    for section in &doc.sections {
        let is_current = current == Some(section.id.as_str());
        let class = if is_current {
            format!("level-{} current", section.level)
        } else {
            format!("level-{}", section.level)
        };

        // Single-section pages only carry the anchor of the shown section
        if current.is_none() || is_current {
            output.push_str(&format!(
                "<li class=\"{}\"><a href=\"#{}\">{}</a></li>\n",
                class,
                escape_html(&section.id),
                escape_html(&section.title)
            ));
        } else {
            output.push_str(&format!(
                "<li class=\"{}\"><span>{}</span></li>\n",
                class,
                escape_html(&section.title)
            ));
        }
    }

    output.push_str("</ul>\n</nav>\n");
}

/// Write a single section with its rendered blocks
fn write_section(
    output: &mut String,
    section: &Section,
    blocks: &[ContentBlock],
    engine: &dyn DiagramEngine,
    surfaces: &mut SurfaceIds,
) {
    let level = (section.level + 1).min(6);

    output.push_str(&format!(
        "<section id=\"{}\">\n<h{} class=\"section-heading\">{}</h{}>\n",
        escape_html(&section.id),
        level,
        escape_html(&section.title),
        level
    ));

    for block in blocks {
        write_block(output, &section.id, block, engine, surfaces);
    }

    output.push_str("</section>\n");
}

/// Write a single block to the output
fn write_block(
    output: &mut String,
    section_id: &str,
    block: &ContentBlock,
    engine: &dyn DiagramEngine,
    surfaces: &mut SurfaceIds,
) {
    match block {
        ContentBlock::Paragraph { html, .. } => write_paragraph(output, html),

        ContentBlock::Code { language, lines } => {
            let code = escape_html(&lines.join("\n"));
            if let Some(lang) = language {
                output.push_str(&format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>\n",
                    escape_html(lang),
                    code
                ));
            } else {
                output.push_str(&format!("<pre><code>{}</code></pre>\n", code));
            }
        }

        ContentBlock::Diagram { source } => {
            let surface_id = surfaces.allocate(section_id);
            match engine.draw(&surface_id, source) {
                Ok(markup) => output.push_str(&markup),
                Err(e) => {
                    log::warn!("Failed to draw diagram {}: {}", surface_id, e);
                    output.push_str(&format!(
                        "<div class=\"diagram-error\" id=\"{}\"><p>Diagram could not be drawn: {}</p><pre>{}</pre></div>\n",
                        escape_html(&surface_id),
                        escape_html(&e.to_string()),
                        escape_html(source)
                    ));
                }
            }
        }
    }
}

/// Write paragraph markup, keeping headings and list items out of `<p>`
///
/// Text runs are split on the transformer's `</p><p>` separators into
/// paragraphs, consecutive list items are grouped into one `<ul>`.
fn write_paragraph(output: &mut String, html: &str) {
    output.push_str("<div class=\"paragraph\">");

    let mut last = 0;
    for run in BLOCK_RUN.find_iter(html) {
        write_text_run(output, &html[last..run.start()]);
        if run.as_str().starts_with("<li>") {
            output.push_str(&format!("<ul>{}</ul>", run.as_str()));
        } else {
            output.push_str(run.as_str());
        }
        last = run.end();
    }
    write_text_run(output, &html[last..]);

    output.push_str("</div>\n");
}

fn write_text_run(output: &mut String, run: &str) {
    for piece in run.split("</p><p>") {
        if !piece.is_empty() {
            output.push_str(&format!("<p>{}</p>", piece));
        }
    }
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Page styles: fixed sidebar on the left, content column on the right
const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
                 'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
                 sans-serif;
    line-height: 1.6;
    color: #333;
    background-color: #f5f5f5;
    display: flex;
}

.sidebar {
    width: 280px;
    min-height: 100vh;
    padding: 20px 10px;
    background: #1f2933;
    position: sticky;
    top: 0;
    align-self: flex-start;
}

.sidebar ul {
    list-style: none;
}

.sidebar a {
    color: #cbd2d9;
    text-decoration: none;
    display: block;
    padding: 4px 8px;
    border-radius: 4px;
}

.sidebar li > span {
    color: #7b8794;
    display: block;
    padding: 4px 8px;
}

.sidebar li.current > a {
    background: #0066cc;
    color: white;
}

.sidebar .level-2 { padding-left: 12px; }
.sidebar .level-3 { padding-left: 24px; }
.sidebar .level-4 { padding-left: 36px; }
.sidebar .level-5 { padding-left: 48px; }

.container {
    flex: 1;
    max-width: 900px;
    margin: 20px auto;
    background: white;
    padding: 60px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
    border-radius: 4px;
}

.document-title {
    font-size: 2.5em;
    font-weight: 700;
    margin-bottom: 20px;
    color: #1a1a1a;
    border-bottom: 3px solid #0066cc;
    padding-bottom: 10px;
}

.section-heading {
    margin-top: 40px;
    margin-bottom: 15px;
    color: #1a1a1a;
}

p {
    margin-bottom: 15px;
}

li {
    margin-left: 25px;
}

pre {
    background-color: #f4f4f4;
    border: 1px solid #ddd;
    border-radius: 4px;
    padding: 15px;
    overflow-x: auto;
    margin-bottom: 15px;
}

code {
    font-family: 'SF Mono', Monaco, 'Cascadia Code', 'Roboto Mono', Consolas,
                 'Courier New', monospace;
    font-size: 0.9em;
}

pre.mermaid {
    background: white;
    text-align: center;
}

.diagram-error {
    border-left: 4px solid #cc3300;
    padding: 10px 15px;
    margin-bottom: 15px;
    background-color: #fff4f0;
}

.empty {
    color: #777;
    font-style: italic;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{DiagramError, MermaidEngine};
    use crate::segmenter::segment;

    /// Engine that refuses every diagram
    struct FailingEngine;

    impl DiagramEngine for FailingEngine {
        fn draw(&self, surface_id: &str, _source: &str) -> Result<String, DiagramError> {
            Err(DiagramError::Engine {
                surface_id: surface_id.to_string(),
                message: "parse error".to_string(),
            })
        }
    }

    const DOC: &str = "# Guide\n## Intro\nHello *there*\n## Flow\n```mermaid\ngraph TD\n  A --> B\n```\nAfter the diagram.\n### Code\n```rust\nlet x = 1 < 2;\n```\n";

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_full_page() {
        let doc = segment(DOC);
        let page = render_page(
            &doc,
            &ViewState::default(),
            &RenderOptions::default(),
            &MermaidEngine::default(),
        )
        .unwrap();

        assert!(page.contains("<title>Guide</title>"));
        assert!(page.contains("<li class=\"level-1\"><a href=\"#section-0001\">Intro</a></li>"));
        assert!(page.contains("<li class=\"level-2\"><a href=\"#section-0003\">Code</a></li>"));
        assert!(page.contains("<p>Hello <em>there</em></p>"));
        assert!(page.contains("<pre class=\"mermaid\" id=\"diagram-section-0002-1\">"));
        assert!(page.contains("<code class=\"language-rust\">let x = 1 &lt; 2;</code>"));
        assert!(page.contains("<script type=\"module\">"));
    }

    #[test]
    fn test_selected_section_only() {
        let doc = segment(DOC);
        let state = ViewState {
            selected_section: Some("section-0001".to_string()),
            sidebar_visible: false,
        };
        let page = render_page(
            &doc,
            &state,
            &RenderOptions::default(),
            &MermaidEngine::default(),
        )
        .unwrap();

        assert!(page.contains("<section id=\"section-0001\">"));
        assert!(!page.contains("<section id=\"section-0002\">"));
        assert!(!page.contains("<nav"));
        assert!(!page.contains("<script"));
    }

    #[test]
    fn test_current_section_highlighted() {
        let doc = segment(DOC);
        let state = ViewState {
            selected_section: Some("section-0002".to_string()),
            sidebar_visible: true,
        };
        let page = render_page(
            &doc,
            &state,
            &RenderOptions::default(),
            &MermaidEngine::default(),
        )
        .unwrap();

        assert!(page.contains("<li class=\"level-1 current\"><a href=\"#section-0002\">Flow</a></li>"));
        assert!(page.contains("<li class=\"level-1\"><span>Intro</span></li>"));
        assert!(!page.contains("href=\"#section-0001\""));
        assert!(!page.contains("href=\"#section-0003\""));
    }

    #[test]
    fn test_paragraph_keeps_block_tags_out_of_p() {
        let mut output = String::new();
        write_paragraph(
            &mut output,
            &content::transform("Intro line\n## Steps\n\n* one\n* two\nAfter\n\nLast"),
        );

        assert_eq!(
            output,
            "<div class=\"paragraph\"><p>Intro line<br></p><h2>Steps</h2><ul><li>one</li><li>two</li></ul><p>After</p><p>Last</p></div>\n"
        );
    }

    #[test]
    fn test_unknown_section() {
        let doc = segment(DOC);
        let state = ViewState {
            selected_section: Some("section-0099".to_string()),
            sidebar_visible: true,
        };
        let result = render_page(
            &doc,
            &state,
            &RenderOptions::default(),
            &MermaidEngine::default(),
        );

        assert!(matches!(
            result,
            Err(ViewError::UnknownSection { available: 3, .. })
        ));
    }

    #[test]
    fn test_failed_diagram_is_contained() {
        let doc = segment(DOC);
        let page = render_page(
            &doc,
            &ViewState::default(),
            &RenderOptions::default(),
            &FailingEngine,
        )
        .unwrap();

        assert!(page.contains("<div class=\"diagram-error\" id=\"diagram-section-0002-1\">"));
        assert!(page.contains("<p>After the diagram.</p>"));
        assert!(page.contains("<code class=\"language-rust\">"));
    }

    #[test]
    fn test_empty_document() {
        let doc = segment("no headings here");
        let page = render_page(
            &doc,
            &ViewState::default(),
            &RenderOptions::default(),
            &MermaidEngine::default(),
        )
        .unwrap();

        assert!(page.contains("No content available."));
    }

    #[test]
    fn test_to_html_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("out/view.html");
        let doc = segment(DOC);

        to_html(
            &doc,
            &ViewState::default(),
            &RenderOptions::default(),
            &MermaidEngine::default(),
            &output_path,
        )
        .unwrap();

        let written = std::fs::read_to_string(&output_path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
