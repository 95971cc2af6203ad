//! Hand-off of diagram blocks to a drawing engine
//!
//! Producing content blocks never waits on the engine. The viewer allocates a
//! drawing surface id per diagram block and asks the engine for the markup of
//! that surface; a failure only affects that one block.

use crate::viewer::escape_html;
use thiserror::Error;

/// Default location of the client-side mermaid bundle
pub const DEFAULT_MERMAID_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.esm.min.mjs";

/// Errors a diagram engine can report for a single block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("diagram source is empty")]
    EmptySource,

    #[error("diagram engine failed on {surface_id}: {message}")]
    Engine { surface_id: String, message: String },
}

/// A diagram drawing engine
pub trait DiagramEngine {
    /// Produce the markup for one drawing surface
    ///
    /// # Parameters
    /// * `surface_id` - Unique id of the target element
    /// * `source` - Raw diagram source as found in the document
    ///
    /// # Returns
    /// * `Ok(String)` - Markup to place in the page
    /// * `Err(DiagramError)` - The diagram cannot be drawn
    fn draw(&self, surface_id: &str, source: &str) -> Result<String, DiagramError>;

    /// Markup the page needs once when at least one diagram was drawn
    fn page_script(&self) -> Option<String> {
        None
    }
}

/// Engine that defers drawing to mermaid running in the browser
#[derive(Debug, Clone)]
pub struct MermaidEngine {
    script_url: String,
}

impl MermaidEngine {
    /// Create an engine loading mermaid from `script_url`
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
        }
    }
}

impl Default for MermaidEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MERMAID_SCRIPT_URL)
    }
}

impl DiagramEngine for MermaidEngine {
    fn draw(&self, surface_id: &str, source: &str) -> Result<String, DiagramError> {
        if source.trim().is_empty() {
            return Err(DiagramError::EmptySource);
        }

        Ok(format!(
            "<pre class=\"mermaid\" id=\"{}\">{}</pre>\n",
            escape_html(surface_id),
            escape_html(source)
        ))
    }

    fn page_script(&self) -> Option<String> {
        Some(format!(
            "<script type=\"module\">\nimport mermaid from \"{}\";\nmermaid.initialize({{ startOnLoad: true }});\n</script>\n",
            escape_html(&self.script_url)
        ))
    }
}

/// Allocates unique drawing surface ids for one page
#[derive(Debug, Default)]
pub struct SurfaceIds {
    next: usize,
}

impl SurfaceIds {
    /// Create an allocator starting at 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id for a diagram inside `section_id`
    pub fn allocate(&mut self, section_id: &str) -> String {
        self.next += 1;
        format!("diagram-{}-{}", section_id, self.next)
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> usize {
        self.next
    }
}
