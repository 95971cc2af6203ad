//! Block-mode renderer
//!
//! Walks a section body line by line, switching between paragraph
//! collection and fenced regions, and emits blocks in source order.

use super::blocks::{ContentBlock, ParseMode};
use super::inline;
use super::line_class::{classify, LineClass};

/// Default fence info token that marks a diagram
pub const DEFAULT_DIAGRAM_LANGUAGE: &str = "mermaid";

/// Options controlling block rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Fence info token recognized as diagram source (case-sensitive)
    pub diagram_language: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            diagram_language: DEFAULT_DIAGRAM_LANGUAGE.to_string(),
        }
    }
}

/// Render section content with default options
pub fn render(content: &str) -> Vec<ContentBlock> {
    render_with(content, &RenderOptions::default())
}

/// Render section content into ordered content blocks
///
/// Never fails: an unterminated fence at the end of input is flushed as a
/// block of the open kind.
///
/// # Parameters
/// * `content` - Raw markdown body of one section
/// * `options` - Renderer options
///
/// # Returns
/// * `Vec<ContentBlock>` - Blocks in source order
pub fn render_with(content: &str, options: &RenderOptions) -> Vec<ContentBlock> {
    let mut renderer = BlockRenderer::new(options);

    for line in content.lines() {
        renderer.push_line(line);
    }

    renderer.finish()
}

/// Renderer state for one pass over a section body
struct BlockRenderer<'a> {
    /// Active options
    options: &'a RenderOptions,

    /// Current mode
    mode: ParseMode,

    /// Pending paragraph lines (Normal mode)
    paragraph: Vec<&'a str>,

    /// Raw lines of the open fence
    fence_lines: Vec<String>,

    /// Completed blocks
    blocks: Vec<ContentBlock>,
}

impl<'a> BlockRenderer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            mode: ParseMode::Normal,
            paragraph: Vec::new(),
            fence_lines: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Process a single line
    fn push_line(&mut self, line: &'a str) {
        match classify(line, &self.mode) {
            LineClass::FenceOpen { info } => self.open_fence(info),
            LineClass::FenceClose => self.close_fence(),
            LineClass::Heading { .. } | LineClass::Plain => {
                if self.mode.in_fence() {
                    self.fence_lines.push(line.to_string());
                } else {
                    self.paragraph.push(line);
                }
            }
        }
    }

    /// Flush the pending paragraph and enter a fenced mode
    fn open_fence(&mut self, info: &str) {
        self.flush_paragraph();
        self.fence_lines.clear();

        self.mode = if info == self.options.diagram_language {
            ParseMode::InDiagramFence
        } else {
            ParseMode::InFence {
                language: (!info.is_empty()).then(|| info.to_string()),
            }
        };
    }

    /// Emit the open fence as a block and return to Normal mode
    fn close_fence(&mut self) {
        let lines = std::mem::take(&mut self.fence_lines);

        match std::mem::take(&mut self.mode) {
            ParseMode::InDiagramFence => self.blocks.push(ContentBlock::Diagram {
                source: lines.join("\n"),
            }),
            ParseMode::InFence { language } => {
                self.blocks.push(ContentBlock::Code { language, lines })
            }
            ParseMode::Normal => {}
        }
    }

    /// Emit the pending paragraph, dropping it if it is blank
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }

        let text = self.paragraph.join("\n");
        self.paragraph.clear();

        let source = text.trim();
        if source.is_empty() {
            return;
        }

        self.blocks.push(ContentBlock::Paragraph {
            source: source.to_string(),
            html: inline::transform(source),
        });
    }

    /// Flush whatever is still open and return the blocks
    fn finish(mut self) -> Vec<ContentBlock> {
        if self.mode.in_fence() {
            log::warn!(
                "Unterminated {} fence, flushing {} line(s)",
                match self.mode {
                    ParseMode::InDiagramFence => "diagram",
                    _ => "code",
                },
                self.fence_lines.len()
            );
            self.close_fence();
        } else {
            self.flush_paragraph();
        }

        log::debug!("Rendered {} block(s)", self.blocks.len());
        self.blocks
    }
}
