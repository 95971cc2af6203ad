//! Block-level content produced by the renderer

use serde::Serialize;

/// One typed, ordered unit of renderable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Prose with inline markup already applied
    Paragraph {
        /// Trimmed source text of the paragraph
        source: String,
        /// Display markup produced by the inline transformer
        html: String,
    },

    /// A fenced code block
    Code {
        /// Language tag from the fence opener, `None` for plain code
        language: Option<String>,
        /// Raw lines between the fences, untouched
        lines: Vec<String>,
    },

    /// Fenced diagram source, handed to the diagram engine as-is
    Diagram {
        /// Diagram source with lines joined by `\n`
        source: String,
    },
}

impl ContentBlock {
    /// Short name of the block kind, used in summaries and CSS classes
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Code { .. } => "code",
            ContentBlock::Diagram { .. } => "diagram",
        }
    }

    /// Number of source lines this block accounts for
    pub fn line_count(&self) -> usize {
        match self {
            ContentBlock::Paragraph { source, .. } => source.lines().count(),
            ContentBlock::Code { lines, .. } => lines.len(),
            ContentBlock::Diagram { source } => source.lines().count(),
        }
    }
}

/// Renderer state while walking a section body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Collecting paragraph lines
    #[default]
    Normal,
    /// Inside a code fence
    InFence {
        /// Language tag of the open fence
        language: Option<String>,
    },
    /// Inside a diagram fence
    InDiagramFence,
}

impl ParseMode {
    /// Whether a fence is currently open
    pub fn in_fence(&self) -> bool {
        !matches!(self, ParseMode::Normal)
    }
}
