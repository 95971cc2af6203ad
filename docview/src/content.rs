//! Block-mode rendering of section bodies
//!
//! A section's raw markdown is turned into an ordered list of typed blocks
//! (paragraphs, code and diagrams) by a small line-driven state machine:
//! - [`line_class`] decides what role a single line plays in the current mode
//! - [`renderer`] drives the mode transitions and emits [`ContentBlock`]s
//! - [`inline`] turns paragraph text into display markup

use crate::document_model::Section;

// Submodules
mod blocks;
mod inline;
mod line_class;
mod renderer;

// Re-export public types
pub use blocks::{ContentBlock, ParseMode};
pub use inline::transform;
pub use line_class::{classify, fence_info, heading, is_fence_close, LineClass};
pub use renderer::{render, render_with, RenderOptions};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Render every section of a document independently
///
/// # Parameters
/// * `sections` - Sections to render, in document order
/// * `options` - Renderer options shared by all sections
///
/// # Returns
/// * `Vec<Vec<ContentBlock>>` - One block list per section, in the same order
pub fn render_sections(sections: &[Section], options: &RenderOptions) -> Vec<Vec<ContentBlock>> {
    #[cfg(feature = "parallel")]
    let rendered = sections
        .par_iter()
        .map(|section| render_with(&section.content, options))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let rendered = sections
        .iter()
        .map(|section| render_with(&section.content, options))
        .collect();

    rendered
}
