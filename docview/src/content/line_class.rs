//! Per-line classification
//!
//! Classification only looks at the line itself and whether a fence is open;
//! all other context lives in the renderer.

use super::blocks::ParseMode;

/// Fence delimiter opening and closing verbatim regions
pub const FENCE: &str = "```";

/// Deepest heading level recognized
pub const MAX_HEADING_DEPTH: usize = 6;

/// Role of a single line within the active block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Opens a fenced region; `info` is the trimmed text after the backticks
    FenceOpen { info: &'a str },
    /// Closes the open fenced region
    FenceClose,
    /// An ATX heading outside any fence
    Heading { depth: usize, text: &'a str },
    /// Anything else
    Plain,
}

/// Classify a line given the current parse mode
///
/// Inside a fence only an exact closing fence is significant; every other
/// line, including ones that look like headings or openers, is plain.
pub fn classify<'a>(line: &'a str, mode: &ParseMode) -> LineClass<'a> {
    if mode.in_fence() {
        return if is_fence_close(line) {
            LineClass::FenceClose
        } else {
            LineClass::Plain
        };
    }

    if let Some(info) = fence_info(line) {
        return LineClass::FenceOpen { info };
    }

    match heading(line) {
        Some((depth, text)) => LineClass::Heading { depth, text },
        None => LineClass::Plain,
    }
}

/// Get the info token of a fence-opening line
///
/// # Returns
/// * `Some(info)` - The line opens a fence; `info` is empty for plain code
/// * `None` - The line does not start with a fence after trimming
pub fn fence_info(line: &str) -> Option<&str> {
    line.trim().strip_prefix(FENCE).map(str::trim)
}

/// Whether the line is exactly a closing fence (ignoring surrounding whitespace)
pub fn is_fence_close(line: &str) -> bool {
    line.trim() == FENCE
}

/// Parse an ATX heading line
///
/// A heading starts with 1-6 `#` characters followed by whitespace and
/// non-empty text.
///
/// # Returns
/// * `Some((depth, text))` - Heading depth and trimmed heading text
/// * `None` - The line is not a heading
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let depth = line.bytes().take_while(|&b| b == b'#').count();
    if depth == 0 || depth > MAX_HEADING_DEPTH {
        return None;
    }

    let rest = &line[depth..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        None
    } else {
        Some((depth, text))
    }
}
