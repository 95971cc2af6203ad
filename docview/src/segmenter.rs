//! Document segmentation
//!
//! Splits one markdown document into its title and an ordered list of
//! sections, one per heading of depth 2 or deeper.

use crate::content::{fence_info, heading, is_fence_close};
use crate::document_model::{Document, Section};

/// Title used when the document has no level-1 heading
pub const DEFAULT_TITLE: &str = "Technical Documentation";

/// Options controlling segmentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Title used when no level-1 heading exists
    pub fallback_title: String,
    /// Treat heading-like lines inside fenced code as body text
    pub fence_aware: bool,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            fallback_title: DEFAULT_TITLE.to_string(),
            fence_aware: false,
        }
    }
}

/// Segment a document with default options
pub fn segment(raw: &str) -> Document {
    segment_with(raw, &SegmentOptions::default())
}

/// Segment a raw markdown document into sections
///
/// Never fails. Lines before the first section heading are discarded, and
/// level-1 headings only ever contribute the title (the first one wins).
///
/// # Parameters
/// * `raw` - The full markdown document
/// * `options` - Segmentation options
///
/// # Returns
/// * `Document` - Title plus sections in source order
pub fn segment_with(raw: &str, options: &SegmentOptions) -> Document {
    let mut segmenter = Segmenter::new(options);

    for line in raw.split_inclusive('\n') {
        segmenter.push_line(line);
    }

    segmenter.finish()
}

/// Segmenter state for one parse
struct Segmenter<'a> {
    /// Active options
    options: &'a SegmentOptions,

    /// First level-1 heading text
    title: Option<String>,

    /// Section currently receiving lines
    current: Option<Section>,

    /// Completed sections
    sections: Vec<Section>,

    /// Last id assigned
    counter: usize,

    /// Inside a fenced region (only tracked when fence-aware)
    in_fence: bool,
}

impl<'a> Segmenter<'a> {
    fn new(options: &'a SegmentOptions) -> Self {
        Self {
            options,
            title: None,
            current: None,
            sections: Vec::new(),
            counter: 0,
            in_fence: false,
        }
    }

    /// Process one line, including its trailing newline
    fn push_line(&mut self, line: &str) {
        let bare = line.trim_end_matches(['\r', '\n']);

        if self.options.fence_aware && self.track_fence(bare) {
            self.append(line);
            return;
        }

        match heading(bare) {
            Some((1, text)) => {
                if self.title.is_none() {
                    self.title = Some(text.to_string());
                }
            }
            Some((depth, text)) => self.open_section(depth - 1, text),
            None => self.append(line),
        }
    }

    /// Update fence state; returns true when the line belongs to a fence
    fn track_fence(&mut self, bare: &str) -> bool {
        if self.in_fence {
            if is_fence_close(bare) {
                self.in_fence = false;
            }
            true
        } else if fence_info(bare).is_some() {
            self.in_fence = true;
            true
        } else {
            false
        }
    }

    /// Close the open section and start a new one
    fn open_section(&mut self, level: usize, title: &str) {
        self.close_section();
        self.counter += 1;
        self.current = Some(Section {
            id: format!("section-{:04}", self.counter),
            title: title.to_string(),
            content: String::new(),
            level,
        });
    }

    /// Append a body line to the open section, if any
    fn append(&mut self, line: &str) {
        if let Some(section) = self.current.as_mut() {
            section.content.push_str(line);
        }
    }

    /// Finalize the open section and move it to the output
    fn close_section(&mut self) {
        if let Some(mut section) = self.current.take() {
            section.content = trim_content(&section.content);
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> Document {
        self.close_section();

        let title = self
            .title
            .unwrap_or_else(|| self.options.fallback_title.clone());
        log::debug!(
            "Segmented '{}' into {} section(s)",
            title,
            self.sections.len()
        );

        Document {
            title,
            sections: self.sections,
        }
    }
}

/// Strip leading and trailing whitespace from a finished section body
fn trim_content(content: &str) -> String {
    content.trim().to_string()
}
