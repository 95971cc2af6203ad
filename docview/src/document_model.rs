//! Document model for a segmented documentation file

use serde::Serialize;

/// A segmented document: its title and the ordered sections below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Text of the first level-1 heading, or the configured fallback
    pub title: String,
    /// Sections in source order (the title heading never becomes a section)
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a document with a title and no sections
    ///
    /// # Parameters
    /// * `title` - Document title
    ///
    /// # Returns
    /// * `Document` - A new document with an empty section list
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Whether the document has no navigable sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Find a section by its id
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Get the total word count across all sections
    pub fn word_count(&self) -> usize {
        self.sections.iter().map(Section::word_count).sum()
    }

    /// Rebuild a markdown document from the parsed structure
    ///
    /// The title becomes a level-1 heading and every section is written as a
    /// heading with `level + 1` hashes followed by its content. Whitespace
    /// between blocks is normalized to a single blank line, so the output is
    /// structurally (not byte-for-byte) equivalent to the source.
    pub fn to_markdown(&self) -> String {
        let mut output = format!("# {}\n", self.title);

        for section in &self.sections {
            output.push('\n');
            output.push_str(&"#".repeat(section.level + 1));
            output.push(' ');
            output.push_str(&section.title);
            output.push('\n');
            if !section.content.is_empty() {
                output.push_str(&section.content);
                output.push('\n');
            }
        }

        output
    }
}

/// A heading-delimited unit of the document body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Positional id, unique within one parse (e.g. "section-0003")
    pub id: String,
    /// Heading text
    pub title: String,
    /// Raw markdown body, trimmed when the section is closed
    pub content: String,
    /// Heading depth minus one (a `##` heading has level 1)
    pub level: usize,
}

impl Section {
    /// Get the number of whitespace-separated words in the body
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
