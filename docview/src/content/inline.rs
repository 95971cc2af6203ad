//! Inline markup transformer
//!
//! Paragraph text is converted to display markup by a fixed pipeline:
//!
//! 1. escape `&`, `<` and `>` (existing entities and the tags this module
//!    emits are left alone, so a second pass changes nothing)
//! 2. apply [`RULES`] in order, each once over the whole text
//! 3. encode markers no rule consumed as numeric entities
//!
//! Later rules see the output of earlier ones. Inline code runs after
//! bold and italic, so emphasis markers inside backticks are still
//! converted. Headings and list items are matched per line before any
//! newline is rewritten.

use regex::Regex;
use std::sync::LazyLock;

/// A single substitution step of the pipeline
pub struct Rule {
    /// Name used in logs and tests
    pub name: &'static str,
    /// Regular expression to match
    pub pattern: &'static str,
    /// Replacement template (`regex` syntax)
    pub replacement: &'static str,
}

/// The substitution pipeline, applied top to bottom
pub const RULES: &[Rule] = &[
    Rule {
        name: "heading3",
        pattern: r"(?m)^###[ \t]+(.+?)[ \t]*$",
        replacement: "<h3>${1}</h3>",
    },
    Rule {
        name: "heading2",
        pattern: r"(?m)^##[ \t]+(.+?)[ \t]*$",
        replacement: "<h2>${1}</h2>",
    },
    Rule {
        name: "list_item",
        pattern: r"(?m)^[*-][ \t]+(.+?)[ \t]*$",
        replacement: "<li>${1}</li>",
    },
    Rule {
        name: "bold",
        pattern: r"\*\*([^*\n]+?)\*\*",
        replacement: "<strong>${1}</strong>",
    },
    Rule {
        name: "italic",
        pattern: r"\*([^*\s][^*\n]*?)\*",
        replacement: "<em>${1}</em>",
    },
    Rule {
        name: "inline_code",
        pattern: r"`([^`\n]+)`",
        replacement: "<code>${1}</code>",
    },
    Rule {
        name: "link",
        pattern: concat!(
            r#"\[([^\]\n]+)\]\("#,
            r#"((?:https?:|mailto:)[^)\s"<>]*|[/?#][^)\s"<>]*|[^):\s"<>/?#]+(?:[/?#][^)\s"<>]*)?)"#,
            r#"\)"#,
        ),
        replacement: r#"<a href="${2}" target="_blank" rel="noopener noreferrer">${1}</a>"#,
    },
    Rule {
        name: "paragraph_break",
        pattern: r"\n[ \t]*\n\s*",
        replacement: "</p><p>",
    },
    Rule {
        name: "block_end",
        pattern: r"(</h[23]>|</li>)\n",
        replacement: "${1}",
    },
    Rule {
        name: "line_break",
        pattern: r"\n",
        replacement: "<br>",
    },
];

/// Markup that survives escaping: entities and every tag the rules emit
const PRESERVED_PATTERN: &str = concat!(
    r"</?(?:strong|em|code|h2|h3|li|p|br)>",
    r#"|<a href="(?:(?:https?:|mailto:)[^"<>\s]*|[/?#][^"<>\s]*|[^":<>\s/?#]+(?:[/?#][^"<>\s]*)?)""#,
    r#" target="_blank" rel="noopener noreferrer">"#,
    r"|</a>",
    r"|&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);",
);

static PRESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PRESERVED_PATTERN).expect("preserved markup pattern is valid"));

static COMPILED_RULES: LazyLock<Vec<(&'static str, Regex, &'static str)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|rule| {
            let regex = Regex::new(rule.pattern).expect("inline rule pattern is valid");
            (rule.name, regex, rule.replacement)
        })
        .collect()
});

/// Convert paragraph text into display markup
///
/// The output never contains raw newlines: blank lines become a paragraph
/// separator and single newlines become line breaks.
pub fn transform(text: &str) -> String {
    let mut output = escape_text(&text.replace("\r\n", "\n"));

    for (name, regex, replacement) in COMPILED_RULES.iter() {
        if regex.is_match(&output) {
            log::trace!("Inline rule '{}' applied", name);
            output = regex.replace_all(&output, *replacement).into_owned();
        }
    }

    encode_leftover_markers(&output)
}

/// Encode unpaired markers so a second pass cannot pair them across `<br>`
///
/// Only a leading `#` or `-` can start a heading or list item once the
/// text is a single line.
fn encode_leftover_markers(text: &str) -> String {
    let mut output = String::with_capacity(text.len());

    for (index, c) in text.char_indices() {
        match c {
            '*' => output.push_str("&#42;"),
            '`' => output.push_str("&#96;"),
            '[' => output.push_str("&#91;"),
            '#' if index == 0 => output.push_str("&#35;"),
            '-' if index == 0 => output.push_str("&#45;"),
            _ => output.push(c),
        }
    }

    output
}

/// Escape HTML special characters outside already-produced markup
fn escape_text(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for found in PRESERVED.find_iter(text) {
        push_escaped(&mut output, &text[last..found.start()]);
        output.push_str(found.as_str());
        last = found.end();
    }
    push_escaped(&mut output, &text[last..]);

    output
}

fn push_escaped(output: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}
