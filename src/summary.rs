//! Plain-text summaries from Markdown abstracts.
//!
//! The technote abstract is authored in Markdown by the host document, but
//! summary surfaces (`og:description`, `<meta name="description">`) take
//! plain text only. This helper flattens the markup while keeping paragraph
//! breaks, so a two-paragraph abstract stays readable in an unfurl card.
//!
//! The abstract itself is supplied by the caller; this crate never inspects
//! the document tree.

use pulldown_cmark::{Event, Parser, TagEnd};

/// Collapse a Markdown abstract into plain text.
///
/// Inline markup is dropped, soft and hard line breaks become spaces, and
/// block boundaries (paragraphs, headings, list items) become blank-line
/// separators:
///
/// ```
/// let text = technote_meta::summary::plain_text_summary(
///     "First paragraph of *abstract*.\n\nSecond paragraph.",
/// );
/// assert_eq!(text, "First paragraph of abstract.\n\nSecond paragraph.");
/// ```
pub fn plain_text_summary(markdown: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, blocks: &mut Vec<String>| {
        let text = current.trim();
        if !text.is_empty() {
            blocks.push(text.to_string());
        }
        current.clear();
    };

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => current.push_str(&text),
            Event::SoftBreak | Event::HardBreak => current.push(' '),
            Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::Item) => {
                flush(&mut current, &mut blocks);
            }
            _ => {}
        }
    }
    flush(&mut current, &mut blocks);

    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(plain_text_summary("Just a sentence."), "Just a sentence.");
    }

    #[test]
    fn inline_markup_is_dropped() {
        assert_eq!(
            plain_text_summary("A *very* *important* [link](https://example.com) and `code`."),
            "A very important link and code."
        );
    }

    #[test]
    fn paragraphs_stay_separated() {
        assert_eq!(
            plain_text_summary("First paragraph of abstract.\n\nSecond paragraph of abstract."),
            "First paragraph of abstract.\n\nSecond paragraph of abstract."
        );
    }

    #[test]
    fn soft_breaks_become_spaces() {
        assert_eq!(
            plain_text_summary("One line\nwrapped in source."),
            "One line wrapped in source."
        );
    }

    #[test]
    fn list_items_become_blocks() {
        assert_eq!(
            plain_text_summary("- first\n- second\n"),
            "first\n\nsecond"
        );
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(plain_text_summary(""), "");
        assert_eq!(plain_text_summary("   \n"), "");
    }
}
