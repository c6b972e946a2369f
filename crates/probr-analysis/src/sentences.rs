//! English sentence splitting.
//!
//! Blank lines always separate sentences and other whitespace runs collapse
//! to a single space. Boundaries inside a paragraph come from the `sakurs`
//! English rules (terminators, abbreviations, quotes and brackets).

use std::sync::LazyLock;

use regex::Regex;
use sakurs_core::{Input, SentenceProcessor};
use tracing::warn;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r\f\v]*\n\s*").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

thread_local! {
    static PROCESSOR: Option<SentenceProcessor> = match SentenceProcessor::with_language("en") {
        Ok(processor) => Some(processor),
        Err(e) => {
            warn!(error = %e, "sentence processor unavailable, paragraphs stay unsplit");
            None
        }
    };
}

/// Split `text` into sentences.
///
/// Returns an empty list for empty or whitespace-only input. Every returned
/// sentence is trimmed and non-empty.
pub fn split_sentences(text: &str) -> Vec<String> {
    PROCESSOR.with(|processor| {
        PARAGRAPH_BREAK
            .split(text)
            .flat_map(|paragraph| split_paragraph(processor.as_ref(), paragraph))
            .collect()
    })
}

fn split_paragraph(processor: Option<&SentenceProcessor>, paragraph: &str) -> Vec<String> {
    let text = WHITESPACE.replace_all(paragraph, " ");
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut offsets = match processor.map(|p| p.process(Input::from_text(text))) {
        Some(Ok(output)) => output.boundaries.into_iter().map(|b| b.offset).collect(),
        Some(Err(e)) => {
            warn!(error = %e, "sentence boundary detection failed");
            Vec::new()
        }
        None => Vec::new(),
    };
    offsets.sort_unstable();
    offsets.dedup();

    let mut sentences = Vec::with_capacity(offsets.len() + 1);
    let mut start = 0;
    for end in offsets.into_iter().chain(std::iter::once(text.len())) {
        let Some(piece) = text.get(start..end) else {
            continue;
        };
        let piece = piece.trim();
        if !piece.is_empty() {
            sentences.push(piece.to_string());
        }
        start = end;
    }
    sentences
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_simple_sentences() {
        assert_eq!(
            split_sentences("The cat sat. It was happy."),
            vec!["The cat sat.", "It was happy."]
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\t ").is_empty());
    }

    #[test]
    fn no_terminal_punctuation() {
        assert_eq!(split_sentences("just some words"), vec!["just some words"]);
    }

    #[test]
    fn question_and_exclamation() {
        assert_eq!(
            split_sentences("Wait! Are you sure? Yes."),
            vec!["Wait!", "Are you sure?", "Yes."]
        );
    }

    #[test]
    fn honorific_does_not_break() {
        assert_eq!(
            split_sentences("Mr. Smith went home. He slept."),
            vec!["Mr. Smith went home.", "He slept."]
        );
    }

    #[test]
    fn blank_line_separates_paragraphs() {
        assert_eq!(
            split_sentences("First heading\n\nSecond paragraph here"),
            vec!["First heading", "Second paragraph here"]
        );
    }

    #[test]
    fn single_newlines_and_runs_of_spaces_collapse() {
        assert_eq!(
            split_sentences("  One   line\ncontinues.   Next one. "),
            vec!["One line continues.", "Next one."]
        );
    }

    #[test]
    fn paragraph_without_processor_is_one_sentence() {
        assert_eq!(
            split_paragraph(None, "One. Two."),
            vec!["One. Two."]
        );
    }
}
