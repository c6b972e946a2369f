//! Dale–Chall familiar-word list (American English).

use std::collections::HashSet;
use std::sync::LazyLock;

static EASY_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("../../data/easy_words_en.txt")
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .collect()
});

/// Whether `word` (lowercase) is on the familiar-word list.
pub fn is_easy(word: &str) -> bool {
    EASY_WORDS.contains(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_words_are_easy() {
        for word in ["the", "cat", "sat", "it", "was", "happy", "don't"] {
            assert!(is_easy(word), "{word}");
        }
    }

    #[test]
    fn uncommon_words_are_not_easy() {
        for word in ["readability", "phenomenon", "extraordinary"] {
            assert!(!is_easy(word), "{word}");
        }
    }

    #[test]
    fn list_is_lowercase_and_substantial() {
        assert!(EASY_WORDS.len() > 2500);
        assert!(EASY_WORDS.iter().all(|w| w.to_lowercase() == *w));
    }
}
