//! Heuristic English syllable counter.
//!
//! Counts vowel groups, then corrects for common spelling patterns that
//! merge or split syllables (`-tion`, `-ble`, `-ism`, ...). Each pattern
//! adjusts the count at most once per word.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

static VOWEL_GROUPS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[aeiouy]+").unwrap());

/// Patterns where two written vowel groups are spoken as one syllable.
static SUBTRACT: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"cial",
        r"tia",
        r"cius",
        r"cious",
        r"giu",
        r"ion",
        r"iou",
        r"sia$",
        r".ely$",
        r"[^td]ed$",
    ])
    .unwrap()
});

/// Patterns where one written vowel group is spoken as two syllables.
static ADD: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"ia",
        r"riet",
        r"dien",
        r"iu",
        r"io",
        r"ii",
        r"[aeiouym]bl$",
        r"[aeiou]{3}",
        r"^mc",
        r"ism$",
        r"[^l]lien",
        r"^coa[dglx].",
        r"[^gq]ua[^auieo]",
        r"dnt$",
    ])
    .unwrap()
});

/// Count the syllables of a single word. Always at least 1.
pub fn count_word(word: &str) -> usize {
    let mut word: String = word.to_lowercase().chars().filter(|c| *c != '\'').collect();
    if word.ends_with('e') {
        let _ = word.pop();
    }

    let groups = VOWEL_GROUPS.find_iter(&word).count() as i64;
    let subtract = SUBTRACT.matches(&word).iter().count() as i64;
    let mut add = ADD.matches(&word).iter().count() as i64;
    if doubled_consonant_le(&word) {
        add += 1;
    }

    (groups - subtract + add).max(1) as usize
}

/// `-ttle`, `-ddle`, `-bble`... (`e` already stripped).
fn doubled_consonant_le(word: &str) -> bool {
    let tail: Vec<char> = word.chars().rev().take(3).collect();
    match tail.as_slice() {
        ['l', a, b] => a == b && !"aeiouy".contains(*a),
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_syllable_words() {
        for word in ["cat", "sat", "dog", "it", "was", "the", "make"] {
            assert_eq!(count_word(word), 1, "{word}");
        }
    }

    #[test]
    fn no_vowels_counts_one() {
        assert_eq!(count_word("crwth"), 1);
        assert_eq!(count_word("x"), 1);
    }

    #[test]
    fn multi_syllable_words() {
        assert_eq!(count_word("happy"), 2);
        assert_eq!(count_word("water"), 2);
        assert_eq!(count_word("computer"), 3);
        assert_eq!(count_word("readability"), 5);
    }

    #[test]
    fn subtractive_patterns() {
        assert_eq!(count_word("nation"), 2);
        assert_eq!(count_word("special"), 2);
        assert_eq!(count_word("accused"), 2);
    }

    #[test]
    fn additive_patterns() {
        assert_eq!(count_word("table"), 2);
        assert_eq!(count_word("bottle"), 2);
        assert_eq!(count_word("tourism"), 3);
    }

    #[test]
    fn case_and_apostrophes_ignored() {
        assert_eq!(count_word("HAPPY"), count_word("happy"));
        assert_eq!(count_word("don't"), 1);
    }
}
