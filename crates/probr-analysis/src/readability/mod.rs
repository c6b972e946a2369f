//! Readability formulas.
//!
//! Scores follow the conventions of the `textstat` package (English
//! configuration) so that numbers line up with what existing clients
//! display: the same tokenisation, the same intermediate rounding and the
//! same "round half away from zero" helper ([`legacy_round`]).
//!
//! Every function is total: an empty or punctuation-only text yields `0`
//! (or the formula's constant term) instead of dividing by zero.

mod easy_words;
pub mod syllables;

use std::sync::LazyLock;

use regex::Regex;

pub use easy_words::is_easy;

/// Default syllable threshold for [`difficult_words`].
pub const DIFFICULT_SYLLABLE_THRESHOLD: usize = 2;

/// Syllable threshold used by the Gunning fog index.
const FOG_SYLLABLE_THRESHOLD: usize = 3;

/// Number of leading words the Linsear Write formula looks at.
const LINSEAR_SAMPLE_WORDS: usize = 100;

static SENTENCE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[^.!?]+[.!?]*").unwrap());
static DIFFICULT_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w='‘]+").unwrap());

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Round half away from zero to `places` decimals.
pub fn legacy_round(value: f64, places: i32) -> f64 {
    let p = 10f64.powi(places);
    ((value * p) + 0.5f64.copysign(value)).floor() / p
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Remove punctuation, keeping apostrophes that open a contraction suffix
/// (`'t`, `'s`, `'d`, `'ve`, `'ll`, `'re`).
pub fn remove_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
            out.push(c);
        } else if c == '\'' && starts_contraction_suffix(&chars[i + 1..]) {
            out.push(c);
        }
    }
    out
}

fn starts_contraction_suffix(rest: &[char]) -> bool {
    let is_word = |c: &char| c.is_alphanumeric() || *c == '_';
    let ends_word = |n: usize| rest.get(n).is_none_or(|c| !is_word(c));
    match rest {
        ['t' | 's' | 'd', ..] => ends_word(1),
        ['v', 'e', ..] | ['l', 'l', ..] | ['r', 'e', ..] => ends_word(2),
        _ => false,
    }
}

// ── Counts ──────────────────────────────────────────────────────────────────

/// Number of whitespace-separated words after punctuation removal.
pub fn lexicon_count(text: &str) -> usize {
    remove_punctuation(text).split_whitespace().count()
}

/// Total syllables across all words.
pub fn syllable_count(text: &str) -> usize {
    remove_punctuation(&text.to_lowercase())
        .split_whitespace()
        .map(syllables::count_word)
        .sum()
}

/// Number of sentences, ignoring fragments of two words or fewer. At least 1.
pub fn sentence_count(text: &str) -> usize {
    let counted = SENTENCE_SEGMENT
        .find_iter(text)
        .filter(|m| lexicon_count(m.as_str()) > 2)
        .count();
    counted.max(1)
}

/// Characters excluding spaces.
pub fn char_count(text: &str) -> usize {
    text.chars().filter(|c| *c != ' ').count()
}

/// Characters excluding spaces and punctuation.
pub fn letter_count(text: &str) -> usize {
    let no_spaces: String = text.chars().filter(|c| *c != ' ').collect();
    remove_punctuation(&no_spaces).chars().count()
}

/// Words with three or more syllables.
pub fn polysyllable_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|w| syllable_count(w) >= 3)
        .count()
}

/// Average words per sentence, one decimal.
pub fn avg_sentence_length(text: &str) -> f64 {
    legacy_round(ratio(lexicon_count(text), sentence_count(text)), 1)
}

/// Average syllables per word, one decimal.
pub fn avg_syllables_per_word(text: &str) -> f64 {
    legacy_round(ratio(syllable_count(text), lexicon_count(text)), 1)
}

fn avg_letters_per_word(text: &str) -> f64 {
    legacy_round(ratio(letter_count(text), lexicon_count(text)), 2)
}

fn avg_sentences_per_word(text: &str) -> f64 {
    legacy_round(ratio(sentence_count(text), lexicon_count(text)), 2)
}

// ── Formulas ────────────────────────────────────────────────────────────────

/// Flesch reading ease (higher is easier).
pub fn flesch_reading_ease(text: &str) -> f64 {
    let score = 206.835 - 1.015 * avg_sentence_length(text) - 84.6 * avg_syllables_per_word(text);
    legacy_round(score, 2)
}

/// Flesch–Kincaid grade level.
pub fn flesch_kincaid_grade(text: &str) -> f64 {
    let score = 0.39 * avg_sentence_length(text) + 11.8 * avg_syllables_per_word(text) - 15.59;
    legacy_round(score, 1)
}

/// SMOG index. Needs at least three sentences, otherwise `0.0`.
pub fn smog_index(text: &str) -> f64 {
    let sentences = sentence_count(text);
    if sentences < 3 {
        return 0.0;
    }
    let poly = polysyllable_count(text) as f64;
    let score = 1.043 * (30.0 * (poly / sentences as f64)).sqrt() + 3.1291;
    legacy_round(score, 1)
}

/// Coleman–Liau index.
pub fn coleman_liau_index(text: &str) -> f64 {
    let letters = legacy_round(avg_letters_per_word(text) * 100.0, 2);
    let sentences = legacy_round(avg_sentences_per_word(text) * 100.0, 2);
    legacy_round(0.058 * letters - 0.296 * sentences - 15.8, 2)
}

/// Automated readability index.
pub fn automated_readability_index(text: &str) -> f64 {
    let words = lexicon_count(text);
    if words == 0 {
        return 0.0;
    }
    let chars_per_word = legacy_round(ratio(char_count(text), words), 2);
    let words_per_sentence = legacy_round(ratio(words, sentence_count(text)), 2);
    legacy_round(4.71 * chars_per_word + 0.5 * words_per_sentence - 21.43, 1)
}

/// Distinct unfamiliar words with at least `syllable_threshold` syllables,
/// in order of first appearance.
pub fn difficult_words_list(text: &str, syllable_threshold: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut seen = std::collections::HashSet::new();
    DIFFICULT_CANDIDATE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| !is_easy(w) && syllable_count(w) >= syllable_threshold)
        .filter(|w| seen.insert(*w))
        .map(str::to_string)
        .collect()
}

/// Number of distinct difficult words.
pub fn difficult_words(text: &str, syllable_threshold: usize) -> usize {
    difficult_words_list(text, syllable_threshold).len()
}

/// Dale–Chall readability score.
pub fn dale_chall_readability_score(text: &str) -> f64 {
    let words = lexicon_count(text);
    if words == 0 {
        return 0.0;
    }
    let familiar = words.saturating_sub(difficult_words(text, 0));
    let difficult_pct = 100.0 - ratio(familiar, words) * 100.0;
    let mut score = 0.1579 * difficult_pct + 0.0496 * avg_sentence_length(text);
    if difficult_pct > 5.0 {
        score += 3.6365;
    }
    legacy_round(score, 2)
}

/// Linsear Write formula over the first hundred words (unrounded).
pub fn linsear_write_formula(text: &str) -> f64 {
    let sample: Vec<&str> = text.split_whitespace().take(LINSEAR_SAMPLE_WORDS).collect();
    let (easy, hard) = sample.iter().fold((0usize, 0usize), |(easy, hard), word| {
        if syllable_count(word) < 3 {
            (easy + 1, hard)
        } else {
            (easy, hard + 1)
        }
    });
    let joined = sample.join(" ");
    let mut number = ratio(easy + 3 * hard, sentence_count(&joined));
    if number <= 20.0 {
        number -= 2.0;
    }
    number / 2.0
}

/// Gunning fog index.
pub fn gunning_fog(text: &str) -> f64 {
    let words = lexicon_count(text);
    if words == 0 {
        return 0.0;
    }
    let difficult_pct = ratio(difficult_words(text, FOG_SYLLABLE_THRESHOLD), words) * 100.0;
    legacy_round(0.4 * (avg_sentence_length(text) + difficult_pct), 2)
}

/// Consensus grade across all formulas, e.g. `"7th and 8th grade"`.
pub fn text_standard(text: &str) -> String {
    let mut grades: Vec<i64> = Vec::with_capacity(16);
    push_bounds(&mut grades, flesch_kincaid_grade(text));
    push_ease_grades(&mut grades, flesch_reading_ease(text));
    for score in [
        smog_index(text),
        coleman_liau_index(text),
        automated_readability_index(text),
        dale_chall_readability_score(text),
        linsear_write_formula(text),
        gunning_fog(text),
    ] {
        push_bounds(&mut grades, score);
    }

    grade_label(consensus(&grades))
}

/// Rounded and ceiled grade of a grade-level score.
fn push_bounds(grades: &mut Vec<i64>, score: f64) {
    grades.push(legacy_round(score, 0) as i64);
    grades.push(score.ceil() as i64);
}

/// Grade buckets for Flesch reading ease (100 and above has none).
fn push_ease_grades(grades: &mut Vec<i64>, score: f64) {
    match score {
        s if s >= 100.0 => {}
        s if s >= 90.0 => grades.push(5),
        s if s >= 80.0 => grades.push(6),
        s if s >= 70.0 => grades.push(7),
        s if s >= 60.0 => grades.extend([8, 9]),
        s if s >= 50.0 => grades.push(10),
        s if s >= 40.0 => grades.push(11),
        _ => grades.push(12),
    }
}

/// Most frequent grade; ties go to the grade seen first.
fn consensus(grades: &[i64]) -> i64 {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for &grade in grades {
        match counts.iter_mut().find(|(g, _)| *g == grade) {
            Some((_, n)) => *n += 1,
            None => counts.push((grade, 1)),
        }
    }
    counts
        .iter()
        .fold(None::<(i64, usize)>, |best, &(g, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((g, n)),
        })
        .map_or(0, |(g, _)| g)
}

fn grade_label(grade: i64) -> String {
    let lower = grade - 1;
    format!(
        "{lower}{} and {grade}{} grade",
        ordinal_suffix(lower),
        ordinal_suffix(grade)
    )
}

fn ordinal_suffix(n: i64) -> &'static str {
    if matches!(n.rem_euclid(100), 11..=13) {
        return "th";
    }
    match n.rem_euclid(10) {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
