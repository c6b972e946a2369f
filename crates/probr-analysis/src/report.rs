//! Document and per-sentence statistics report.

use serde::{Deserialize, Serialize};

use crate::readability::{self, DIFFICULT_SYLLABLE_THRESHOLD};
use crate::sentences::split_sentences;

/// A document-level score plus one score per sentence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    /// Whole-document score.
    pub score: T,
    /// Per-sentence scores, in sentence order.
    pub sps: Vec<T>,
}

impl<T> Scored<T> {
    fn compute(message: &str, sentences: &[String], f: impl Fn(&str) -> T) -> Self {
        Self {
            score: f(message),
            sps: sentences.iter().map(|s| f(s)).collect(),
        }
    }
}

/// Difficult-word count, per sentence, plus the document's word list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultWords {
    /// Distinct difficult words in the whole document.
    pub score: usize,
    /// Distinct difficult words per sentence.
    pub sps: Vec<usize>,
    /// The difficult words themselves, in order of first appearance.
    pub words: Vec<String>,
}

/// Consensus grade label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStandard {
    /// e.g. `"7th and 8th grade"`.
    pub score: String,
}

/// All readability scores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Readability {
    pub flesch_reading_ease: Scored<f64>,
    pub smog_index: Scored<f64>,
    pub flesch_kincaid_grade: Scored<f64>,
    pub coleman_liau_index: Scored<f64>,
    pub automated_readability_index: Scored<f64>,
    pub dale_chall_readability_score: Scored<f64>,
    pub difficult_words: DifficultWords,
    /// Document score rounded to two decimals; per-sentence scores unrounded.
    pub linsear_write_formula: Scored<f64>,
    pub gunning_fog: Scored<f64>,
    pub text_standard: TextStandard,
}

/// The `text_statistics` object of an analysis response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Words in the whole message.
    pub lexicon_count: usize,
    /// Words per sentence.
    pub lexicon_count_ps: Vec<usize>,
    /// Syllables in the whole message.
    pub syllable_count: usize,
    /// Syllables per sentence.
    pub syllable_count_ps: Vec<usize>,
    /// The sentences the message was split into.
    pub sentences: Vec<String>,
    /// `sentences.len()`.
    pub sentence_count: usize,
    /// Readability scores.
    pub readability: Readability,
}

impl TextStatistics {
    /// Split `message` and compute every statistic for it and each sentence.
    ///
    /// CPU-bound; callers on the async runtime should run it on the blocking
    /// pool.
    pub fn compute(message: &str) -> Self {
        let sentences = split_sentences(message);
        let per_sentence =
            |f: fn(&str) -> usize| -> Vec<usize> { sentences.iter().map(|s| f(s)).collect() };

        let linsear = Scored::compute(message, &sentences, readability::linsear_write_formula);
        let scores = Readability {
            flesch_reading_ease: Scored::compute(message, &sentences, readability::flesch_reading_ease),
            smog_index: Scored::compute(message, &sentences, readability::smog_index),
            flesch_kincaid_grade: Scored::compute(
                message,
                &sentences,
                readability::flesch_kincaid_grade,
            ),
            coleman_liau_index: Scored::compute(message, &sentences, readability::coleman_liau_index),
            automated_readability_index: Scored::compute(
                message,
                &sentences,
                readability::automated_readability_index,
            ),
            dale_chall_readability_score: Scored::compute(
                message,
                &sentences,
                readability::dale_chall_readability_score,
            ),
            difficult_words: DifficultWords {
                score: readability::difficult_words(message, DIFFICULT_SYLLABLE_THRESHOLD),
                sps: sentences
                    .iter()
                    .map(|s| readability::difficult_words(s, DIFFICULT_SYLLABLE_THRESHOLD))
                    .collect(),
                words: readability::difficult_words_list(message, DIFFICULT_SYLLABLE_THRESHOLD),
            },
            linsear_write_formula: Scored {
                score: readability::legacy_round(linsear.score, 2),
                sps: linsear.sps,
            },
            gunning_fog: Scored::compute(message, &sentences, readability::gunning_fog),
            text_standard: TextStandard {
                score: readability::text_standard(message),
            },
        };

        Self {
            lexicon_count: readability::lexicon_count(message),
            lexicon_count_ps: per_sentence(readability::lexicon_count),
            syllable_count: readability::syllable_count(message),
            syllable_count_ps: per_sentence(readability::syllable_count),
            sentence_count: sentences.len(),
            readability: scores,
            sentences,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
