//! Grammar checking.
//!
//! Grammar and style rules live in an external LanguageTool server; this
//! module defines the finding type clients receive and the
//! [`GrammarChecker`] seam the analyzer calls through.

pub mod language_tool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use language_tool::LanguageToolClient;

/// A single grammar/style finding.
///
/// Offsets and lengths count UTF-16 code units, as reported by LanguageTool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Rule identifier, e.g. `MORFOLOGIK_RULE_EN_US`.
    pub rule_id: String,
    /// Human-readable explanation.
    pub message: String,
    /// Suggested replacements, best first.
    pub replacements: Vec<String>,
    /// Offset of the match within [`Match::context`].
    pub offset_in_context: usize,
    /// Text surrounding the match.
    pub context: String,
    /// Offset of the match within the checked message.
    pub offset: usize,
    /// Length of the matched text.
    pub error_length: usize,
    /// Rule category id, e.g. `TYPOS`.
    pub category: String,
    /// Rule issue type, e.g. `misspelling`.
    pub rule_issue_type: String,
    /// The sentence the match occurred in.
    pub sentence: String,
}

/// Something that can check text for grammar and style issues.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrammarChecker: Send + Sync {
    /// Check `text`, returning findings in document order.
    async fn check(&self, text: &str) -> Result<Vec<Match>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
