//! Request adapter: turns an analysis request into a complete response.

use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::{AnalysisError, Result};
use crate::grammar::{GrammarChecker, Match};
use crate::metrics::ANALYSIS_DURATION_SECONDS;
use crate::report::TextStatistics;

/// An analysis request, as sent over HTTP or in an op 0 frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Opaque client token, echoed back unchanged.
    pub unique_id: Value,
    /// Whether to run the grammar checker.
    pub process_language: bool,
    /// Text to analyse.
    pub message: String,
}

impl AnalysisRequest {
    /// Parse a request from a JSON value. All three fields are required.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// A complete analysis result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// The request's `unique_id`.
    pub unique_id: Value,
    /// Readability statistics.
    pub text_statistics: TextStatistics,
    /// Grammar findings, or `null` when not requested.
    pub language_tool: Option<Vec<Match>>,
}

/// Runs analyses. Cheap to share behind an `Arc`.
pub struct Analyzer {
    grammar: Option<Arc<dyn GrammarChecker>>,
    max_message_bytes: usize,
}

impl Analyzer {
    /// Create an analyzer. `grammar` is `None` when grammar checking is disabled.
    pub fn new(grammar: Option<Arc<dyn GrammarChecker>>, max_message_bytes: usize) -> Self {
        Self {
            grammar,
            max_message_bytes,
        }
    }

    /// Whether `process_language` requests can be served.
    pub fn grammar_enabled(&self) -> bool {
        self.grammar.is_some()
    }

    /// Analyse one request.
    ///
    /// Grammar checking and statistics run concurrently; statistics run on
    /// the blocking pool. Either the whole response is produced or an error
    /// is returned.
    #[instrument(skip_all, fields(unique_id = %request.unique_id, process_language = request.process_language))]
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        let size = request.message.len();
        if size > self.max_message_bytes {
            return Err(AnalysisError::MessageTooLarge {
                size,
                limit: self.max_message_bytes,
            });
        }
        let checker = match (request.process_language, &self.grammar) {
            (false, _) => None,
            (true, Some(checker)) => Some(checker.clone()),
            (true, None) => return Err(AnalysisError::GrammarUnavailable),
        };

        let started = Instant::now();
        let message: Arc<str> = Arc::from(request.message);

        let grammar = async {
            match &checker {
                Some(checker) => checker.check(&message).await.map(Some),
                None => Ok(None),
            }
        };
        let stats_message = message.clone();
        let stats = tokio::task::spawn_blocking(move || TextStatistics::compute(&stats_message));

        let (language_tool, text_statistics) = tokio::join!(grammar, stats);
        let language_tool = language_tool?;
        let text_statistics = text_statistics
            .map_err(|e| AnalysisError::Internal(format!("statistics task failed: {e}")))?;

        histogram!(ANALYSIS_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
        debug!(
            sentences = text_statistics.sentence_count,
            matches = language_tool.as_ref().map_or(0, Vec::len),
            "analysis finished"
        );

        Ok(AnalysisResponse {
            unique_id: request.unique_id,
            text_statistics,
            language_tool,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
