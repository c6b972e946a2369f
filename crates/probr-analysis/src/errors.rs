//! Analysis error types.

use thiserror::Error;

/// Errors produced while handling a single analysis request.
///
/// None of these are fatal to the server: the transport reports them to
/// the client and carries on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request body was not a valid analysis request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The message exceeded the configured size limit.
    #[error("message is {size} bytes, limit is {limit}")]
    MessageTooLarge {
        /// Actual size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Grammar checking was requested but no checker is configured.
    #[error("grammar checking is not available")]
    GrammarUnavailable,

    /// The grammar checker failed (transport, status or decoding).
    #[error("grammar check failed: {0}")]
    GrammarCheck(String),

    /// Anything else (e.g. a panicked statistics task).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_PAYLOAD",
            Self::MessageTooLarge { .. } => "MESSAGE_TOO_LARGE",
            Self::GrammarUnavailable => "GRAMMAR_UNAVAILABLE",
            Self::GrammarCheck(_) => "GRAMMAR_CHECK_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        Self::GrammarCheck(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
