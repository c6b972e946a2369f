//! WebSocket message dispatch: decodes incoming text frames and runs analyses.

use metrics::counter;
use probr_analysis::{AnalysisError, AnalysisRequest, Analyzer};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::protocol::{self, ClientFrame};
use crate::metrics::{ANALYSIS_ERRORS_TOTAL, ANALYSIS_REQUESTS_TOTAL};

/// What the session should do with an incoming text frame.
#[derive(Debug, PartialEq)]
pub enum FrameAction {
    /// Start an analysis.
    Analyze(AnalysisRequest),
    /// Record the heartbeat and acknowledge it.
    Heartbeat,
    /// Send this frame back (a decode error).
    Reply(String),
    /// Nothing to do.
    Ignore,
}

/// Decode a text frame into the action the session should take.
pub fn handle_message(text: &str) -> FrameAction {
    let frame = match ClientFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "invalid frame received");
            let error = AnalysisError::InvalidRequest(e.to_string());
            return FrameAction::Reply(error_reply(None, &error));
        }
    };

    match frame {
        ClientFrame::Heartbeat => FrameAction::Heartbeat,
        ClientFrame::Unknown(op) => {
            debug!(op, "ignoring unsupported opcode");
            FrameAction::Ignore
        }
        ClientFrame::Request(payload) => {
            let unique_id = payload.get("unique_id").cloned();
            match AnalysisRequest::from_value(payload) {
                Ok(request) => FrameAction::Analyze(request),
                Err(e) => {
                    warn!(error = %e, "invalid analysis request");
                    FrameAction::Reply(error_reply(unique_id.as_ref(), &e))
                }
            }
        }
    }
}

/// Run one analysis and serialize the reply (op 0 result or op 2 error).
#[instrument(skip_all, fields(unique_id = %request.unique_id))]
pub async fn run_analysis(analyzer: &Analyzer, request: AnalysisRequest) -> String {
    counter!(ANALYSIS_REQUESTS_TOTAL, "transport" => "websocket").increment(1);
    let unique_id = request.unique_id.clone();

    let error = match analyzer.analyze(request).await {
        Ok(response) => match protocol::result_frame(&response) {
            Ok(frame) => return frame,
            Err(e) => AnalysisError::Internal(format!("failed to serialize result: {e}")),
        },
        Err(e) => e,
    };

    warn!(code = error.code(), error = %error, "analysis failed");
    error_reply(Some(&unique_id), &error)
}

fn error_reply(unique_id: Option<&Value>, error: &AnalysisError) -> String {
    counter!(ANALYSIS_ERRORS_TOTAL, "code" => error.code()).increment(1);
    protocol::error_frame(unique_id, error.code(), &error.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
