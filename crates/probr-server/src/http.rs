//! `POST /` analysis endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use metrics::counter;
use probr_analysis::{AnalysisError, AnalysisRequest, AnalysisResponse};
use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::metrics::{ANALYSIS_ERRORS_TOTAL, ANALYSIS_REQUESTS_TOTAL};
use crate::server::AppState;

/// An error reply: `{"unique_id": ..|null, "error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    unique_id: Option<Value>,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Wrap an analysis error, echoing `unique_id` when it is known.
    pub fn from_analysis(error: &AnalysisError, unique_id: Option<Value>) -> Self {
        Self {
            status: status_for(error),
            unique_id,
            code: error.code(),
            message: error.to_string(),
        }
    }

    /// HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        counter!(ANALYSIS_ERRORS_TOTAL, "code" => self.code).increment(1);
        let body = json!({
            "unique_id": self.unique_id.unwrap_or(Value::Null),
            "error": { "code": self.code, "message": self.message },
        });
        (self.status, Json(body)).into_response()
    }
}

/// Status code for an analysis error.
pub fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        AnalysisError::MessageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AnalysisError::GrammarCheck(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::GrammarUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /
///
/// The body is taken as raw bytes so that a missing content type or a
/// malformed document still gets the JSON error shape.
#[instrument(skip_all)]
pub async fn analyze_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    counter!(ANALYSIS_REQUESTS_TOTAL, "transport" => "http").increment(1);

    let body = body.map_err(|rejection| {
        let status = rejection.status();
        warn!(%status, "request body rejected");
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError {
                status,
                unique_id: None,
                code: "MESSAGE_TOO_LARGE",
                message: format!(
                    "request body exceeds {} bytes",
                    state.config.max_frame_bytes
                ),
            }
        } else {
            ApiError::from_analysis(&AnalysisError::InvalidRequest(rejection.body_text()), None)
        }
    })?;

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "request body is not JSON");
        ApiError::from_analysis(&AnalysisError::from(e), None)
    })?;
    let unique_id = value.get("unique_id").cloned();

    let request = AnalysisRequest::from_value(value).map_err(|e| {
        warn!(error = %e, "invalid analysis request");
        ApiError::from_analysis(&e, unique_id.clone())
    })?;

    match state.analyzer.analyze(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!(code = e.code(), error = %e, "analysis failed");
            Err(ApiError::from_analysis(&e, unique_id))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
