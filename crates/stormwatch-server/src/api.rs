use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use stormwatch_common::types::BatchReport;

/// Summary returned to the external trigger after a completed batch.
#[derive(Serialize)]
pub struct CheckResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: BatchReport,
}

/// Runs one batch over all stored alert rules.
///
/// Always answers 200 with the run summary; the only 500 is a rule store
/// that could not be reached at all. Individual rule failures are inside
/// the summary, not the status code.
pub async fn check_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> Response {
    match state.runner.run().await {
        Ok(report) => (
            StatusCode::OK,
            Json(CheckResponse {
                message: "Alerts checked successfully".to_string(),
                report,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Alert batch aborted: rule store unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: i64,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: (Utc::now() - state.start_time).num_seconds(),
    })
}
