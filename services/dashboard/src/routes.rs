use crate::infra::AppState;
use crate::upload::{upload_controls, upload_form};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use compliance_mapping::controls::{
    gap_list, ComplianceSummary, ControlDataset, ControlRecord, CountPivot, FrameworkCompliance,
};
use compliance_mapping::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummaryResponse {
    pub(crate) columns: Vec<String>,
    pub(crate) controls: Vec<ControlRecord>,
    pub(crate) status_summary: CountPivot,
    pub(crate) evidence_summary: CountPivot,
    pub(crate) compliance: Vec<FrameworkCompliance>,
    pub(crate) gaps: Vec<ControlRecord>,
}

/// Upload page, upload rendering, JSON summaries, and health checks. Needs an `AppState` extension.
pub(crate) fn dashboard_router() -> Router {
    Router::new()
        .route("/", get(upload_form))
        .route("/upload", post(upload_controls))
        .route("/api/v1/compliance/summary", post(summary_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn summary_endpoint(
    Json(payload): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let dataset = ControlDataset::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    let ComplianceSummary {
        status,
        evidence,
        compliance,
    } = ComplianceSummary::from_dataset(&dataset);
    let gaps = gap_list(&dataset).into_iter().cloned().collect();

    Ok(Json(SummaryResponse {
        columns: dataset.columns().to_vec(),
        controls: dataset.records().to_vec(),
        status_summary: status,
        evidence_summary: evidence,
        compliance,
        gaps,
    }))
}
