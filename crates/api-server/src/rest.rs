//! REST handlers for the dashboard page, control updates, and operational
//! endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use dashboard_core::DashboardError;
use dashboard_reporting::{dispatch, ChartUpdate, ControlEvent, DashboardPage, DashboardState};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Maximum length of a control id or value.
const MAX_FIELD_LEN: usize = 256;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardState>,
    pub page: Arc<DashboardPage>,
    pub index_html: Arc<str>,
    pub start_time: Instant,
}

fn validate_event(event: &ControlEvent) -> Result<(), &'static str> {
    if event.control.is_empty() {
        return Err("'control' must not be empty");
    }
    if event.control.len() > MAX_FIELD_LEN || event.value.len() > MAX_FIELD_LEN {
        return Err("control event field exceeds maximum length");
    }
    Ok(())
}

fn bad_request(error: &str, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

/// GET / — The rendered dashboard page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// GET /api/layout — Page structure with the initial chart specs.
pub async fn layout(State(state): State<AppState>) -> Json<DashboardPage> {
    Json(state.page.as_ref().clone())
}

/// POST /api/update — Rebuild the chart bound to a control.
pub async fn handle_update(
    State(state): State<AppState>,
    Json(event): Json<ControlEvent>,
) -> Result<Json<ChartUpdate>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(msg) = validate_event(&event) {
        warn!(control = %event.control, error = msg, "Control event validation failed");
        metrics::counter!("dashboard.update_errors").increment(1);
        return Err(bad_request("invalid_control_event", msg.to_string()));
    }

    match dispatch(&state.dashboard, &event) {
        Ok(update) => {
            info!(
                control = %event.control,
                value = %event.value,
                target = %update.target,
                "Chart updated"
            );
            metrics::counter!("dashboard.updates").increment(1);
            Ok(Json(update))
        }
        Err(e @ DashboardError::UnknownControl(_)) => {
            warn!(error = %e, "Rejected control event");
            metrics::counter!("dashboard.update_errors").increment(1);
            Err(bad_request("unknown_control", e.to_string()))
        }
        Err(e) => {
            warn!(error = %e, control = %event.control, "Chart update failed");
            metrics::counter!("dashboard.update_errors").increment(1);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "update_failed".to_string(),
                    message: "Internal processing error".to_string(),
                }),
            ))
        }
    }
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        records: state.dashboard.dataset.len(),
        months: state.dashboard.months.len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — Ready once the dataset is loaded, which precedes serving.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live — Liveness check.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
    pub months: usize,
    pub uptime_secs: u64,
}
