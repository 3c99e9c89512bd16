//! API server — serves the dashboard page, control updates, and static assets.

use crate::render::render_page;
use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use dashboard_core::config::AppConfig;
use dashboard_core::DashboardResult;
use dashboard_reporting::{compose, DashboardState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// HTTP server for the dashboard.
pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    /// Compose and render the page once; every request reuses it.
    pub fn new(config: AppConfig, dashboard: DashboardState) -> DashboardResult<Self> {
        let page = compose(&dashboard);
        let index_html = render_page(&page)?;

        let state = AppState {
            dashboard: Arc::new(dashboard),
            page: Arc::new(page),
            index_html: Arc::from(index_html),
            start_time: Instant::now(),
        };
        Ok(Self { config, state })
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(rest::index))
            .route("/api/layout", get(rest::layout))
            .route("/api/update", post(rest::handle_update))
            // Operational endpoints
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .nest_service("/assets", ServeDir::new(&self.config.data.assets_dir))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the HTTP server. Blocks until shutdown.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }

    /// Start the Prometheus metrics exporter on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::NaiveDate;
    use dashboard_core::{Dataset, Record, SubscriptionType};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn record(
        country: &str,
        install: (i32, u32, u32),
        revenue: f64,
        subscription_type: SubscriptionType,
    ) -> Record {
        Record {
            user_id: format!("{country}-{revenue}"),
            country: country.to_string(),
            install_date: NaiveDate::from_ymd_opt(install.0, install.1, install.2).unwrap(),
            last_active_date: None,
            pro_upgrade_date: None,
            monthly_revenue: revenue,
            days_active: 12,
            churned: false,
            subscription_type,
        }
    }

    fn test_server() -> ApiServer {
        let dataset = Dataset::new(vec![
            record("US", (2024, 1, 4), 10.0, SubscriptionType::Free),
            record("US", (2024, 1, 9), 5.0, SubscriptionType::Pro),
            record("DE", (2024, 2, 14), 7.0, SubscriptionType::Free),
        ]);
        let dashboard = DashboardState::new(dataset, "Test Dashboard", "assets/logo.png");
        ApiServer::new(AppConfig::default(), dashboard).unwrap()
    }

    async fn post_update(body: Value) -> (StatusCode, Value) {
        let response = test_server()
            .router()
            .oneshot(
                Request::post("/api/update")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let response = test_server()
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<h1>Test Dashboard</h1>"));
        assert!(html.contains("month-dropdown"));
        assert!(html.contains("subscription-dropdown"));
    }

    #[tokio::test]
    async fn test_month_update() {
        let (status, body) =
            post_update(json!({ "control": "month-dropdown", "value": "2024-01" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target"], "revenue-chart");
        assert_eq!(
            body["figure"]["layout"]["title"]["text"],
            "Revenue from Each Country for 2024-01"
        );
        assert_eq!(body["figure"]["data"][0]["type"], "bar");
        assert_eq!(body["figure"]["data"][0]["y"], json!([15.0]));
    }

    #[tokio::test]
    async fn test_subscription_update() {
        let (status, body) =
            post_update(json!({ "control": "subscription-dropdown", "value": "Free" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target"], "country-map");
        assert_eq!(body["figure"]["data"][0]["type"], "choropleth");
        assert_eq!(body["figure"]["data"][0]["locations"], json!(["DE", "US"]));
    }

    #[tokio::test]
    async fn test_empty_month_is_not_an_error() {
        let (status, body) =
            post_update(json!({ "control": "month-dropdown", "value": "2031-05" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["figure"]["data"], json!([]));
    }

    #[tokio::test]
    async fn test_unknown_control_is_bad_request() {
        let (status, body) = post_update(json!({ "control": "nope", "value": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unknown_control");
    }

    #[tokio::test]
    async fn test_health_reports_dataset_size() {
        let response = test_server()
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["records"], 3);
        assert_eq!(body["months"], 2);
    }

    #[tokio::test]
    async fn test_layout_endpoint() {
        let response = test_server()
            .router()
            .oneshot(Request::get("/api/layout").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["rows"][0]["items"][0]["value"], "2024-01");
        assert_eq!(body["rows"][1]["items"][0]["value"], "Free");
    }
}
