//! HACCP Desk view server
//!
//! Local HTTP layer for the browser front end, built with Axum. Every view
//! of the application is reachable by a direct route.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard` - Entry counter and recent activity
//! - `GET /api/v1/logs` - All daily logs, most recent first
//!
//! ## Temperature
//! - `GET /api/v1/temperature` - Fridges to fill in and session status
//! - `POST /api/v1/temperature` - Submit readings and signature
//!
//! ## Documents
//! - `POST /api/v1/labels` - 60×40 mm label PDF
//! - `GET /api/v1/report` - Current month's register PDF
//!
//! ## Settings
//! - `GET /api/v1/settings` - Current settings
//! - `PUT /api/v1/settings` - Replace settings
//! - `POST /api/v1/settings/fridges` - Add a fridge
//! - `DELETE /api/v1/settings/fridges/:id` - Remove a fridge
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use haccp_desk::api::{serve, ApiConfig, AppState};
//! use haccp_desk::capture::HttpWebhook;
//! use haccp_desk::storage::FileKvStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let kv = Arc::new(FileKvStore::open("./haccp_data")?);
//!     let webhook = Arc::new(HttpWebhook::new(std::time::Duration::from_secs(10))?);
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(kv, webhook, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;
    let request_timeout = state.config.request_timeout;

    let api_routes = Router::new()
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route("/logs", get(routes::logs::list_logs))
        .route(
            "/temperature",
            get(routes::temperature::get_form).post(routes::temperature::submit),
        )
        .route("/labels", post(routes::labels::create_label))
        .route("/report", get(routes::report::monthly_report))
        .route(
            "/settings",
            get(routes::settings::get_settings).put(routes::settings::save_settings),
        )
        .route("/settings/fridges", post(routes::settings::add_fridge))
        .route("/settings/fridges/:id", delete(routes::settings::remove_fridge))
        .layer(DefaultBodyLimit::max(max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()) // the front end is served from another local port
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("HACCP Desk view server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("HACCP Desk view server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{SettingsResponse, SubmitTemperatureResponse, TemperatureFormResponse};
    use crate::capture::{ClientPoint, HttpWebhook, SignaturePad, SurfaceGeometry};
    use crate::dashboard::DashboardSummary;
    use crate::storage::{Fridge, KeyValueStore, MemoryKvStore, Settings};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let webhook = Arc::new(HttpWebhook::new(Duration::from_secs(1)).unwrap());
        let state = AppState::new(kv, webhook, ApiConfig::default());
        build_router(state)
    }

    fn signature_url() -> String {
        let mut pad = SignaturePad::default();
        let geometry = SurfaceGeometry::at(0.0, 0.0);
        pad.pointer_down(ClientPoint::new(10.0, 10.0), &geometry);
        pad.pointer_move(ClientPoint::new(120.0, 60.0), &geometry);
        pad.pointer_up().unwrap();
        pad.pending().unwrap().as_data_url().to_string()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn seed_two_fridges(app: &Router) {
        let settings = Settings {
            fridges: vec![Fridge::new("a", "Frigo Carni"), Fridge::new("b", "Congelatore")],
            ..Settings::default()
        };
        let response = send(app, "PUT", "/api/v1/settings", Some(serde_json::to_value(settings).unwrap())).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_routes() {
        let app = create_test_app();
        for uri in ["/health/live", "/health/ready", "/health"] {
            let response = send(&app, "GET", uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_default_settings() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/v1/settings", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let settings: Settings = json(response).await;
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_submission_end_to_end() {
        let app = create_test_app();
        seed_two_fridges(&app).await;

        let before: DashboardSummary = json(send(&app, "GET", "/api/v1/dashboard", None).await).await;

        let body = serde_json::json!({
            "readings": {"a": "3.5", "b": "-18.0"},
            "signature": signature_url(),
        });
        let response = send(&app, "POST", "/api/v1/temperature", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let receipt: SubmitTemperatureResponse = json(response).await;
        assert_eq!(receipt.webhook, "not_configured");
        let values: Vec<(String, f64)> = receipt
            .log
            .readings
            .iter()
            .map(|r| (r.fridge_name.clone(), r.value))
            .collect();
        assert_eq!(
            values,
            vec![("Frigo Carni".to_string(), 3.5), ("Congelatore".to_string(), -18.0)]
        );

        let after: DashboardSummary = json(send(&app, "GET", "/api/v1/dashboard", None).await).await;
        assert_eq!(after.total_entries, before.total_entries + 1);
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected_while_success_displays() {
        let app = create_test_app();
        let body = serde_json::json!({
            "readings": {"1": "4"},
            "signature": signature_url(),
        });

        let first = send(&app, "POST", "/api/v1/temperature", Some(body.clone())).await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = send(&app, "POST", "/api/v1/temperature", Some(body)).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let form: TemperatureFormResponse = json(send(&app, "GET", "/api/v1/temperature", None).await).await;
        assert_eq!(form.status, "success");
        assert!(!form.can_submit);
    }

    /// Accepts every delivery, but only after `delay`
    struct SlowWebhook {
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl crate::capture::WebhookSender for SlowWebhook {
        async fn send(
            &self,
            _url: &str,
            _payload: &crate::capture::WebhookPayload,
        ) -> Result<(), crate::capture::WebhookError> {
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
    }

    async fn wait_while_saving(app: &Router) -> TemperatureFormResponse {
        for _ in 0..100 {
            let form: TemperatureFormResponse =
                json(send(app, "GET", "/api/v1/temperature", None).await).await;
            if form.status != "saving" {
                return form;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("capture session stuck in saving");
    }

    #[tokio::test]
    async fn test_timed_out_submission_does_not_wedge_the_session() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let webhook = Arc::new(SlowWebhook {
            delay: Duration::from_secs(1),
        });
        let config = ApiConfig {
            request_timeout: Duration::from_millis(200),
            success_display: Duration::from_millis(100),
            ..ApiConfig::default()
        };
        let app = build_router(AppState::new(kv, webhook, config));

        let settings = Settings {
            webhook_url: "http://hooks.example.test/haccp".to_string(),
            ..Settings::default()
        };
        let response = send(&app, "PUT", "/api/v1/settings", Some(serde_json::to_value(settings).unwrap())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = serde_json::json!({
            "readings": {"1": "4", "2": "5", "3": "-18"},
            "signature": signature_url(),
        });
        let first = send(&app, "POST", "/api/v1/temperature", Some(body.clone())).await;
        assert_eq!(first.status(), StatusCode::REQUEST_TIMEOUT);

        // The save finishes behind the timed out request
        let form = wait_while_saving(&app).await;
        assert_ne!(form.status, "error");
        let logs: crate::api::dto::LogListResponse = json(send(&app, "GET", "/api/v1/logs", None).await).await;
        assert_eq!(logs.total, 1);

        tokio::time::sleep(Duration::from_millis(300)).await;
        let form: TemperatureFormResponse = json(send(&app, "GET", "/api/v1/temperature", None).await).await;
        assert_eq!(form.status, "idle");
        assert!(form.can_submit);

        let second = send(&app, "POST", "/api/v1/temperature", Some(body)).await;
        assert_ne!(second.status(), StatusCode::CONFLICT);
        wait_while_saving(&app).await;
        let logs: crate::api::dto::LogListResponse = json(send(&app, "GET", "/api/v1/logs", None).await).await;
        assert_eq!(logs.total, 2);
    }

    #[tokio::test]
    async fn test_missing_signature_is_bad_request() {
        let app = create_test_app();
        let body = serde_json::json!({"readings": {"1": "4"}, "signature": ""});

        let response = send(&app, "POST", "/api/v1/temperature", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let logs: crate::api::dto::LogListResponse = json(send(&app, "GET", "/api/v1/logs", None).await).await;
        assert_eq!(logs.total, 0);
    }

    #[tokio::test]
    async fn test_report_without_entries_is_not_found() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/v1/report", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_download() {
        let app = create_test_app();
        let body = serde_json::json!({"readings": {"1": "4"}, "signature": signature_url()});
        send(&app, "POST", "/api/v1/temperature", Some(body)).await;

        let response = send(&app, "GET", "/api/v1/report", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        // Default settings have no company identity
        assert!(response.headers().get(routes::NOTICE_HEADER).is_some());
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("Report_HACCP_"));
    }

    #[tokio::test]
    async fn test_label_download() {
        let app = create_test_app();
        let body = serde_json::json!({
            "kind": "ingredient",
            "name": "Pomodoro San Marzano",
            "prep_date": "2026-10-19",
        });

        let response = send(&app, "POST", "/api/v1/labels", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("etichetta_Pomodoro_San_Marzano.pdf"));

        let blank = serde_json::json!({"kind": "ingredient", "name": " ", "prep_date": "2026-10-19"});
        let response = send(&app, "POST", "/api/v1/labels", Some(blank)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fridge_add_and_remove() {
        let app = create_test_app();

        let response = send(
            &app,
            "POST",
            "/api/v1/settings/fridges",
            Some(serde_json::json!({"name": "Vetrina"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let added: SettingsResponse = json(response).await;
        assert_eq!(added.settings.fridges.len(), 4);

        let response = send(&app, "DELETE", "/api/v1/settings/fridges/2", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let removed: SettingsResponse = json(response).await;
        assert!(removed.settings.fridge("2").is_none());

        let response = send(&app, "DELETE", "/api/v1/settings/fridges/2", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_settings_returns_url_warning() {
        let app = create_test_app();
        let settings = Settings {
            webhook_url: "script.google.com/exec".to_string(),
            ..Settings::default()
        };

        let response = send(&app, "PUT", "/api/v1/settings", Some(serde_json::to_value(settings).unwrap())).await;
        let saved: SettingsResponse = json(response).await;
        assert!(saved.notices[0].starts_with("Warning"));
    }
}
