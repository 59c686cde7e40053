//! Webhook forwarding
//!
//! Each submission can be mirrored to a user-configured HTTP endpoint (for
//! example a spreadsheet script). Delivery is one-way: the request is sent
//! once, the response is never read back, and nothing is retried. A request
//! the endpoint rejected is therefore indistinguishable from a delivered one;
//! only transport failures (unreachable host, timeout) are reported.

use async_trait::async_trait;
use chrono::{Local, TimeZone};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::storage::{DailyLog, TemperatureReading};

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Simplified body posted to the webhook
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookPayload {
    /// `dd/mm/yyyy`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
    pub readings: Vec<TemperatureReading>,
    /// Signature data URL
    pub signature: String,
}

impl WebhookPayload {
    /// Payload for `log`, dates in the local time zone
    pub fn from_log(log: &DailyLog) -> Self {
        Self::from_log_in(log, &Local)
    }

    /// Payload for `log`, dates in `tz`
    pub fn from_log_in<Tz>(log: &DailyLog, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let local = log.date.with_timezone(tz);
        Self {
            date: local.format("%d/%m/%Y").to_string(),
            time: local.format("%H:%M:%S").to_string(),
            readings: log.readings.clone(),
            signature: log.signature.as_data_url().to_string(),
        }
    }
}

/// Outbound side of the webhook
#[async_trait]
pub trait WebhookSender: Send + Sync {
    /// Send `payload` to `url` once
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError>;
}

/// reqwest-backed webhook sender
#[derive(Debug, Clone)]
pub struct HttpWebhook {
    client: Client,
}

impl HttpWebhook {
    /// Create a sender whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookSender for HttpWebhook {
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        // Plain-text JSON body, as spreadsheet script endpoints expect
        let body = serde_json::to_string(payload)
            .map_err(|e| WebhookError::Serialization(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WebhookError::Timeout
                } else if e.is_connect() {
                    WebhookError::Unavailable
                } else {
                    WebhookError::Request(e)
                }
            })?;

        tracing::debug!(url = %url, status = %response.status(), "Webhook request sent");
        Ok(())
    }
}

/// Errors that can occur when forwarding to the webhook
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Webhook endpoint unreachable")]
    Unavailable,

    #[error("Webhook request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Fridge, SignatureImage};
    use axum::{extract::State, http::StatusCode, routing::post, Router};
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    fn sample_log() -> DailyLog {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 7, 5, 9).unwrap();
        DailyLog::new(
            vec![TemperatureReading::new(&Fridge::new("1", "Frigo Carni"), 3.5)],
            SignatureImage::from_png(&[1, 2, 3]),
            at,
        )
    }

    async fn spawn_endpoint(status: StatusCode) -> (String, Arc<Mutex<Vec<String>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route(
                "/hook",
                post(
                    move |State(received): State<Arc<Mutex<Vec<String>>>>, body: String| async move {
                        received.lock().unwrap().push(body);
                        status
                    },
                ),
            )
            .with_state(Arc::clone(&received));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/hook", addr), received)
    }

    #[test]
    fn test_payload_format() {
        let payload = WebhookPayload::from_log_in(&sample_log(), &Utc);
        assert_eq!(payload.date, "19/10/2026");
        assert_eq!(payload.time, "07:05:09");
        assert!(payload.signature.starts_with("data:image/png;base64,"));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["readings"][0]["fridgeName"], "Frigo Carni");
        assert_eq!(json["readings"][0]["value"], 3.5);
    }

    #[tokio::test]
    async fn test_delivers_plain_text_json() {
        let (url, received) = spawn_endpoint(StatusCode::OK).await;
        let webhook = HttpWebhook::new(Duration::from_secs(5)).unwrap();
        let payload = WebhookPayload::from_log_in(&sample_log(), &Utc);

        webhook.send(&url, &payload).await.unwrap();

        let bodies = received.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        let body: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(body["date"], "19/10/2026");
    }

    #[tokio::test]
    async fn test_rejected_request_is_not_reported() {
        let (url, received) = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
        let webhook = HttpWebhook::new(Duration::from_secs(5)).unwrap();
        let payload = WebhookPayload::from_log_in(&sample_log(), &Utc);

        assert!(webhook.send(&url, &payload).await.is_ok());
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let webhook = HttpWebhook::new(Duration::from_secs(5)).unwrap();
        let payload = WebhookPayload::from_log_in(&sample_log(), &Utc);
        let result = webhook.send(&format!("http://{}/hook", addr), &payload).await;

        assert!(result.is_err());
    }
}
