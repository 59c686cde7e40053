//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::capture::WebhookDelivery;
use crate::storage::{DailyLog, Fridge, Settings};

// ============================================
// LOG DTOs
// ============================================

/// All daily logs, most recent first
#[derive(Debug, Serialize, Deserialize)]
pub struct LogListResponse {
    pub total: usize,
    pub logs: Vec<DailyLog>,
}

// ============================================
// TEMPERATURE DTOs
// ============================================

/// State of the Temperature view
#[derive(Debug, Serialize, Deserialize)]
pub struct TemperatureFormResponse {
    /// Units to fill in, in display order
    pub fridges: Vec<Fridge>,
    /// idle, saving, success or error
    pub status: String,
    /// Message of the last failed attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub can_submit: bool,
    pub webhook_enabled: bool,
}

/// Submission of the Temperature view
#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitTemperatureRequest {
    /// Raw entry text keyed by fridge id ("" and "-" are blank)
    #[serde(default)]
    pub readings: HashMap<String, String>,
    /// Signature as a `data:image/png;base64,...` URL
    #[serde(default)]
    pub signature: String,
}

/// Accepted submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTemperatureResponse {
    pub log: DailyLog,
    /// not_configured, sent or failed
    pub webhook: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_error: Option<String>,
    pub notices: Vec<String>,
}

impl SubmitTemperatureResponse {
    pub fn new(log: DailyLog, delivery: WebhookDelivery, notices: Vec<String>) -> Self {
        let (webhook, webhook_error) = match delivery {
            WebhookDelivery::NotConfigured => ("not_configured", None),
            WebhookDelivery::Sent => ("sent", None),
            WebhookDelivery::Failed(e) => ("failed", Some(e)),
        };

        Self {
            log,
            webhook: webhook.to_string(),
            webhook_error,
            notices,
        }
    }
}

// ============================================
// SETTINGS DTOs
// ============================================

/// Add-fridge request
#[derive(Debug, Deserialize, Serialize)]
pub struct AddFridgeRequest {
    pub name: String,
}

/// Settings after a change
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
    pub notices: Vec<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Number of daily logs
    pub entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
