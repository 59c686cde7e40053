//! HTTP API Client
//!
//! Functions for talking to the local view server.

use gloo_net::http::{Request, Response};
use std::collections::HashMap;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8082/api/v1";

const API_URL_KEY: &str = "haccp_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(API_URL_KEY, url);
        }
    }
}

// ============ Domain Types ============

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Fridge {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub fridges: Vec<Fridge>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_vat: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    pub fridge_id: String,
    pub fridge_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DailyLog {
    pub id: String,
    pub date: String,
    pub readings: Vec<TemperatureReading>,
    pub signature: String,
}

// ============ Response Types ============

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecentEntry {
    pub id: String,
    pub date_label: String,
    pub fridges_checked: usize,
    pub signature: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DashboardSummary {
    pub total_entries: usize,
    pub recent: Vec<RecentEntry>,
    #[serde(default)]
    pub last_capture: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TemperatureForm {
    pub fridges: Vec<Fridge>,
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    pub can_submit: bool,
    pub webhook_enabled: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitResponse {
    pub log: DailyLog,
    pub webhook: String,
    #[serde(default)]
    pub webhook_error: Option<String>,
    #[serde(default)]
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
    #[serde(default)]
    pub notices: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// A rendered PDF ready to be saved
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub notices: Vec<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct ApiErrorDetail {
    #[allow(dead_code)]
    code: String,
    message: String,
}

/// Label form as sent to the server
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelRequest {
    Ingredient {
        name: String,
        prep_date: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        expiry_date: Option<String>,
    },
    Preparation {
        name: String,
        ingredients: String,
        prep_date: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        expiry_date: Option<String>,
    },
}

// ============ API Functions ============

async fn error_message(response: Response, fallback: &str) -> String {
    response
        .json::<ApiErrorBody>()
        .await
        .map(|body| body.error.message)
        .unwrap_or_else(|_| fallback.to_string())
}

async fn download(response: Response, fallback_name: &str) -> Result<Download, String> {
    let filename = response
        .headers()
        .get("content-disposition")
        .and_then(|value| filename_from_disposition(&value))
        .unwrap_or_else(|| fallback_name.to_string());
    let notices = response
        .headers()
        .get("x-haccp-notice")
        .map(|value| split_notices(&value))
        .unwrap_or_default();

    let bytes = response
        .binary()
        .await
        .map_err(|e| format!("Download error: {}", e))?;

    Ok(Download {
        filename,
        bytes,
        notices,
    })
}

/// Fetch the dashboard overview
pub async fn fetch_dashboard() -> Result<DashboardSummary, String> {
    let response = Request::get(&format!("{}/dashboard", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Fetch the fridges and the capture status
pub async fn fetch_temperature_form() -> Result<TemperatureForm, String> {
    let response = Request::get(&format!("{}/temperature", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Submit today's readings with the signature data URL
pub async fn submit_temperatures(
    readings: HashMap<String, String>,
    signature: String,
) -> Result<SubmitResponse, String> {
    #[derive(serde::Serialize)]
    struct SubmitRequest {
        readings: HashMap<String, String>,
        signature: String,
    }

    let response = Request::post(&format!("{}/temperature", get_api_base()))
        .json(&SubmitRequest { readings, signature })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Save failed").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Render a label PDF
pub async fn create_label(label: &LabelRequest) -> Result<Download, String> {
    let response = Request::post(&format!("{}/labels", get_api_base()))
        .json(label)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Label failed").await);
    }

    download(response, "etichetta.pdf").await
}

/// Render this month's report PDF
pub async fn fetch_report() -> Result<Download, String> {
    let response = Request::get(&format!("{}/report", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Export failed").await);
    }

    download(response, "Report_HACCP.pdf").await
}

/// Fetch current settings
pub async fn fetch_settings() -> Result<Settings, String> {
    let response = Request::get(&format!("{}/settings", get_api_base()))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Replace the settings
pub async fn save_settings(settings: &Settings) -> Result<SettingsResponse, String> {
    let response = Request::put(&format!("{}/settings", get_api_base()))
        .json(settings)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Save failed").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Add a fridge
pub async fn add_fridge(name: &str) -> Result<SettingsResponse, String> {
    #[derive(serde::Serialize)]
    struct AddFridgeRequest {
        name: String,
    }

    let response = Request::post(&format!("{}/settings/fridges", get_api_base()))
        .json(&AddFridgeRequest {
            name: name.to_string(),
        })
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Remove a fridge; the caller confirms first
pub async fn remove_fridge(id: &str) -> Result<SettingsResponse, String> {
    let response = Request::delete(&format!("{}/settings/fridges/{}", get_api_base(), id))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(error_message(response, "Unknown error").await);
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

/// Check API health
pub async fn check_health() -> Result<HealthResponse, String> {
    let health_url = get_api_base().replace("/api/v1", "/health");

    let response = Request::get(&health_url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err("API is not healthy".to_string());
    }

    response.json().await.map_err(|e| format!("Parse error: {}", e))
}

fn filename_from_disposition(value: &str) -> Option<String> {
    let start = value.find("filename=\"")? + "filename=\"".len();
    let end = value[start..].find('"')? + start;
    Some(value[start..end].to_string())
}

/// Repeated headers reach the browser joined by ", "
fn split_notices(value: &str) -> Vec<String> {
    value
        .split(", ")
        .filter(|notice| !notice.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"Report_HACCP_ottobre_2026.pdf\""),
            Some("Report_HACCP_ottobre_2026.pdf".to_string())
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }

    #[test]
    fn test_label_request_shape() {
        let label = LabelRequest::Preparation {
            name: "Ragù".to_string(),
            ingredients: "manzo, SEDANO".to_string(),
            prep_date: "2026-10-19".to_string(),
            expiry_date: None,
        };
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["kind"], "preparation");
        assert_eq!(json["prep_date"], "2026-10-19");
        assert!(json.get("expiry_date").is_none());
    }
}
