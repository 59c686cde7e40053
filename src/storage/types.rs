//! Core data types for the HACCP logbook
//!
//! This module defines the records persisted by the stores:
//! - `Fridge`: A refrigeration unit configured in Settings
//! - `Settings`: Fridge list, company identity and webhook URL
//! - `TemperatureReading`: One unit's value inside a daily log
//! - `SignatureImage`: Embedded raster signature (data URL)
//! - `DailyLog`: One signed, immutable submission
//!
//! Field names serialize in camelCase, the record format the browser build
//! wrote to local storage, so exported blobs load unchanged.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::error::{StorageError, StorageResult};

/// A logical refrigeration unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fridge {
    /// Opaque identifier, unique within Settings
    pub id: String,
    /// Display name
    pub name: String,
}

impl Fridge {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Process-wide settings, persisted as one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// External endpoint receiving a copy of each submission (may be empty)
    #[serde(default, alias = "googleSheetsUrl")]
    pub webhook_url: String,
    /// Configured units, in display order
    #[serde(default)]
    pub fridges: Vec<Fridge>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_address: String,
    /// VAT number (partita IVA)
    #[serde(default)]
    pub company_vat: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            fridges: vec![
                Fridge::new("1", "Frigo Carni"),
                Fridge::new("2", "Frigo Verdure"),
                Fridge::new("3", "Congelatore"),
            ],
            company_name: String::new(),
            company_address: String::new(),
            company_vat: String::new(),
        }
    }
}

impl Settings {
    /// Whether submissions should be forwarded to the webhook
    pub fn webhook_enabled(&self) -> bool {
        self.webhook_url.starts_with("http")
    }

    /// Whether every company identity field is filled in
    pub fn identity_complete(&self) -> bool {
        [&self.company_name, &self.company_address, &self.company_vat]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Look up a fridge by id
    pub fn fridge(&self, id: &str) -> Option<&Fridge> {
        self.fridges.iter().find(|f| f.id == id)
    }
}

/// A single temperature value captured for one unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    /// Reference to the fridge (by id, not ownership)
    pub fridge_id: String,
    /// Fridge name at capture time
    pub fridge_name: String,
    /// Degrees Celsius
    pub value: f64,
}

impl TemperatureReading {
    pub fn new(fridge: &Fridge, value: f64) -> Self {
        Self {
            fridge_id: fridge.id.clone(),
            fridge_name: fridge.name.clone(),
            value,
        }
    }

    /// `name: value°C`, as printed in reports
    pub fn label(&self) -> String {
        format!("{}: {}°C", self.fridge_name, self.value)
    }
}

/// Raster signature embedded as a `data:` URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SignatureImage(String);

impl SignatureImage {
    /// Wrap PNG bytes
    pub fn from_png(bytes: &[u8]) -> Self {
        Self::from_bytes("image/png", bytes)
    }

    /// Wrap encoded image bytes of the given mime type
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime, B64.encode(bytes)))
    }

    /// Accept a data URL produced elsewhere (e.g. a browser canvas)
    pub fn from_data_url(url: impl Into<String>) -> StorageResult<Self> {
        let url = url.into();
        let image = Self(url);
        if image.mime_type().is_none() {
            return Err(StorageError::Image(
                "expected a base64 data:image/... URL".to_string(),
            ));
        }
        image.decode()?;
        Ok(image)
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.payload().map(str::is_empty).unwrap_or(true)
    }

    /// Mime type of the embedded image, if this is a base64 image data URL
    pub fn mime_type(&self) -> Option<&str> {
        let header = self.0.strip_prefix("data:")?.split(',').next()?;
        let mime = header.strip_suffix(";base64")?;
        mime.starts_with("image/").then_some(mime)
    }

    /// Decode the embedded bytes
    pub fn decode(&self) -> StorageResult<Vec<u8>> {
        let payload = self
            .payload()
            .ok_or_else(|| StorageError::Image("not a data URL".to_string()))?;
        B64.decode(payload)
            .map_err(|e| StorageError::Image(format!("invalid base64 payload: {}", e)))
    }

    fn payload(&self) -> Option<&str> {
        self.0.split_once(',').map(|(_, payload)| payload)
    }
}

/// One signed daily submission. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    /// Time-derived token (epoch milliseconds)
    pub id: String,
    /// Capture instant (ISO 8601)
    pub date: DateTime<Utc>,
    /// One reading per fridge configured at capture time
    pub readings: Vec<TemperatureReading>,
    pub signature: SignatureImage,
    /// Capture instant in epoch milliseconds
    pub timestamp: i64,
}

impl DailyLog {
    /// Snapshot a submission taken at `at`
    pub fn new(
        readings: Vec<TemperatureReading>,
        signature: SignatureImage,
        at: DateTime<Utc>,
    ) -> Self {
        let millis = at.timestamp_millis();
        Self {
            id: millis.to_string(),
            date: at,
            readings,
            signature,
            timestamp: millis,
        }
    }
}
