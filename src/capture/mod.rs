//! Temperature capture
//!
//! The Temperature view's logic: per-fridge reading entry with a sign
//! toggle, a freehand signature surface, the submission state machine and
//! the optional webhook that mirrors each submission.
//!
//! # Example
//!
//! ```rust,ignore
//! use haccp_desk::capture::{CaptureDeps, TemperatureCapture};
//!
//! let mut capture = TemperatureCapture::default();
//! capture.readings_mut().set("1", "3.5");
//! capture.signature_mut().adopt(signature);
//!
//! let receipt = capture.submit(&deps, chrono::Utc::now()).await?;
//! println!("saved {}", receipt.log.id);
//! ```

pub mod error;
pub mod readings;
pub mod signature;
pub mod webhook;
pub mod workflow;

pub use error::{CaptureError, CaptureResult};
pub use readings::{parse_entry, EntryValue, ReadingDraft};
pub use signature::{ClientPoint, SignaturePad, SurfaceGeometry, SURFACE_HEIGHT, SURFACE_WIDTH};
pub use webhook::{HttpWebhook, WebhookError, WebhookPayload, WebhookSender};
pub use workflow::{
    CaptureDeps, CaptureStatus, SubmitReceipt, TemperatureCapture, WebhookDelivery,
    DEFAULT_SUCCESS_DISPLAY_MS,
};
