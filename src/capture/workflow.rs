//! Submission state machine
//!
//! One capture session owns the reading draft and the signature surface.
//! A submission moves `Idle -> Saving -> {Success, Error}`. Success is held
//! for a short display delay, then `settle` clears the form and returns to
//! `Idle`. Error is terminal for that attempt; the user resubmits.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::capture::error::{CaptureError, CaptureResult};
use crate::capture::readings::ReadingDraft;
use crate::capture::signature::SignaturePad;
use crate::capture::webhook::{WebhookPayload, WebhookSender};
use crate::prompt::Prompter;
use crate::storage::{DailyLog, LogStore, Settings, SettingsStore, SignatureImage, TemperatureReading};

/// Default time the success state is displayed
pub const DEFAULT_SUCCESS_DISPLAY_MS: u64 = 2_000;

/// Status of the current submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureStatus {
    #[default]
    Idle,
    Saving,
    Success,
    Error(String),
}

impl CaptureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStatus::Idle => "idle",
            CaptureStatus::Saving => "saving",
            CaptureStatus::Success => "success",
            CaptureStatus::Error(_) => "error",
        }
    }
}

/// Outcome of the webhook leg of a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDelivery {
    /// No `http` URL configured
    NotConfigured,
    /// Request sent; the endpoint's answer is unknown
    Sent,
    /// Transport failure, the log was still saved locally
    Failed(String),
}

/// Result of an accepted submission
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub log: DailyLog,
    pub delivery: WebhookDelivery,
}

/// Collaborators of a submission
pub struct CaptureDeps<'a> {
    pub settings: &'a SettingsStore,
    pub logs: &'a LogStore,
    pub webhook: &'a dyn WebhookSender,
    pub prompter: &'a dyn Prompter,
}

/// The Temperature view's form and submission state
#[derive(Debug, Clone)]
pub struct TemperatureCapture {
    draft: ReadingDraft,
    pad: SignaturePad,
    status: CaptureStatus,
    success_display: Duration,
}

impl Default for TemperatureCapture {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SUCCESS_DISPLAY_MS))
    }
}

impl TemperatureCapture {
    pub fn new(success_display: Duration) -> Self {
        Self {
            draft: ReadingDraft::new(),
            pad: SignaturePad::default(),
            status: CaptureStatus::Idle,
            success_display,
        }
    }

    pub fn readings(&self) -> &ReadingDraft {
        &self.draft
    }

    pub fn readings_mut(&mut self) -> &mut ReadingDraft {
        &mut self.draft
    }

    pub fn signature(&self) -> &SignaturePad {
        &self.pad
    }

    pub fn signature_mut(&mut self) -> &mut SignaturePad {
        &mut self.pad
    }

    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    /// How long `Success` is displayed before `settle`
    pub fn success_display(&self) -> Duration {
        self.success_display
    }

    /// False while saving or while a success is still displayed
    pub fn can_submit(&self) -> bool {
        !matches!(self.status, CaptureStatus::Saving | CaptureStatus::Success)
    }

    /// Validate the form, persist a new daily log and forward it to the
    /// webhook when one is configured.
    ///
    /// Validation failures are notified and leave every store and the status
    /// untouched. The log is appended before the webhook is contacted, and a
    /// webhook failure only produces a warning.
    pub async fn submit(
        &mut self,
        deps: &CaptureDeps<'_>,
        now: DateTime<Utc>,
    ) -> CaptureResult<SubmitReceipt> {
        if !self.can_submit() {
            return Err(CaptureError::Busy);
        }

        let settings = deps.settings.load().await;
        let (readings, signature) = match self.validate(&settings) {
            Ok(validated) => validated,
            Err(e) => {
                deps.prompter.notify(&e.to_string());
                return Err(e);
            }
        };

        self.status = CaptureStatus::Saving;
        let log = DailyLog::new(readings, signature, now);

        if let Err(e) = deps.logs.append(log.clone()).await {
            let err = CaptureError::from(e);
            tracing::error!(error = %err, "Failed to save daily log");
            self.status = CaptureStatus::Error(err.to_string());
            deps.prompter.notify(&err.to_string());
            return Err(err);
        }

        let delivery = if settings.webhook_enabled() {
            let payload = WebhookPayload::from_log(&log);
            match deps.webhook.send(&settings.webhook_url, &payload).await {
                Ok(()) => WebhookDelivery::Sent,
                Err(e) => {
                    tracing::warn!(error = %e, "Webhook delivery failed, log kept locally");
                    deps.prompter.notify(&format!(
                        "Saved locally, but the webhook could not be reached: {}",
                        e
                    ));
                    WebhookDelivery::Failed(e.to_string())
                }
            }
        } else {
            WebhookDelivery::NotConfigured
        };

        self.status = CaptureStatus::Success;
        deps.prompter.notify("Temperature log saved");
        tracing::info!(
            id = %log.id,
            readings = log.readings.len(),
            "Temperature log submitted"
        );

        Ok(SubmitReceipt { log, delivery })
    }

    /// Leave the success state: clear the form and return to `Idle`.
    /// Returns whether anything changed.
    pub fn settle(&mut self) -> bool {
        if self.status != CaptureStatus::Success {
            return false;
        }
        self.draft.clear();
        self.pad.clear();
        self.status = CaptureStatus::Idle;
        true
    }

    /// Settle a shared session once `delay` has passed.
    ///
    /// The lock is only taken after the delay, so readers observe `Success`
    /// while it is displayed.
    pub fn settle_later(session: Arc<Mutex<Self>>, delay: Duration) -> JoinHandle<bool> {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let settled = session.lock().await.settle();
            if settled {
                tracing::debug!("Capture session reset");
            }
            settled
        })
    }

    fn validate(&self, settings: &Settings) -> CaptureResult<(Vec<TemperatureReading>, SignatureImage)> {
        let signature = self
            .pad
            .pending()
            .cloned()
            .ok_or(CaptureError::MissingSignature)?;
        let readings = self.draft.to_readings(&settings.fridges)?;
        Ok((readings, signature))
    }
}
