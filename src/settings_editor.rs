//! Settings editor
//!
//! Edits a draft copy of the settings. Nothing reaches the store until
//! `save`, which overwrites the persisted record wholesale.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::prompt::Prompter;
use crate::storage::{Fridge, Settings, SettingsStore, StorageError};

/// Errors raised while editing settings
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Fridge name cannot be empty")]
    BlankName,

    #[error("Fridge not found: {0}")]
    UnknownFridge(String),

    #[error("Could not save settings: {0}")]
    Storage(#[from] StorageError),
}

pub type EditorResult<T> = Result<T, EditorError>;

/// Draft copy of the settings
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsEditor {
    draft: Settings,
}

impl SettingsEditor {
    pub fn new(settings: Settings) -> Self {
        Self { draft: settings }
    }

    /// Start from the store's current settings
    pub async fn from_store(store: &SettingsStore) -> Self {
        Self::new(store.load().await)
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    /// Add a fridge with a time-derived id, bumped past any id already in
    /// the draft
    pub fn add_fridge(&mut self, name: &str, now: DateTime<Utc>) -> EditorResult<&Fridge> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::BlankName);
        }

        let mut token = now.timestamp_millis();
        while self.draft.fridge(&token.to_string()).is_some() {
            token += 1;
        }

        let index = self.draft.fridges.len();
        self.draft.fridges.push(Fridge::new(token.to_string(), name));
        tracing::debug!(id = token, name = %name, "Fridge added to draft");
        Ok(&self.draft.fridges[index])
    }

    /// Remove a fridge once the user confirms.
    ///
    /// Returns `false` when the user declined. Logs already captured keep
    /// their snapshot of the fridge name.
    pub fn remove_fridge(&mut self, id: &str, prompter: &dyn Prompter) -> EditorResult<bool> {
        let fridge = self
            .draft
            .fridge(id)
            .ok_or_else(|| EditorError::UnknownFridge(id.to_string()))?;

        let question = format!("Remove fridge \"{}\"?", fridge.name);
        if !prompter.confirm(&question) {
            return Ok(false);
        }

        self.draft.fridges.retain(|f| f.id != id);
        Ok(true)
    }

    pub fn set_webhook_url(&mut self, url: &str) {
        self.draft.webhook_url = url.trim().to_string();
    }

    pub fn set_company_name(&mut self, name: &str) {
        self.draft.company_name = name.to_string();
    }

    pub fn set_company_address(&mut self, address: &str) {
        self.draft.company_address = address.to_string();
    }

    pub fn set_company_vat(&mut self, vat: &str) {
        self.draft.company_vat = vat.to_string();
    }

    /// Persist the draft, replacing the stored settings.
    ///
    /// A webhook URL without an `http://` or `https://` prefix is saved
    /// anyway, with a warning.
    pub async fn save(&self, store: &SettingsStore, prompter: &dyn Prompter) -> EditorResult<()> {
        let url = &self.draft.webhook_url;
        if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
            prompter.notify(
                "Warning: the webhook URL does not start with http:// or https:// and will not be used",
            );
        }

        store.save(self.draft.clone()).await?;
        prompter.notify("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::CollectingPrompter;
    use crate::storage::MemoryKvStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_add_fridge_uses_time_token() {
        let mut editor = SettingsEditor::new(Settings::default());
        let fridge = editor.add_fridge("  Vetrina  ", at()).unwrap().clone();

        assert_eq!(fridge.id, at().timestamp_millis().to_string());
        assert_eq!(fridge.name, "Vetrina");
        assert_eq!(editor.draft().fridges.len(), 4);
    }

    #[test]
    fn test_colliding_ids_are_bumped() {
        let mut editor = SettingsEditor::new(Settings::default());
        let first = editor.add_fridge("A", at()).unwrap().id.clone();
        let second = editor.add_fridge("B", at()).unwrap().id.clone();

        assert_ne!(first, second);
        assert_eq!(second, (at().timestamp_millis() + 1).to_string());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut editor = SettingsEditor::new(Settings::default());
        assert!(matches!(editor.add_fridge("   ", at()), Err(EditorError::BlankName)));
        assert_eq!(editor.draft(), &Settings::default());
    }

    #[test]
    fn test_remove_requires_confirmation() {
        let mut editor = SettingsEditor::new(Settings::default());

        assert!(!editor.remove_fridge("2", &CollectingPrompter::new(false)).unwrap());
        assert_eq!(editor.draft().fridges.len(), 3);

        assert!(editor.remove_fridge("2", &CollectingPrompter::new(true)).unwrap());
        assert!(editor.draft().fridge("2").is_none());

        assert!(matches!(
            editor.remove_fridge("2", &CollectingPrompter::new(true)),
            Err(EditorError::UnknownFridge(_))
        ));
    }

    #[tokio::test]
    async fn test_nothing_persists_until_save() {
        let store = SettingsStore::open(Arc::new(MemoryKvStore::new()));
        let mut editor = SettingsEditor::from_store(&store).await;
        editor.set_company_name("Trattoria Da Mario");
        editor.add_fridge("Vetrina", at()).unwrap();

        assert_eq!(store.load().await, Settings::default());

        let prompter = CollectingPrompter::new(true);
        editor.save(&store, &prompter).await.unwrap();

        let saved = store.load().await;
        assert_eq!(saved.company_name, "Trattoria Da Mario");
        assert_eq!(saved.fridges.len(), 4);
        assert_eq!(prompter.notices(), vec!["Settings saved"]);
    }

    #[tokio::test]
    async fn test_non_http_url_warns_but_saves() {
        let store = SettingsStore::open(Arc::new(MemoryKvStore::new()));
        let mut editor = SettingsEditor::from_store(&store).await;
        editor.set_webhook_url("script.google.com/macros/s/x/exec");

        let prompter = CollectingPrompter::new(true);
        editor.save(&store, &prompter).await.unwrap();

        assert_eq!(store.load().await.webhook_url, "script.google.com/macros/s/x/exec");
        let notices = prompter.notices();
        assert_eq!(notices.len(), 2);
        assert!(notices[0].starts_with("Warning"));
    }
}
