//! Per-fridge reading entry
//!
//! Readings are kept as the raw text the user typed so that the sign toggle
//! can hold a pending `-` before any digit has been entered.

use std::collections::HashMap;

use crate::capture::error::{CaptureError, CaptureResult};
use crate::storage::{Fridge, TemperatureReading};

/// Interpretation of one raw entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryValue {
    /// Empty or sign-only
    Blank,
    Number(f64),
    /// Text that is not a finite number
    Invalid,
}

/// Interpret a raw entry. A decimal comma is accepted.
pub fn parse_entry(raw: &str) -> EntryValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return EntryValue::Blank;
    }

    match trimmed.replace(',', ".").parse::<f64>() {
        // -0 prints as "-0"; record plain zero
        Ok(value) if value.is_finite() => EntryValue::Number(if value == 0.0 { 0.0 } else { value }),
        _ => EntryValue::Invalid,
    }
}

/// Raw reading entries keyed by fridge id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingDraft {
    entries: HashMap<String, String>,
}

impl ReadingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text for a fridge (empty if never entered)
    pub fn get(&self, fridge_id: &str) -> &str {
        self.entries.get(fridge_id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, fridge_id: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(fridge_id.into(), raw.into());
    }

    /// Flip the sign of a fridge's entry.
    ///
    /// Empty becomes a pending `-`, a pending `-` becomes empty, a number is
    /// negated textually so two toggles restore the exact original text.
    /// Anything else is left alone.
    pub fn toggle_sign(&mut self, fridge_id: &str) {
        let current = self.get(fridge_id);
        let next = match current {
            "" => "-".to_string(),
            "-" => String::new(),
            text => match parse_entry(text) {
                EntryValue::Number(_) => match text.strip_prefix('-') {
                    Some(positive) => positive.to_string(),
                    None => format!("-{}", text),
                },
                _ => return,
            },
        };
        self.entries.insert(fridge_id.to_string(), next);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether at least one of `fridges` has a numeric entry
    pub fn has_valid_value(&self, fridges: &[Fridge]) -> bool {
        fridges
            .iter()
            .any(|f| matches!(parse_entry(self.get(&f.id)), EntryValue::Number(_)))
    }

    /// One reading per fridge, in fridge order.
    ///
    /// Blank entries are recorded as `0.0`. Fails if no entry is numeric or
    /// any filled-in entry is not a number.
    pub fn to_readings(&self, fridges: &[Fridge]) -> CaptureResult<Vec<TemperatureReading>> {
        if !self.has_valid_value(fridges) {
            return Err(CaptureError::NoValidReading);
        }

        fridges
            .iter()
            .map(|fridge| {
                let raw = self.get(&fridge.id);
                match parse_entry(raw) {
                    EntryValue::Number(value) => Ok(TemperatureReading::new(fridge, value)),
                    EntryValue::Blank => Ok(TemperatureReading::new(fridge, 0.0)),
                    EntryValue::Invalid => Err(CaptureError::InvalidReading {
                        fridge: fridge.name.clone(),
                        raw: raw.to_string(),
                    }),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fridges() -> Vec<Fridge> {
        vec![Fridge::new("1", "Frigo Carni"), Fridge::new("2", "Congelatore")]
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(parse_entry(""), EntryValue::Blank);
        assert_eq!(parse_entry(" - "), EntryValue::Blank);
        assert_eq!(parse_entry("3.5"), EntryValue::Number(3.5));
        assert_eq!(parse_entry("-18"), EntryValue::Number(-18.0));
        assert_eq!(parse_entry("4,2"), EntryValue::Number(4.2));
        assert_eq!(parse_entry("abc"), EntryValue::Invalid);
        assert_eq!(parse_entry("NaN"), EntryValue::Invalid);
        assert_eq!(parse_entry("inf"), EntryValue::Invalid);

        match parse_entry("-0") {
            EntryValue::Number(v) => assert!(v.is_sign_positive()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_toggle_sign_cycle() {
        let mut draft = ReadingDraft::new();

        draft.toggle_sign("1");
        assert_eq!(draft.get("1"), "-");
        draft.toggle_sign("1");
        assert_eq!(draft.get("1"), "");

        draft.set("1", "4.5");
        draft.toggle_sign("1");
        assert_eq!(draft.get("1"), "-4.5");
        draft.toggle_sign("1");
        assert_eq!(draft.get("1"), "4.5");

        draft.set("2", "abc");
        draft.toggle_sign("2");
        assert_eq!(draft.get("2"), "abc");
    }

    #[test]
    fn test_toggle_sign_twice_is_identity() {
        for start in ["", "-", "0", "3.50", "-18", "-0.5", "12,5", "x1"] {
            let mut draft = ReadingDraft::new();
            draft.set("1", start);
            draft.toggle_sign("1");
            draft.toggle_sign("1");
            assert_eq!(draft.get("1"), start, "start value {:?}", start);
        }
    }

    #[test]
    fn test_pending_marker_then_digits() {
        let mut draft = ReadingDraft::new();
        draft.toggle_sign("2");
        let typed = format!("{}18", draft.get("2"));
        draft.set("2", typed);

        let readings = draft.to_readings(&fridges()[1..]).unwrap();
        assert_eq!(readings[0].value, -18.0);
    }

    #[test]
    fn test_sign_only_is_blank() {
        let mut draft = ReadingDraft::new();
        draft.set("1", "-");
        draft.set("2", "");
        assert!(!draft.has_valid_value(&fridges()));
        assert!(matches!(
            draft.to_readings(&fridges()),
            Err(CaptureError::NoValidReading)
        ));
    }

    #[test]
    fn test_to_readings_snapshots_every_fridge() {
        let mut draft = ReadingDraft::new();
        draft.set("1", "3.5");

        let readings = draft.to_readings(&fridges()).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].fridge_name, "Frigo Carni");
        assert_eq!(readings[0].value, 3.5);
        assert_eq!(readings[1].fridge_id, "2");
        assert_eq!(readings[1].value, 0.0);
    }

    #[test]
    fn test_invalid_entry_is_rejected() {
        let mut draft = ReadingDraft::new();
        draft.set("1", "3.5");
        draft.set("2", "cold");

        match draft.to_readings(&fridges()) {
            Err(CaptureError::InvalidReading { fridge, raw }) => {
                assert_eq!(fridge, "Congelatore");
                assert_eq!(raw, "cold");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_entries_for_removed_fridges_do_not_count() {
        let mut draft = ReadingDraft::new();
        draft.set("gone", "4");
        assert!(!draft.has_valid_value(&fridges()));
    }
}
