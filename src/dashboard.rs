//! Dashboard overview
//!
//! Read-only summary of the daily log: entry counter, the most recent
//! entries and the time of the last capture.

use chrono::{DateTime, Local, Locale, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{DailyLog, SignatureImage};

/// Number of entries listed under recent activity
pub const RECENT_LIMIT: usize = 5;

/// One line of recent activity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentEntry {
    pub id: String,
    /// Long Italian date, e.g. `lunedì 19 ottobre 2026`
    pub date_label: String,
    pub fridges_checked: usize,
    pub signature: SignatureImage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_entries: usize,
    pub recent: Vec<RecentEntry>,
    pub last_capture: Option<DateTime<Utc>>,
}

impl DashboardSummary {
    /// Summarize logs ordered most recent first, dates in local time
    pub fn from_logs(logs: &[DailyLog]) -> Self {
        Self::from_logs_in(logs, &Local)
    }

    pub fn from_logs_in<Tz>(logs: &[DailyLog], tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let recent = logs
            .iter()
            .take(RECENT_LIMIT)
            .map(|log| RecentEntry {
                id: log.id.clone(),
                date_label: log
                    .date
                    .with_timezone(tz)
                    .format_localized("%A %-d %B %Y", Locale::it_IT)
                    .to_string(),
                fridges_checked: log.readings.len(),
                signature: log.signature.clone(),
            })
            .collect();

        Self {
            total_entries: logs.len(),
            recent,
            last_capture: logs.first().map(|log| log.date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Fridge, TemperatureReading};
    use chrono::Duration;

    fn logs(count: usize) -> Vec<DailyLog> {
        let start = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                DailyLog::new(
                    vec![TemperatureReading::new(&Fridge::new("1", "Frigo Carni"), 4.0)],
                    SignatureImage::from_png(&[i as u8]),
                    start - Duration::days(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_log() {
        let summary = DashboardSummary::from_logs(&[]);
        assert_eq!(summary.total_entries, 0);
        assert!(summary.recent.is_empty());
        assert!(summary.last_capture.is_none());
    }

    #[test]
    fn test_recent_is_capped() {
        let logs = logs(8);
        let summary = DashboardSummary::from_logs_in(&logs, &Utc);

        assert_eq!(summary.total_entries, 8);
        assert_eq!(summary.recent.len(), RECENT_LIMIT);
        assert_eq!(summary.recent[0].id, logs[0].id);
        assert_eq!(summary.last_capture, Some(logs[0].date));
    }

    #[test]
    fn test_italian_long_date() {
        let summary = DashboardSummary::from_logs_in(&logs(2), &Utc);
        assert_eq!(summary.recent[0].date_label, "lunedì 19 ottobre 2026");
        assert_eq!(summary.recent[1].date_label, "domenica 18 ottobre 2026");
        assert_eq!(summary.recent[0].fridges_checked, 1);
    }
}
