use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Confidence level stamped on every new entry.
/// Stored alongside the row; nothing reads it back.
pub const CONFIDENCE_LEVEL: i32 = 3;

/// One row of logged study effort (⇔ `daily_logs`).
///
/// Entries are immutable once stored: there is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,   // ⇔ daily_logs.log_date (TEXT "YYYY-MM-DD")
    pub hours_spent: f64,  // ⇔ daily_logs.hours_spent
    pub confidence_level: i32, // ⇔ daily_logs.confidence_level
}

impl LogEntry {
    /// Entry as created by the add form: confidence is always the fixed constant.
    pub fn new(date: NaiveDate, hours_spent: f64) -> Self {
        Self {
            date,
            hours_spent,
            confidence_level: CONFIDENCE_LEVEL,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
