use chrono::NaiveDate;
use serde::Serialize;

/// One derived chart point. Never stored: rebuilt from the full log on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub date: NaiveDate,
    pub ideal_remaining: f64,
    pub actual_remaining: f64,
}

impl ProjectionPoint {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
