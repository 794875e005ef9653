use crate::backend::supabase::SupabaseClient;
use crate::errors::{AppError, AppResult};
use crate::models::{CONFIDENCE_LEVEL, LogEntry, Session};
use crate::store::LogStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const TABLE: &str = "daily_logs";

/// Row shape returned by PostgREST for `daily_logs`.
#[derive(Debug, Deserialize)]
pub(crate) struct DailyLogRow {
    pub log_date: String,
    pub hours_spent: f64,
    #[serde(default)]
    pub confidence_level: Option<i32>,
}

/// Insert payload (`Prefer: return=minimal`, nothing comes back).
#[derive(Debug, Serialize)]
pub(crate) struct NewDailyLog {
    pub log_date: String,
    pub hours_spent: f64,
    pub confidence_level: i32,
}

impl From<&LogEntry> for NewDailyLog {
    fn from(e: &LogEntry) -> Self {
        Self {
            log_date: e.date_str(),
            hours_spent: e.hours_spent,
            confidence_level: e.confidence_level,
        }
    }
}

pub(crate) fn rows_to_entries(rows: Vec<DailyLogRow>) -> AppResult<Vec<LogEntry>> {
    rows.into_iter()
        .map(|r| {
            let date = NaiveDate::parse_from_str(&r.log_date, "%Y-%m-%d")
                .map_err(|_| AppError::InvalidDate(r.log_date.clone()))?;
            Ok(LogEntry {
                date,
                hours_spent: r.hours_spent,
                confidence_level: r.confidence_level.unwrap_or(CONFIDENCE_LEVEL),
            })
        })
        .collect()
}

pub struct SupabaseLogStore {
    client: SupabaseClient,
}

impl SupabaseLogStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl LogStore for SupabaseLogStore {
    async fn fetch_logs(&self, session: &Session) -> AppResult<Vec<LogEntry>> {
        let req = self
            .client
            .get(&self.client.rest_url(TABLE))
            .bearer_auth(&session.access_token)
            .query(&[
                ("select", "log_date,hours_spent,confidence_level"),
                ("order", "log_date.asc"),
            ]);

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| e.into_store_error())?;

        let rows: Vec<DailyLogRow> = resp.json().await?;
        rows_to_entries(rows)
    }

    async fn insert_log(&self, session: &Session, entry: &LogEntry) -> AppResult<()> {
        let body = vec![NewDailyLog::from(entry)];

        let req = self
            .client
            .post(&self.client.rest_url(TABLE))
            .bearer_auth(&session.access_token)
            .header("Prefer", "return=minimal")
            .json(&body);

        self.client
            .execute(req)
            .await
            .map_err(|e| e.into_store_error())?;

        Ok(())
    }
}
