//! Offline log store backed by the local SQLite database.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::{LogEntry, Session};
use crate::store::LogStore;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rusqlite::{Row, params};
use std::rc::Rc;

pub struct LocalLogStore {
    pool: Rc<DbPool>,
}

impl LocalLogStore {
    pub fn new(pool: Rc<DbPool>) -> Self {
        Self { pool }
    }
}

fn map_row(row: &Row) -> rusqlite::Result<LogEntry> {
    let date_str: String = row.get("log_date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    Ok(LogEntry {
        date,
        hours_spent: row.get("hours_spent")?,
        confidence_level: row.get("confidence_level")?,
    })
}

#[async_trait(?Send)]
impl LogStore for LocalLogStore {
    async fn fetch_logs(&self, session: &Session) -> AppResult<Vec<LogEntry>> {
        // Same-day entries keep insertion order
        let mut stmt = self.pool.conn.prepare_cached(
            "SELECT log_date, hours_spent, confidence_level
             FROM daily_logs
             WHERE user_id = ?1
             ORDER BY log_date ASC, id ASC",
        )?;

        let rows = stmt.query_map([&session.user.id], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    async fn insert_log(&self, session: &Session, entry: &LogEntry) -> AppResult<()> {
        self.pool.conn.execute(
            "INSERT INTO daily_logs (user_id, log_date, hours_spent, confidence_level, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.user.id,
                entry.date_str(),
                entry.hours_spent,
                entry.confidence_level,
                Local::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::open_db;
    use crate::models::SessionUser;

    fn session_for(user: &str) -> Session {
        Session {
            access_token: "t".into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: SessionUser {
                id: user.into(),
                email: None,
            },
        }
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn rows_come_back_sorted_and_scoped() {
        let store = LocalLogStore::new(Rc::new(open_db(":memory:").unwrap()));
        let alice = session_for("alice");
        let bob = session_for("bob");

        store
            .insert_log(&alice, &LogEntry::new(d("2024-01-03"), 1.0))
            .await
            .unwrap();
        store
            .insert_log(&alice, &LogEntry::new(d("2024-01-01"), 2.0))
            .await
            .unwrap();
        store
            .insert_log(&bob, &LogEntry::new(d("2024-01-02"), 9.0))
            .await
            .unwrap();

        let logs = store.fetch_logs(&alice).await.unwrap();
        let dates: Vec<String> = logs.iter().map(|e| e.date_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03"]);
        assert_eq!(store.fetch_logs(&bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_dates_keep_insertion_order() {
        let store = LocalLogStore::new(Rc::new(open_db(":memory:").unwrap()));
        let s = session_for("u");

        for h in [1.0, 2.0, 3.0] {
            store
                .insert_log(&s, &LogEntry::new(d("2024-01-01"), h))
                .await
                .unwrap();
        }

        let hours: Vec<f64> = store
            .fetch_logs(&s)
            .await
            .unwrap()
            .iter()
            .map(|e| e.hours_spent)
            .collect();
        assert_eq!(hours, vec![1.0, 2.0, 3.0]);
    }
}
