//! Log store: durable storage and ordered retrieval of study-log entries.

pub mod local;
pub mod supabase;

use crate::errors::AppResult;
use crate::models::{LogEntry, Session};
use async_trait::async_trait;

pub use local::LocalLogStore;
pub use supabase::SupabaseLogStore;

/// Data-access seam for `daily_logs`.
///
/// Every call is made on behalf of a signed-in user; the session scopes the
/// rows (row-level security on Supabase, `user_id` locally).
#[async_trait(?Send)]
pub trait LogStore {
    /// All entries of the session's user, sorted ascending by date.
    async fn fetch_logs(&self, session: &Session) -> AppResult<Vec<LogEntry>>;

    async fn insert_log(&self, session: &Session, entry: &LogEntry) -> AppResult<()>;
}
