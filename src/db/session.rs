//! Persisted authentication session (single row, one per local database).
//!
//! This is the CLI counterpart of the browser storage used by hosted auth
//! SDKs: the session survives between invocations until sign-out.

use crate::errors::AppResult;
use crate::models::Session;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Load the stored session for `backend`. A session stored by another
/// backend, or an unreadable payload, counts as "no session".
pub fn load_session(conn: &Connection, backend: &str) -> AppResult<Option<Session>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT backend, payload FROM auth_session WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(match row {
        Some((stored_backend, payload)) if stored_backend == backend => {
            serde_json::from_str(&payload).ok()
        }
        _ => None,
    })
}

pub fn save_session(conn: &Connection, backend: &str, session: &Session) -> AppResult<()> {
    let payload = serde_json::to_string(session)?;
    conn.execute(
        "INSERT INTO auth_session (id, backend, payload, updated_at)
         VALUES (1, ?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            backend = excluded.backend,
            payload = excluded.payload,
            updated_at = excluded.updated_at",
        params![backend, payload, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn clear_session(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM auth_session", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::models::SessionUser;

    fn conn() -> Connection {
        let c = Connection::open_in_memory().unwrap();
        init_db(&c).unwrap();
        c
    }

    fn sample() -> Session {
        Session {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: Some(1_900_000_000),
            user: SessionUser {
                id: "user-1".into(),
                email: Some("me@example.com".into()),
            },
        }
    }

    #[test]
    fn save_load_and_clear() {
        let c = conn();
        assert!(load_session(&c, "local").unwrap().is_none());

        save_session(&c, "local", &sample()).unwrap();
        assert_eq!(load_session(&c, "local").unwrap(), Some(sample()));

        clear_session(&c).unwrap();
        assert!(load_session(&c, "local").unwrap().is_none());
    }

    #[test]
    fn session_of_other_backend_is_ignored() {
        let c = conn();
        save_session(&c, "supabase", &sample()).unwrap();
        assert!(load_session(&c, "local").unwrap().is_none());
    }

    #[test]
    fn saving_twice_keeps_a_single_row() {
        let c = conn();
        save_session(&c, "local", &sample()).unwrap();
        let mut other = sample();
        other.access_token = "b".into();
        save_session(&c, "local", &other).unwrap();

        let n: i64 = c
            .query_row("SELECT COUNT(*) FROM auth_session", [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(load_session(&c, "local").unwrap().unwrap().access_token, "b");
    }
}
