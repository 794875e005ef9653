use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A schema step, applied once and recorded in `log` as `migration_applied`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_daily_logs",
        description: "Created daily_logs table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS daily_logs (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id          TEXT NOT NULL,
            log_date         TEXT NOT NULL,
            hours_spent      REAL NOT NULL CHECK(hours_spent >= 0),
            confidence_level INTEGER NOT NULL DEFAULT 3,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_daily_logs_user_date ON daily_logs(user_id, log_date);
        "#,
    },
    Migration {
        version: "20250301_0002_create_local_users",
        description: "Created local_users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS local_users (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250301_0003_create_auth_session",
        description: "Created auth_session table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS auth_session (
            id         INTEGER PRIMARY KEY CHECK(id = 1),
            backend    TEXT NOT NULL,
            payload    TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    },
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    conn.execute_batch("BEGIN;")?;

    let result = conn.execute_batch(m.sql).and_then(|_| {
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )
    });

    match result {
        Ok(_) => conn.execute_batch("COMMIT;"),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK;");
            Err(e)
        }
    }
}

/// Versions not yet recorded as applied.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invocata da db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        apply(conn, m)?;

        // Fresh in-memory databases are migrated silently (tests)
        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();
        if !db_path.is_empty() {
            success(format!("Migration applied: {} → {}", m.version, m.description));
        }
    }

    Ok(())
}
