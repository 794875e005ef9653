//! Offline identity provider: accounts and sessions live in the local database.
//!
//! Passwords are stored as `salt$sha256(salt:password)`. Local sessions never
//! expire; they last until `logout`.

use crate::auth::{IdentityProvider, SessionBroadcast, SessionSubscription, SignUpOutcome};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::session::{clear_session, load_session, save_session};
use crate::errors::{AppError, AppResult};
use crate::models::{Credentials, Session, SessionUser};
use async_trait::async_trait;
use chrono::{Local, Utc};
use rusqlite::{OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::rc::Rc;

const BACKEND: &str = "local";
const MIN_PASSWORD_LEN: usize = 6;

pub struct LocalAuth {
    pool: Rc<DbPool>,
    broadcast: SessionBroadcast,
}

fn digest_hex(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, p) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(b":");
        }
        hasher.update(p.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn nonce() -> String {
    Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    format!("{}${}", salt, digest_hex(&[salt, password]))
}

pub(crate) fn verify_password(stored: &str, password: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, _)) => hash_password(salt, password) == stored,
        None => false,
    }
}

/// Basic shape checks; the hosted provider applies its own rules server side.
pub(crate) fn validate_credentials(c: &Credentials) -> AppResult<()> {
    let email = c.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Auth(format!("Invalid email address: '{}'", email)));
    }
    if c.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Auth(format!(
            "Password should be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

impl LocalAuth {
    pub fn new(pool: Rc<DbPool>) -> Self {
        Self {
            pool,
            broadcast: SessionBroadcast::new(),
        }
    }

    fn issue_session(&self, user: SessionUser) -> AppResult<Session> {
        let n = nonce();
        let session = Session {
            access_token: digest_hex(&["access", &user.id, &n]),
            refresh_token: digest_hex(&["refresh", &user.id, &n]),
            expires_at: None,
            user,
        };
        save_session(&self.pool.conn, BACKEND, &session)?;
        self.broadcast.publish(Some(session.clone()));
        Ok(session)
    }
}

#[async_trait(?Send)]
impl IdentityProvider for LocalAuth {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn current_session(&self) -> Option<Session> {
        let session = load_session(&self.pool.conn, BACKEND).ok().flatten();
        self.broadcast.publish(session.clone());
        session
    }

    fn subscribe(&self) -> SessionSubscription {
        self.broadcast.subscribe()
    }

    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
        let email = credentials.email.trim().to_lowercase();

        let row: Option<(String, String)> = self
            .pool
            .conn
            .query_row(
                "SELECT id, password_hash FROM local_users WHERE email = ?1",
                [&email],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;

        match row {
            Some((id, stored)) if verify_password(&stored, &credentials.password) => {
                let session = self.issue_session(SessionUser {
                    id,
                    email: Some(email.clone()),
                })?;
                ttlog_quiet(&self.pool.conn, "login", &email, "Signed in (local)");
                Ok(session)
            }
            _ => Err(AppError::Auth("Invalid login credentials".into())),
        }
    }

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<SignUpOutcome> {
        validate_credentials(credentials)?;
        let email = credentials.email.trim().to_lowercase();

        let exists: Option<String> = self
            .pool
            .conn
            .query_row(
                "SELECT id FROM local_users WHERE email = ?1",
                [&email],
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(AppError::Auth("User already registered".into()));
        }

        let id = digest_hex(&["user", &email, &nonce()])[..32].to_string();
        let salt = digest_hex(&["salt", &id])[..16].to_string();

        self.pool.conn.execute(
            "INSERT INTO local_users (id, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                email,
                hash_password(&salt, &credentials.password),
                Local::now().to_rfc3339()
            ],
        )?;

        ttlog_quiet(&self.pool.conn, "signup", &email, "Local account created");

        let session = self.issue_session(SessionUser {
            id,
            email: Some(email),
        })?;
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self) -> AppResult<()> {
        let user = load_session(&self.pool.conn, BACKEND)
            .ok()
            .flatten()
            .map(|s| s.display_user().to_string())
            .unwrap_or_default();

        clear_session(&self.pool.conn)?;
        ttlog_quiet(&self.pool.conn, "logout", &user, "Signed out (local)");
        self.broadcast.publish(None);
        Ok(())
    }
}
