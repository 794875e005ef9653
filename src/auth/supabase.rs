//! GoTrue-backed identity provider.
//!
//! Sessions are persisted in the local database between invocations and
//! refreshed with the refresh token when they are about to expire.

use crate::auth::{
    IdentityProvider, REFRESH_MARGIN_SECS, SessionBroadcast, SessionSubscription, SignUpOutcome,
};
use crate::backend::supabase::{ApiError, SupabaseClient};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::session::{clear_session, load_session, save_session};
use crate::errors::AppResult;
use crate::models::{Credentials, Session, SessionUser};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::rc::Rc;

const BACKEND: &str = "supabase";

/// `POST /token` answer (also returned by `/signup` when no confirmation is needed).
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl TokenResponse {
    pub(crate) fn into_session(self) -> Session {
        let now = Utc::now().timestamp();
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at.or(self.expires_in.map(|s| now + s)),
            user: self.user,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    User(SessionUser),
}

pub struct SupabaseAuth {
    client: SupabaseClient,
    pool: Rc<DbPool>,
    broadcast: SessionBroadcast,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient, pool: Rc<DbPool>) -> Self {
        Self {
            client,
            pool,
            broadcast: SessionBroadcast::new(),
        }
    }

    fn store(&self, session: &Session) -> AppResult<()> {
        save_session(&self.pool.conn, BACKEND, session)?;
        self.broadcast.publish(Some(session.clone()));
        Ok(())
    }

    /// Drop the persisted session. Subscribers see `None` even when the
    /// row could not be deleted.
    fn forget(&self) -> AppResult<()> {
        let cleared = clear_session(&self.pool.conn);
        self.broadcast.publish(None);
        cleared
    }

    async fn grant(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, ApiError> {
        let req = self
            .client
            .post(&self.client.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .json(&body);

        let resp = self.client.execute(req).await?;
        let token: TokenResponse = resp.json().await.map_err(ApiError::Transport)?;
        Ok(token.into_session())
    }

    async fn token(&self, grant_type: &str, body: serde_json::Value) -> AppResult<Session> {
        self.grant(grant_type, body)
            .await
            .map_err(|e| e.into_auth_error())
    }

    async fn refresh(&self, session: &Session) -> Result<Session, ApiError> {
        self.grant(
            "refresh_token",
            json!({ "refresh_token": session.refresh_token }),
        )
        .await
    }
}

#[async_trait(?Send)]
impl IdentityProvider for SupabaseAuth {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn current_session(&self) -> Option<Session> {
        let Some(session) = load_session(&self.pool.conn, BACKEND).ok().flatten() else {
            self.broadcast.publish(None);
            return None;
        };

        if !session.expires_within(REFRESH_MARGIN_SECS) {
            self.broadcast.publish(Some(session.clone()));
            return Some(session);
        }

        let user = session.display_user();

        match self.refresh(&session).await {
            Ok(fresh) => {
                let note = match save_session(&self.pool.conn, BACKEND, &fresh) {
                    Ok(()) => "Access token refreshed".to_string(),
                    Err(e) => format!("Access token refreshed but not persisted: {e}"),
                };
                ttlog_quiet(&self.pool.conn, "session_refresh", user, &note);
                self.broadcast.publish(Some(fresh.clone()));
                Some(fresh)
            }
            // 4xx: refresh token revoked or unknown, the session is gone for good
            Err(ApiError::Rejected { status, message }) if status < 500 => {
                ttlog_quiet(&self.pool.conn, "session_refresh", user, &message);
                if let Err(e) = self.forget() {
                    ttlog_quiet(
                        &self.pool.conn,
                        "session_refresh",
                        user,
                        &format!("Stored session not cleared: {e}"),
                    );
                }
                None
            }
            // offline o errore del server: la sessione resta per il prossimo tentativo
            Err(e) => {
                ttlog_quiet(
                    &self.pool.conn,
                    "session_refresh",
                    user,
                    &e.into_auth_error().to_string(),
                );
                self.broadcast.publish(None);
                None
            }
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        self.broadcast.subscribe()
    }

    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session> {
        let session = self
            .token(
                "password",
                json!({ "email": credentials.email.trim(), "password": credentials.password }),
            )
            .await?;

        self.store(&session)?;
        ttlog_quiet(
            &self.pool.conn,
            "login",
            session.display_user(),
            "Signed in (supabase)",
        );
        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<SignUpOutcome> {
        let req = self
            .client
            .post(&self.client.auth_url("signup"))
            .json(&json!({ "email": credentials.email.trim(), "password": credentials.password }));

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| e.into_auth_error())?;

        let outcome = match resp.json::<SignUpResponse>().await? {
            SignUpResponse::Session(token) => {
                let session = token.into_session();
                self.store(&session)?;
                SignUpOutcome::SignedIn(session)
            }
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationRequired {
                email: user.email.unwrap_or_else(|| credentials.email.trim().to_string()),
            },
        };

        ttlog_quiet(
            &self.pool.conn,
            "signup",
            credentials.email.trim(),
            "Account created (supabase)",
        );
        Ok(outcome)
    }

    async fn sign_out(&self) -> AppResult<()> {
        let Some(session) = load_session(&self.pool.conn, BACKEND)? else {
            self.broadcast.publish(None);
            return Ok(());
        };

        let req = self
            .client
            .post(&self.client.auth_url("logout"))
            .bearer_auth(&session.access_token);

        match self.client.execute(req).await {
            Ok(_) => {}
            // Token already revoked or expired server side
            Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => {}
            Err(e) => return Err(e.into_auth_error()),
        }

        self.forget()?;
        ttlog_quiet(
            &self.pool.conn,
            "logout",
            session.display_user(),
            "Signed out (supabase)",
        );
        Ok(())
    }
}
