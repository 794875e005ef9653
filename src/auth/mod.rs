//! Identity provider seam: sign-in surface, session issuance, refresh and sign-out.

pub mod local;
pub mod supabase;

use crate::errors::AppResult;
use crate::models::{Credentials, Session};
use async_trait::async_trait;
use tokio::sync::watch;

pub use local::LocalAuth;
pub use supabase::SupabaseAuth;

/// Sessions within this many seconds of expiry are refreshed on access.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Result of a sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account created and signed in straight away.
    SignedIn(Session),
    /// Account created; the provider wants the e-mail address confirmed first.
    ConfirmationRequired { email: String },
}

#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Name of the backend, as stored next to persisted sessions.
    fn backend_name(&self) -> &'static str;

    /// Current session, if any. Refreshes a session close to expiry;
    /// any failure to produce a valid session is reported as `None`.
    async fn current_session(&self) -> Option<Session>;

    /// Register for session changes (sign-in, refresh, sign-out).
    fn subscribe(&self) -> SessionSubscription;

    async fn sign_in(&self, credentials: &Credentials) -> AppResult<Session>;

    async fn sign_up(&self, credentials: &Credentials) -> AppResult<SignUpOutcome>;

    async fn sign_out(&self) -> AppResult<()>;
}

/// Publisher side of the session-change notifications, owned by a provider.
#[derive(Debug)]
pub struct SessionBroadcast {
    tx: watch::Sender<Option<Session>>,
}

impl Default for SessionBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBroadcast {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish `session`; subscribers are woken only when the value changes.
    pub fn publish(&self, session: Option<Session>) {
        self.tx.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiver side of [`SessionBroadcast`]. Dropping it unregisters the listener.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    /// Non-blocking: the latest value if it changed since last seen.
    pub fn take_change(&mut self) -> Option<Option<Session>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Wait for the next change. `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionUser;

    fn session(token: &str) -> Session {
        Session {
            access_token: token.into(),
            refresh_token: "r".into(),
            expires_at: None,
            user: SessionUser {
                id: "u".into(),
                email: None,
            },
        }
    }

    #[test]
    fn subscribers_see_only_real_changes() {
        let b = SessionBroadcast::new();
        let mut sub = b.subscribe();

        assert_eq!(sub.take_change(), None);

        b.publish(None);
        assert_eq!(sub.take_change(), None);

        b.publish(Some(session("a")));
        assert_eq!(sub.take_change(), Some(Some(session("a"))));
        assert_eq!(sub.take_change(), None);

        b.publish(Some(session("a")));
        assert_eq!(sub.take_change(), None);

        b.publish(None);
        assert_eq!(sub.take_change(), Some(None));
    }

    #[tokio::test]
    async fn changed_resolves_on_publish() {
        let b = SessionBroadcast::new();
        let mut sub = b.subscribe();

        b.publish(Some(session("x")));
        assert_eq!(sub.changed().await, Some(Some(session("x"))));

        drop(b);
        assert_eq!(sub.changed().await, None);
    }
}
