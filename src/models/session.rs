use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Opaque proof of authentication. Issued, refreshed and revoked by the
/// identity provider; the dashboard only checks whether one is present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds). `None` = never expires (local backend).
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

impl Session {
    /// True when the session expires within `margin_secs` from now.
    pub fn expires_within(&self, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(ts) => ts - Utc::now().timestamp() <= margin_secs,
            None => false,
        }
    }

    pub fn display_user(&self) -> &str {
        self.user.email.as_deref().unwrap_or(&self.user.id)
    }
}

// Tokens never end up in logs or panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Email + password pair submitted through the sign-in surface.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: Option<i64>) -> Session {
        Session {
            access_token: "secret-access".into(),
            refresh_token: "secret-refresh".into(),
            expires_at,
            user: SessionUser {
                id: "u1".into(),
                email: Some("a@b.c".into()),
            },
        }
    }

    #[test]
    fn debug_output_hides_tokens() {
        let dbg = format!("{:?}", session(None));
        assert!(!dbg.contains("secret-access"));
        assert!(!dbg.contains("secret-refresh"));
        assert!(dbg.contains("a@b.c"));
    }

    #[test]
    fn expiry_margin() {
        let now = Utc::now().timestamp();
        assert!(!session(None).expires_within(60));
        assert!(session(Some(now + 30)).expires_within(60));
        assert!(!session(Some(now + 3600)).expires_within(60));
    }
}
