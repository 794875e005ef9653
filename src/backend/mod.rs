//! Backend selection: which log store / identity provider pair serves the dashboard.

pub mod supabase;

use crate::auth::{IdentityProvider, LocalAuth, SupabaseAuth};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::store::{LocalLogStore, LogStore, SupabaseLogStore};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::Duration;
use supabase::SupabaseClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted Supabase project (PostgREST + GoTrue)
    Supabase,
    /// Offline: everything in the local SQLite database
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Supabase => "supabase",
            BackendKind::Local => "local",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "local" => Ok(BackendKind::Local),
            other => Err(AppError::InvalidBackend(other.to_string())),
        }
    }
}

/// The two external collaborators, built once and handed to the controller.
pub struct Backend {
    pub kind: BackendKind,
    pub store: Box<dyn LogStore>,
    pub identity: Box<dyn IdentityProvider>,
}

impl Backend {
    pub fn build(cfg: &Config, pool: Rc<DbPool>) -> AppResult<Self> {
        let kind = cfg.backend;

        let (store, identity): (Box<dyn LogStore>, Box<dyn IdentityProvider>) = match kind {
            BackendKind::Supabase => {
                let client = SupabaseClient::new(
                    cfg.supabase_url.clone(),
                    cfg.supabase_key.clone(),
                    Duration::from_secs(cfg.request_timeout_secs),
                )?;
                (
                    Box::new(SupabaseLogStore::new(client.clone())),
                    Box::new(SupabaseAuth::new(client, pool)),
                )
            }
            BackendKind::Local => (
                Box::new(LocalLogStore::new(pool.clone())),
                Box::new(LocalAuth::new(pool)),
            ),
        };

        Ok(Self {
            kind,
            store,
            identity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_backend_names() {
        assert_eq!(BackendKind::parse("Local").unwrap(), BackendKind::Local);
        assert_eq!(BackendKind::parse(" supabase ").unwrap(), BackendKind::Supabase);
        assert!(matches!(
            BackendKind::parse("firebase"),
            Err(AppError::InvalidBackend(_))
        ));
    }

    #[test]
    fn supabase_backend_requires_url_and_key() {
        let cfg = Config {
            backend: BackendKind::Supabase,
            supabase_url: String::new(),
            ..Config::default()
        };
        let pool = Rc::new(crate::db::initialize::open_db(":memory:").unwrap());
        assert!(matches!(
            Backend::build(&cfg, pool),
            Err(AppError::Config(_))
        ));
    }
}
