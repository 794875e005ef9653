//! Thin HTTP client for a Supabase project (PostgREST + GoTrue).
//!
//! Built once per process and cloned into the log store and the identity
//! provider; `reqwest::Client` is reference counted internally.

use crate::errors::{AppError, AppResult};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

/// Failure of a single Supabase call.
#[derive(Debug)]
pub enum ApiError {
    /// The request never got an HTTP answer (DNS, TLS, timeout, ...).
    Transport(reqwest::Error),
    /// The server answered with a non-2xx status.
    Rejected { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(_) => None,
            ApiError::Rejected { status, .. } => Some(*status),
        }
    }

    pub fn into_auth_error(self) -> AppError {
        match self {
            ApiError::Transport(e) => AppError::Http(e),
            ApiError::Rejected { message, .. } => AppError::Auth(message),
        }
    }

    pub fn into_store_error(self) -> AppError {
        match self {
            ApiError::Transport(e) => AppError::Http(e),
            ApiError::Rejected { status, message } => {
                AppError::Store(format!("{} ({})", message, status))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();

        if base_url.is_empty() {
            return Err(AppError::Config(
                "supabase_url is not set (config file or PACER_SUPABASE_URL)".into(),
            ));
        }
        if api_key.is_empty() {
            return Err(AppError::Config(
                "supabase_key is not set (config file or PACER_SUPABASE_KEY)".into(),
            ));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/rest/v1/{table}`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// `{base}/auth/v1/{path}`
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).header("apikey", &self.api_key)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).header("apikey", &self.api_key)
    }

    /// Send the request and map non-2xx answers to [`ApiError::Rejected`].
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(ApiError::Transport)?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::Rejected {
            status,
            message: error_message(&body, status),
        })
    }
}

/// Extract a human readable message from a Supabase error body.
///
/// GoTrue uses `error_description` / `msg`, PostgREST uses `message`.
pub fn error_message(body: &str, status: u16) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(Value::String(s)) = map.get(key)
                && !s.is_empty()
            {
                return s.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gotrue_error_description_wins() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(body, 400), "Invalid login credentials");
    }

    #[test]
    fn postgrest_message_is_used() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"new row violates row-level security policy"}"#;
        assert_eq!(
            error_message(body, 403),
            "new row violates row-level security policy"
        );
    }

    #[test]
    fn non_json_and_empty_bodies() {
        assert_eq!(error_message("Bad Gateway", 502), "Bad Gateway");
        assert_eq!(error_message("", 500), "HTTP 500");
    }

    #[test]
    fn urls_are_normalised() {
        let c = SupabaseClient::new("https://demo.supabase.co/", "key", Duration::from_secs(5))
            .unwrap();
        assert_eq!(c.rest_url("daily_logs"), "https://demo.supabase.co/rest/v1/daily_logs");
        assert_eq!(c.auth_url("logout"), "https://demo.supabase.co/auth/v1/logout");
    }

    #[test]
    fn missing_settings_are_config_errors() {
        let err = SupabaseClient::new("", "key", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        let err = SupabaseClient::new("https://x.supabase.co", "", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
