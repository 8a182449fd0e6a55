use crate::{
    client::{is_unauthorized, storage::TOKEN_KEY, ApiClient, LocalStorage},
    conf::Conf,
};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::info;

pub mod analytics;
pub mod auth;
pub mod expenses;

pub const DEFAULT_LIMIT: u32 = 100;

pub struct Context {
    pub conf: Conf,
    pub storage: LocalStorage,
}

impl Context {
    pub fn new(conf: Conf) -> Result<Context> {
        let storage = LocalStorage::open(&conf.local_storage_path())?;
        Ok(Context { conf, storage })
    }

    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(&self.conf.api_url, None)
    }

    /// Client carrying the stored token. Fails when nobody is logged in.
    pub fn client(&self) -> Result<ApiClient> {
        match self.storage.token() {
            Some(token) => Ok(ApiClient::new(&self.conf.api_url, Some(token))),
            None => Err(anyhow!("Not logged in, run `expenses login` first")),
        }
    }

    /// Wraps a failed request with `message`, dropping the stored token if the
    /// server no longer accepts it.
    pub fn request_failed(&mut self, error: anyhow::Error, message: &'static str) -> anyhow::Error {
        if is_unauthorized(&error) {
            info!("Stored token was rejected, logging out");
            if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
                return e.context("Failed to clear session");
            }
            return error.context("Session expired, please log in again");
        }

        error.context(message)
    }
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM` and `YYYY-MM-DD`.
/// Values without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Ok(date.with_timezone(&Utc));
    }

    for format in &["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(DateTime::from_naive_utc_and_offset(date, Utc));
        }
    }

    parse_day(s)
        .map(|day| DateTime::from_naive_utc_and_offset(day.and_hms_opt(0, 0, 0).unwrap_or_default(), Utc))
        .map_err(|_| format!("invalid date: {}", s))
}

pub fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| format!("invalid date: {}", s))
}
