//! Store configuration with optional environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::store::StoreError;

pub const DEFAULT_USER_URL: &str = "http://127.0.0.1:8080/user";
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Optional transport timeouts. `None` leaves reqwest's defaults in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Endpoint queried by `auth/updateUser`.
    pub user_url: String,
    pub timeouts: FetchTimeouts,
    /// Per-subscriber event channel capacity.
    pub event_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { user_url: DEFAULT_USER_URL.to_owned(), timeouts: FetchTimeouts::default(), event_buffer: DEFAULT_EVENT_BUFFER }
    }
}

impl StoreConfig {
    /// Build config from environment variables layered over the defaults.
    ///
    /// Optional:
    /// - `STORE_USER_URL`: default `http://127.0.0.1:8080/user`
    /// - `STORE_REQUEST_TIMEOUT_SECS`: unset means no request timeout
    /// - `STORE_CONNECT_TIMEOUT_SECS`: unset means no connect timeout
    /// - `STORE_EVENT_BUFFER`: default 64, must be positive
    ///
    /// Unparsable numbers fall back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if `STORE_USER_URL` is empty or not http(s).
    pub fn from_env() -> Result<Self, StoreError> {
        let user_url = std::env::var("STORE_USER_URL")
            .map(|v| v.trim().to_owned())
            .unwrap_or_else(|_| DEFAULT_USER_URL.to_owned());
        validate_user_url(&user_url)?;

        let timeouts = FetchTimeouts {
            request_secs: env_parse("STORE_REQUEST_TIMEOUT_SECS"),
            connect_secs: env_parse("STORE_CONNECT_TIMEOUT_SECS"),
        };
        let event_buffer = env_parse::<usize>("STORE_EVENT_BUFFER")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_EVENT_BUFFER);

        Ok(Self { user_url, timeouts, event_buffer })
    }

    #[must_use]
    pub fn with_user_url(mut self, url: impl Into<String>) -> Self {
        self.user_url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: FetchTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

pub(crate) fn validate_user_url(url: &str) -> Result<(), StoreError> {
    if url.is_empty() {
        return Err(StoreError::Config("user url is empty".into()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(StoreError::Config(format!("user url must be http(s): {url}")));
    }
    Ok(())
}
