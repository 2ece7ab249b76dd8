//! User endpoint client.
//!
//! ARCHITECTURE
//! ============
//! [`UserSource`] is the seam between the auth module and the network. The
//! production implementation, [`HttpUserClient`], issues a credentialed
//! `GET` through `reqwest` with a shared cookie jar, so the session cookie
//! the application holds rides along with every request the same way a
//! browser attaches ambient credentials.
//!
//! ERROR HANDLING
//! ==============
//! Every failure comes back as a [`FetchError`]; nothing here logs. The
//! auth module decides what to report.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::cookie::Jar;

use super::types::{FetchError, User, parse_user};
use crate::config::FetchTimeouts;

// =============================================================================
// SOURCE TRAIT
// =============================================================================

/// Anything that can produce the current user.
#[async_trait::async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_user(&self) -> Result<User, FetchError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpUserClient {
    http: reqwest::Client,
    url: Url,
    jar: Arc<Jar>,
}

impl HttpUserClient {
    /// Build a client with a fresh, empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(url: &str, timeouts: FetchTimeouts) -> Result<Self, FetchError> {
        Self::with_jar(url, timeouts, Arc::new(Jar::default()))
    }

    /// Build a client that reads and writes cookies through `jar`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if the URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn with_jar(url: &str, timeouts: FetchTimeouts, jar: Arc<Jar>) -> Result<Self, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::ClientBuild(format!("invalid user url '{url}': {e}")))?;

        // No timeout unless configured: reqwest's defaults apply.
        let mut builder = reqwest::Client::builder().cookie_provider(Arc::clone(&jar));
        if let Some(secs) = timeouts.request_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = timeouts.connect_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { http, url, jar })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Cookie jar shared with the underlying HTTP client.
    #[must_use]
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Store a `Set-Cookie` style string scoped to the user endpoint's origin.
    pub fn add_cookie(&self, cookie: &str) {
        self.jar.add_cookie_str(cookie, &self.url);
    }
}

#[async_trait::async_trait]
impl UserSource for HttpUserClient {
    async fn fetch_user(&self) -> Result<User, FetchError> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body: text });
        }

        parse_user(&text)
    }
}
