//! HTTP client for the session-protected backend.
//!
//! This module provides the `SessionClient` struct wrapping the three backend
//! operations: login, protected fetch, and logout. All requests go through a
//! shared cookie store so the backend-issued session cookie rides along
//! automatically; the client never reads or stores the cookie value itself.

use std::time::Duration;

use reqwest::{redirect, Client, StatusCode};
use tracing::{debug, warn};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default backend origin when no configuration overrides it
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Path of the form-login endpoint
const LOGIN_PATH: &str = "/perform_login";

/// Path of the protected resource
const HOME_PATH: &str = "/home";

/// Path of the logout endpoint
const LOGOUT_PATH: &str = "/logout";

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Outcome of a login attempt.
///
/// The backend signals success with either a rendered 200 page or a 302
/// redirect to the post-login target; both count as authenticated. Every
/// other status is treated uniformly as rejected credentials - this layer
/// does not distinguish a 401 from a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    Rejected,
}

/// Client for the session-protected backend.
/// Clone is cheap - reqwest::Client uses Arc internally, and clones share
/// one cookie jar, which models the browser's single cookie store.
#[derive(Clone)]
pub struct SessionClient {
    client: Client,
    base_url: String,
}

impl SessionClient {
    /// Create a client for the given backend origin.
    ///
    /// Redirect following is disabled so the login endpoint's 302 is
    /// observed as data rather than acted upon.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit credentials to the login endpoint.
    ///
    /// On `Authenticated` the backend has placed a session cookie in the
    /// client's cookie store as a side effect. Transport failures surface
    /// as `Err`, distinguishable from `Rejected` so the caller can report
    /// "cannot connect" instead of "bad credentials".
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let url = format!("{}{}", self.base_url, LOGIN_PATH);

        let response = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Login response received");

        if status == StatusCode::OK || status == StatusCode::FOUND {
            Ok(LoginOutcome::Authenticated)
        } else {
            Ok(LoginOutcome::Rejected)
        }
    }

    /// Fetch the protected resource, returning its body text.
    ///
    /// Single attempt, no retries. 401/403 map to `ApiError::Unauthorized`
    /// so the caller can redirect to login instead of showing an error.
    pub async fn fetch_home(&self) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, HOME_PATH);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!(status = %status, "Home response received");

        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Invalidate the session server-side.
    ///
    /// Fire-and-forget: the response status is never inspected and transport
    /// failures are only logged. The backend owns session invalidation; the
    /// caller navigates away regardless.
    pub async fn logout(&self) {
        let url = format!("{}{}", self.base_url, LOGOUT_PATH);

        match self.client.post(&url).send().await {
            Ok(response) => debug!(status = %response.status(), "Logout response received"),
            Err(e) => warn!(error = %e, "Logout request failed"),
        }
    }
}
