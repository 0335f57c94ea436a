//! # Push Client
//!
//! Thin HTTP client for the external push-delivery service. Delivery is
//! fire-and-forget from the application's point of view: callers log
//! failures and move on, the persisted notification row is the source of
//! truth.

use error::{AppError, Result};
use serde_json::json;

/// Best-effort push sender. Cloning is cheap (shared reqwest pool).
#[derive(Clone)]
pub struct PushClient {
    client:   reqwest::Client,
    endpoint: Option<String>,
    api_key:  Option<String>,
}

impl PushClient {
    /// Create a push client. With no endpoint the client is a no-op.
    #[must_use]
    pub fn new(endpoint: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// A client that never sends anything; used in tests and when push is
    /// not configured.
    #[must_use]
    pub fn disabled() -> Self { Self::new(None, None) }

    /// Whether an endpoint is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool { self.endpoint.is_some() }

    /// Send one push message to a device token.
    ///
    /// Returns `Ok(())` without any network traffic when the client is
    /// disabled.
    pub async fn send(&self, push_token: &str, title: &str, message: &str) -> Result<()> {
        let Some(endpoint) = &self.endpoint
        else {
            return Ok(());
        };

        let mut request = self.client.post(endpoint).json(&json!({
            "to": push_token,
            "title": title,
            "body": message,
        }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Push request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Push service returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for PushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushClient")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
