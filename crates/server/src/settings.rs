//! # Server Settings
//!
//! Environment-driven server configuration.

use serde::{Deserialize, Serialize};

/// Server settings loaded at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    /// Bind host
    pub host:          String,
    /// Bind port
    pub port:          u16,
    /// Push delivery endpoint; push is disabled when unset
    pub push_endpoint: Option<String>,
    /// API key sent with push requests
    pub push_api_key:  Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host:          "0.0.0.0".to_string(),
            port:          8080,
            push_endpoint: None,
            push_api_key:  None,
        }
    }
}

impl ServerSettings {
    /// Load settings from `FIELDSERVE_HOST`, `FIELDSERVE_PORT`,
    /// `FIELDSERVE_PUSH_ENDPOINT` and `FIELDSERVE_PUSH_API_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host:          std::env::var("FIELDSERVE_HOST").unwrap_or(defaults.host),
            port:          std::env::var("FIELDSERVE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            push_endpoint: std::env::var("FIELDSERVE_PUSH_ENDPOINT").ok(),
            push_api_key:  std::env::var("FIELDSERVE_PUSH_API_KEY").ok(),
        }
    }

    /// The socket address string to bind to.
    #[must_use]
    pub fn bind_address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_address() {
        let settings = ServerSettings::default();
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
        assert!(settings.push_endpoint.is_none());
    }
}
