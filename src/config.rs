//! Configuration options for the DealerDash client

use std::path::PathBuf;
use std::time::Duration;

/// Configuration options for the DealerDash client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied to every resource call
    pub request_timeout: Duration,

    /// Where the session is persisted across restarts.
    /// `None` keeps the session in memory only.
    pub session_file: Option<PathBuf>,

    /// The path prefix of the REST API on the backend host
    pub api_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            session_file: None,
            api_prefix: "api".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the session persistence file
    pub fn with_session_file(mut self, value: impl Into<PathBuf>) -> Self {
        self.session_file = Some(value.into());
        self
    }

    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.trim_matches('/').to_string();
        self
    }
}
