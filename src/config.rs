use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001/api/v1";
pub const DEFAULT_SERVER_ID: &str = "localhost";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the PowerDNS HTTP API.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    pub api_key: String,
    pub verify_tls: bool,
    pub server_id: String, // usually "localhost"
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            verify_tls: true,
            server_id: DEFAULT_SERVER_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_server_id(mut self, server_id: impl Into<String>) -> Self {
        self.server_id = server_id.into();
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("verify_tls", &self.verify_tls)
            .field("server_id", &self.server_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}
