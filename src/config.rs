use std::net::SocketAddr;
use std::time::Duration;

/// Base URL of the hosted Bingo service.
pub const DEFAULT_REMOTE_URL: &str = "http://www.hyeumine.com";

/// Default address the proxy listens on.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Default timeout for a single outbound request (15 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "BINGO_LOG";

/// Settings for reaching the remote service and serving the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub remote_url: String,
    pub request_timeout: Duration,
    pub bind: SocketAddr,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl ServiceConfig {
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }
}
