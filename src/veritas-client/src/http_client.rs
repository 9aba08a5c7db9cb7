//! HTTP client factory.
//!
//! Every client carries the Veritas User-Agent, `tcp_nodelay` and a request
//! timeout. The timeout is the only bound on a slow backend; nothing above the
//! transport cancels a request.

use reqwest::Client;
use std::time::Duration;

/// User-Agent string for all HTTP requests
pub const USER_AGENT: &str = concat!("veritas/", env!("CARGO_PKG_VERSION"));

/// Default timeout for analysis requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout, kept short so an absent server fails fast.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Creates an HTTP client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Result<Client, String> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .tcp_nodelay(true)
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {e}"))
}
