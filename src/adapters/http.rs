use std::time::Duration;

/// Per-request timeout shared by every adapter.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("btc-balance/", env!("CARGO_PKG_VERSION")))
        .build()
}
