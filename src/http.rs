use std::time::Duration;

use anyhow::Context;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared blocking client for both the feed and the CMS. Each run awaits
/// one response at a time, so a single connection pool is enough.
pub(crate) fn http_client() -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(concat!("tubeflow/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("failed to build HTTP client")
}
