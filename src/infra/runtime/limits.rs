use std::time::Duration;

/// One bounded-timeout policy shared by all three upstream clients. A failed
/// fetch fails the call immediately; there are no retries.
pub fn make_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client")
}
