//! Runtime-tunable knobs that sit behind environment variables, following the
//! CLI-flag-first / env-var-fallback convention used for the shared HTTP client.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl HttpTimeouts {
    /// `HTTP_TIMEOUT_SECS` (default 30) / `HTTP_CONNECT_TIMEOUT_SECS` (default 10).
    pub fn from_env() -> Self {
        Self {
            request: Duration::from_secs(env_secs("HTTP_TIMEOUT_SECS", 30)),
            connect: Duration::from_secs(env_secs("HTTP_CONNECT_TIMEOUT_SECS", 10)),
        }
    }
}

fn env_secs(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Build the single `reqwest::Client` shared by every Spider's fetchers.
pub fn build_http_client(timeouts: &HttpTimeouts) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeouts.request)
        .connect_timeout(timeouts.connect)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        std::env::remove_var("HTTP_TIMEOUT_SECS");
        std::env::remove_var("HTTP_CONNECT_TIMEOUT_SECS");
        let t = HttpTimeouts::from_env();
        assert_eq!(t.request, Duration::from_secs(30));
        assert_eq!(t.connect, Duration::from_secs(10));
    }
}
