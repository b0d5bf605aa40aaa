use std::time::Duration;

/// Default service base URL.
pub const DEFAULT_BASE_URL: &str = "https://p8fs.percolationlabs.ai";
/// Default model name sent with completion requests.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 60;

/// Client configuration.
///
/// Built explicitly and passed into the client constructors so tests can
/// inject fixtures instead of mutating the process environment. `from_env`
/// overlays the conventional environment variables on the defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the service, without a trailing slash.
    pub base_url: String,
    /// Bootstrap secret presented to the dev registration endpoint.
    pub dev_token: String,
    /// Model name used for chat completion requests.
    pub model: String,
    /// Bound on the registration round trip.
    pub request_timeout: Duration,
    /// Bound on the whole streaming completion exchange.
    pub stream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            dev_token: String::new(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            stream_timeout: Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Build a config from the defaults, overridden by environment
    /// variables where they exist.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(base_url) = std::env::var("P8FS_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(dev_token) = std::env::var("P8FS_DEV_TOKEN_SECRET") {
            config.dev_token = dev_token;
        }
        if let Ok(model) = std::env::var("P8FS_MODEL") {
            config.model = model;
        }
        config
    }

    /// Config pointed at a given base URL, everything else default.
    /// Convenient for tests against a local mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_secret() {
        let config = Config::default();
        assert!(config.dev_token.is_empty());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn with_base_url_keeps_defaults() {
        let config = Config::with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
