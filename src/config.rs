use std::fmt;
use std::time::Duration;

use crate::RetryPolicy;

/// Default API endpoint; override for testing or staging environments.
pub const DEFAULT_BASE_URL: &str = "https://api.vaia.com";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection parameters for [`VaiaClient`](crate::VaiaClient).
///
/// Constructed once at startup and never mutated; the client stores its own
/// copy, so one config value can seed any number of clients.
#[derive(Clone, Eq, PartialEq)]
pub struct ClientConfig {
    /// Bearer credential attached to every request.
    pub api_key: String,
    /// Request target root; paths from [`RequestSpec`](crate::RequestSpec)
    /// are joined onto it.
    pub base_url: String,
    /// Total round-trip deadline per attempt.
    pub request_timeout: Duration,
    /// Connection establishment deadline, enforced independently of
    /// `request_timeout`.
    pub connect_timeout: Duration,
    /// Retry budget and backoff base for transient failures.
    pub retry: RetryPolicy,
    /// Toggles observability event emission.
    pub logging_enabled: bool,
    /// External sink selector, forwarded verbatim on emitted events. `None`
    /// means the sink's default channel.
    pub log_channel: Option<String>,
    /// TLS certificate verification. Disable only for development against
    /// self-signed endpoints.
    pub verify_tls: bool,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("retry", &self.retry)
            .field("logging_enabled", &self.logging_enabled)
            .field("log_channel", &self.log_channel)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a config with the given API key and documented defaults for
    /// everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            retry: RetryPolicy::default(),
            logging_enabled: false,
            log_channel: None,
            verify_tls: true,
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the total per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Overrides the connection establishment timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Overrides the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enables observability events, optionally naming the sink channel.
    pub fn with_logging(mut self, channel: Option<String>) -> Self {
        self.logging_enabled = true;
        self.log_channel = channel;
        self
    }

    /// Disables TLS certificate verification. Development-only.
    pub fn without_tls_verification(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Creates a config from environment variables.
    ///
    /// Reads:
    /// - `VAIA_API_KEY` — bearer credential (required, must be non-empty)
    /// - `VAIA_BASE_URL` — endpoint root (default `https://api.vaia.com`)
    /// - `VAIA_TIMEOUT` — total request timeout in seconds (default 30)
    /// - `VAIA_CONNECT_TIMEOUT` — connect timeout in seconds (default 10)
    /// - `VAIA_RETRY_TIMES` — max retries after the initial attempt (default 3)
    /// - `VAIA_RETRY_SLEEP` — base backoff in milliseconds (default 100)
    /// - `VAIA_LOGGING_ENABLED` — `true`/`false`/`1`/`0` (default false)
    /// - `VAIA_LOG_CHANNEL` — sink channel name (default unset)
    /// - `VAIA_VERIFY_SSL` — TLS verification toggle (default true)
    ///
    /// Any other `VAIA_*` variables are ignored. Returns an error if the API
    /// key is missing or empty, or if a set variable fails to parse.
    pub fn from_env() -> std::result::Result<Self, String> {
        let api_key = std::env::var("VAIA_API_KEY")
            .map_err(|_| "missing VAIA_API_KEY environment variable".to_owned())?;
        if api_key.trim().is_empty() {
            return Err("VAIA_API_KEY is set but empty".to_owned());
        }

        let mut config = Self::new(api_key);
        if let Some(base_url) = env_string("VAIA_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(seconds) = env_parsed::<u64>("VAIA_TIMEOUT")? {
            config.request_timeout = Duration::from_secs(seconds);
        }
        if let Some(seconds) = env_parsed::<u64>("VAIA_CONNECT_TIMEOUT")? {
            config.connect_timeout = Duration::from_secs(seconds);
        }
        if let Some(times) = env_parsed::<usize>("VAIA_RETRY_TIMES")? {
            config.retry.max_attempts = times;
        }
        if let Some(millis) = env_parsed::<u64>("VAIA_RETRY_SLEEP")? {
            config.retry.base_delay = Duration::from_millis(millis);
        }
        if let Some(enabled) = env_bool("VAIA_LOGGING_ENABLED")? {
            config.logging_enabled = enabled;
        }
        config.log_channel = env_string("VAIA_LOG_CHANNEL");
        if let Some(verify) = env_bool("VAIA_VERIFY_SSL")? {
            config.verify_tls = verify;
        }
        Ok(config)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> std::result::Result<Option<T>, String> {
    match env_string(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| format!("{name} has invalid value '{value}'")),
        None => Ok(None),
    }
}

fn env_bool(name: &str) -> std::result::Result<Option<bool>, String> {
    match env_string(name) {
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            other => Err(format!("{name} has invalid boolean value '{other}'")),
        },
        None => Ok(None),
    }
}
