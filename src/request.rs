use std::time::Duration;

use reqwest::Method;
use serde_json::Value as JsonValue;

/// Per-call request description, merged with [`ClientConfig`] defaults by
/// [`VaiaClient::execute`].
///
/// [`ClientConfig`]: crate::ClientConfig
/// [`VaiaClient::execute`]: crate::VaiaClient::execute
#[derive(Clone, Debug)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured base URL.
    pub path: String,
    /// Extra headers; the bearer credential is attached by the client.
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<JsonValue>,
    /// Per-call total timeout; wins over the configured default when set.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    /// Creates a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON body.
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `body` and sets it as the JSON body.
    ///
    /// Returns a [`Decode`](crate::VaiaError::Decode) error if serialization
    /// fails.
    pub fn with_json<T: serde::Serialize>(self, body: &T) -> crate::Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|err| crate::VaiaError::Decode(format!("request body: {err}")))?;
        Ok(self.with_body(value))
    }

    /// Overrides the total timeout for this call only.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
