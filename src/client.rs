use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    events::{Event, EventSink, NoopSink, OutcomeKind},
    ClientConfig, RequestSpec, Result, VaiaError,
};

/// Successful HTTP exchange: final status and raw response body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            VaiaError::Decode(format!(
                "invalid response JSON: {err}; body: {}",
                self.body
            ))
        })
    }
}

/// HTTP client for the VAIA API.
///
/// Holds an immutable [`ClientConfig`] and a pooled `reqwest` client; cloning
/// is cheap and clones share the connection pool. Concurrent [`execute`]
/// calls are fully independent.
///
/// [`execute`]: VaiaClient::execute
#[derive(Clone)]
pub struct VaiaClient {
    http: reqwest::Client,
    config: ClientConfig,
    sink: Arc<dyn EventSink>,
}

impl fmt::Debug for VaiaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaiaClient")
            .field("config", &self.config)
            .finish()
    }
}

impl VaiaClient {
    /// Creates a client from a config.
    ///
    /// The connect timeout is enforced by the underlying HTTP client,
    /// independently of the per-request total timeout. When
    /// `config.verify_tls` is false, certificate validation is skipped
    /// (development-only).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(VaiaError::Network)?;
        Ok(Self {
            http,
            config,
            sink: Arc::new(NoopSink),
        })
    }

    /// Creates a client from the `VAIA_*` environment variables.
    ///
    /// See [`ClientConfig::from_env`] for the recognized variables.
    pub fn from_env() -> std::result::Result<Self, String> {
        let config = ClientConfig::from_env()?;
        Self::new(config).map_err(|err| format!("failed to build HTTP client: {err}"))
    }

    /// Installs an event sink. Events are only delivered when
    /// `logging_enabled` is set on the config.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The config this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Executes a request, retrying transient failures per the configured
    /// retry policy.
    ///
    /// Returns the first success, or a terminal error: non-transient
    /// failures surface immediately, transient failures surface as
    /// [`VaiaError::Exhausted`] once the retry budget is spent.
    pub async fn execute(&self, spec: RequestSpec) -> Result<ApiResponse> {
        self.run(&spec, None).await
    }

    /// Like [`execute`](VaiaClient::execute), but aborts with
    /// [`VaiaError::Cancelled`] when `cancel` fires — the in-flight attempt
    /// is dropped and remaining retries are skipped, including during
    /// backoff.
    pub async fn execute_cancellable(
        &self,
        spec: RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse> {
        self.run(&spec, Some(cancel)).await
    }

    async fn run(
        &self,
        spec: &RequestSpec,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse> {
        let url = self.join_url(&spec.path);
        let timeout = spec.timeout.unwrap_or(self.config.request_timeout);
        let mut attempt = 0usize;
        loop {
            self.emit(Event::AttemptStarted { attempt });
            let started = Instant::now();

            let result = match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => return self.finish_cancelled(attempt + 1),
                        result = self.send_once(spec, &url, timeout) => result,
                    }
                }
                None => self.send_once(spec, &url, timeout).await,
            };
            let elapsed = started.elapsed();

            match result {
                Ok(response) => {
                    self.emit(Event::AttemptSucceeded {
                        attempt,
                        elapsed,
                        status: response.status,
                    });
                    self.emit(Event::RequestCompleted {
                        total_attempts: attempt + 1,
                        outcome: OutcomeKind::Success {
                            status: response.status,
                        },
                    });
                    return Ok(response);
                }
                Err(err) => {
                    let kind = err.kind();
                    self.emit(Event::AttemptFailed {
                        attempt,
                        elapsed,
                        kind,
                    });

                    // `attempt` doubles as the 0-based retry index: after
                    // the first attempt fails, retry slot 0 is consulted.
                    let decision = self.config.retry.decide(attempt, kind);
                    if !decision.retry {
                        let attempts = attempt + 1;
                        let err = if kind.is_transient() {
                            VaiaError::Exhausted {
                                attempts,
                                source: Box::new(err),
                            }
                        } else {
                            err
                        };
                        self.emit(Event::RequestCompleted {
                            total_attempts: attempts,
                            outcome: OutcomeKind::Failure(kind),
                        });
                        return Err(err);
                    }

                    tracing::debug!(
                        delay_ms = decision.delay.as_millis() as u64,
                        "retrying request after backoff"
                    );
                    match cancel {
                        Some(token) => {
                            tokio::select! {
                                _ = token.cancelled() => return self.finish_cancelled(attempt + 1),
                                _ = sleep(decision.delay) => {}
                            }
                        }
                        None => sleep(decision.delay).await,
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn send_once(
        &self,
        spec: &RequestSpec,
        url: &str,
        timeout: Duration,
    ) -> Result<ApiResponse> {
        let mut request = self
            .http
            .request(spec.method.clone(), url)
            .bearer_auth(&self.config.api_key)
            .timeout(timeout);
        for (name, value) in &spec.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(classify_transport)?;

        if status.is_server_error() {
            return Err(VaiaError::Server {
                status: status.as_u16(),
                body,
            });
        }
        if status.is_client_error() {
            return Err(VaiaError::Client {
                status: status.as_u16(),
                body,
            });
        }
        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn finish_cancelled(&self, total_attempts: usize) -> Result<ApiResponse> {
        self.emit(Event::RequestCompleted {
            total_attempts,
            outcome: OutcomeKind::Failure(crate::ErrorKind::Cancelled),
        });
        Err(VaiaError::Cancelled)
    }

    fn join_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Delivers an event to the sink when logging is enabled. A panicking
    /// sink is contained here and cannot change the request outcome.
    fn emit(&self, event: Event) {
        if !self.config.logging_enabled {
            return;
        }
        let delivered = catch_unwind(AssertUnwindSafe(|| self.sink.on_event(&event)));
        if delivered.is_err() {
            tracing::debug!("event sink panicked; event dropped");
        }
    }
}

fn classify_transport(err: reqwest::Error) -> VaiaError {
    if err.is_timeout() {
        VaiaError::Timeout(err)
    } else {
        VaiaError::Network(err)
    }
}
