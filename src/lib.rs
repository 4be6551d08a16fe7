//! `vaia-http` is a resilient async HTTP client core for the VAIA API.
//!
//! The crate wraps request execution with configurable timeouts, exponential
//! backoff retries of transient failures, and optional structured
//! observability events:
//! - [`VaiaClient::execute`]
//! - [`VaiaClient::execute_cancellable`]
//! - [`ClientConfig::from_env`]

mod client;
mod config;
mod error;
mod events;
mod request;
mod retry;

pub use client::{ApiResponse, VaiaClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ErrorKind, VaiaError};
pub use events::{Event, EventSink, NoopSink, OutcomeKind, TracingSink};
pub use request::RequestSpec;
pub use retry::{RetryDecision, RetryPolicy};

pub type Result<T> = std::result::Result<T, VaiaError>;
