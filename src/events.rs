use std::time::Duration;

use crate::ErrorKind;

/// Terminal shape of a request, reported on [`Event::RequestCompleted`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutcomeKind {
    /// Request succeeded; carries the final HTTP status.
    Success { status: u16 },
    /// Request failed with the given classification.
    Failure(ErrorKind),
}

/// Structured observability event emitted by the client.
///
/// Events describe attempts and the final outcome only; they never carry the
/// API key or request bodies. Formatting and routing are the sink's job.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An attempt is about to be issued. `attempt` is 0-based.
    AttemptStarted { attempt: usize },
    /// An attempt failed after `elapsed`.
    AttemptFailed {
        attempt: usize,
        elapsed: Duration,
        kind: ErrorKind,
    },
    /// An attempt succeeded after `elapsed`.
    AttemptSucceeded {
        attempt: usize,
        elapsed: Duration,
        status: u16,
    },
    /// The request reached a terminal outcome. Emitted exactly once per
    /// `execute` call when logging is enabled.
    RequestCompleted {
        total_attempts: usize,
        outcome: OutcomeKind,
    },
}

/// Receives client events when logging is enabled.
///
/// Implementations must not block the request path; a panicking sink is
/// contained by the client and cannot change the request outcome.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &Event);
}

/// Discards every event. Used when no sink is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_event(&self, _event: &Event) {}
}

/// Forwards events to `tracing` as structured records.
///
/// The configured log channel is attached as a `channel` field so downstream
/// subscribers can route on it.
#[derive(Clone, Debug, Default)]
pub struct TracingSink {
    channel: Option<String>,
}

impl TracingSink {
    pub fn new(channel: Option<String>) -> Self {
        Self { channel }
    }

    fn channel(&self) -> &str {
        self.channel.as_deref().unwrap_or("default")
    }
}

impl EventSink for TracingSink {
    fn on_event(&self, event: &Event) {
        match event {
            Event::AttemptStarted { attempt } => {
                tracing::debug!(channel = self.channel(), attempt, "attempt started");
            }
            Event::AttemptFailed {
                attempt,
                elapsed,
                kind,
            } => {
                tracing::warn!(
                    channel = self.channel(),
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    kind = ?kind,
                    "attempt failed"
                );
            }
            Event::AttemptSucceeded {
                attempt,
                elapsed,
                status,
            } => {
                tracing::debug!(
                    channel = self.channel(),
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    status,
                    "attempt succeeded"
                );
            }
            Event::RequestCompleted {
                total_attempts,
                outcome,
            } => {
                tracing::debug!(
                    channel = self.channel(),
                    total_attempts,
                    outcome = ?outcome,
                    "request completed"
                );
            }
        }
    }
}
