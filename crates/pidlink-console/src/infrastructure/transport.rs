//! The transport boundary consumed by the sync engine.
//!
//! The session layer — opening the channel, framing signed requests,
//! matching responses to pending requests, reconnecting with backoff — is
//! an external collaborator. The engine only depends on this contract:
//!
//! - [`DeviceTransport::request`] resolves or rejects within a bounded
//!   time (the reference default is [`DEFAULT_REQUEST_TIMEOUT`]); on
//!   timeout it rejects with [`TransportError::Timeout`].
//! - Device-initiated pushes (telemetry scalars, fresh history blocks)
//!   arrive as `(Command, payload)` pairs on an mpsc channel which the
//!   engine drains via [`SyncEngine::run_push_loop`].
//!
//! Cancellation is the transport's responsibility: the engine never
//! retries, and on a rejected request it leaves its store untouched.
//!
//! [`SyncEngine::run_push_loop`]: crate::application::SyncEngine::run_push_loop

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use pidlink_core::Command;

/// Reference upper bound for a single request/response exchange.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(2000);

/// A device-initiated push: the addressed command plus its raw payload.
pub type PushEvent = (Command, Vec<u8>);

/// Failures surfaced by the channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not resolve within the transport's deadline.
    #[error("request timed out")]
    Timeout,

    /// The channel is closed; the session layer will reconnect on its own
    /// schedule.
    #[error("channel closed")]
    Closed,

    /// Any other I/O failure, stringified at the boundary.
    #[error("transport failure: {0}")]
    Io(String),
}

/// Asynchronous request/response channel to the device.
///
/// One logical channel per device; the transport owns request/response
/// matching and ordering. Implementations must be safe to share across
/// tasks (`Send + Sync`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    /// Sends `command` with `payload` and resolves with the response bytes.
    ///
    /// An empty payload is a plain query (e.g. `GetConfig`); a non-empty
    /// payload is a property write, acknowledged with an empty or echo
    /// response.
    async fn request(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>, TransportError>;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
