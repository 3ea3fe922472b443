//! Application layer: the property store and the sync engine.

pub mod engine;
pub mod store;

pub use engine::SyncEngine;
pub use store::{HistorySnapshot, PropertyStore};

use thiserror::Error;

use pidlink_core::WireError;

use crate::infrastructure::transport::TransportError;

/// Failures of a full load.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another full load is already in flight. The caller may simply await
    /// the pending one; two loads are never interleaved into the store.
    #[error("a full load is already in flight")]
    Busy,

    /// A request failed or timed out; the previous store is untouched.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A reply did not decode; the previous store is untouched.
    #[error("snapshot decode failed: {0}")]
    Decode(#[from] WireError),
}

/// Failures of a local property read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("unknown property path: {0}")]
    UnknownProperty(String),

    /// Nothing has been loaded or pushed for this path yet.
    #[error("no value loaded for property: {0}")]
    Unloaded(String),
}

/// Failures of a property write.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("unknown property path: {0}")]
    UnknownProperty(String),

    /// Telemetry streams and variant markers do not accept writes.
    #[error("property is not writable: {0}")]
    NotWritable(String),

    /// The supplied value is mistyped or out of range. Rejected before any
    /// I/O; the store keeps the last device-confirmed value.
    #[error("invalid value: {0}")]
    Validation(String),

    /// The property's variant is not currently active on the device.
    #[error("property {path} is not applicable: requires {requires}")]
    NotApplicable {
        path: String,
        requires: &'static str,
    },

    /// The write request itself failed; the store is untouched.
    #[error(transparent)]
    Transport(TransportError),
}
