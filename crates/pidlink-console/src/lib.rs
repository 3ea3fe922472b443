//! # pidlink-console
//!
//! Operator-console application layer for PIDLink.
//!
//! This crate consumes the codecs and the property schema from
//! [`pidlink_core`] and adds the pieces that talk to a live device:
//!
//! - **`application`** — the [`SyncEngine`]: schema-driven full loads,
//!   validated single-property writes, and push handling, all against the
//!   single-writer [`PropertyStore`].
//! - **`infrastructure`** — the [`DeviceTransport`] boundary the session
//!   layer implements; the engine depends only on its contract.
//!
//! The binary in `main.rs` is an offline inspection tool: it validates the
//! schema and decodes captured device snapshots without a transport.

pub mod application;
pub mod infrastructure;

pub use application::{
    HistorySnapshot, PropertyStore, ReadError, SyncEngine, SyncError, WriteError,
};
pub use infrastructure::{DeviceTransport, PushEvent, TransportError, DEFAULT_REQUEST_TIMEOUT};
