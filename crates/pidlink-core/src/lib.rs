//! # pidlink-core
//!
//! Shared library for PIDLink containing the device wire codec, the command
//! table, and the declarative property schema.
//!
//! PIDLink is an operator console for a small embedded PID regulator: a
//! device that reads one sensor, drives one control output, and exposes its
//! configuration and telemetry over a persistent request/response channel
//! in a compact fixed-layout binary format.
//!
//! This crate is the protocol foundation. It has zero dependencies on OS
//! APIs, sockets, or async runtimes, and it defines:
//!
//! - **`wire`** — a cursor-based reader/writer for the device's
//!   little-endian fixed-width primitives (flags, integers, floats,
//!   null-padded strings, opaque blocks).
//!
//! - **`protocol`** — the typed records: the full configuration snapshot
//!   with its discriminant-selected sensor/control variant blocks, the live
//!   status record, and the history ring buffer in both of its wire shapes.
//!
//! - **`schema`** — the static property table mapping each logical device
//!   property to a wire command, a primitive wire type, optional enum
//!   lists, visibility dependencies, bounds, and display hooks. The sync
//!   engine in `pidlink-console` drives all device reads and writes from
//!   this table.

pub mod protocol;
pub mod schema;
pub mod wire;

// Re-export the most-used types at the crate root so callers can write
// `pidlink_core::ConfigurationRecord` instead of the full module path.
pub use protocol::{
    Command, ConfigurationRecord, ControlVariant, HistoryLog, HistoryPush, HistorySample,
    SensorVariant, StatusRecord, CONFIG_WIRE_LEN, VARIANT_BLOCK_LEN,
};
pub use schema::{
    PropertyDescriptor, PropertySchema, SchemaError, Value, ValueError, WireType,
};
pub use wire::{WireError, WireReader, WireWriter, CONFIG_STRING_LEN};
