//! The property sync engine.
//!
//! Drives generic bidirectional synchronization of device state from the
//! declarative property schema: one full load populates the store from a
//! state snapshot plus a configuration snapshot, single writes are encoded
//! per wire type and issued under the property's command, and unsolicited
//! pushes update only the entries they address.
//!
//! Invariants the engine upholds:
//!
//! - At most one full load is in flight; an overlapping call is rejected
//!   with [`SyncError::Busy`] rather than risking two interleaved partial
//!   snapshots.
//! - A failed load or write leaves the store exactly as it was. The store
//!   only ever shows device-confirmed values, never rejected input.
//! - Validation and applicability failures are resolved locally, before
//!   any bytes reach the transport.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, warn};

use pidlink_core::{
    Command, ConfigurationRecord, HistoryPush, PropertySchema, SchemaError, StatusRecord, Value,
    ValueError, WireReader, WireType,
};

use crate::infrastructure::transport::{DeviceTransport, PushEvent, TransportError};

use super::store::{HistorySnapshot, PropertyStore};
use super::{ReadError, SyncError, WriteError};

/// Schema-driven synchronization engine for one device.
///
/// All operations are asynchronous requests against one logical channel;
/// decode and encode work is CPU-only and bounded by the fixed record
/// sizes, so nothing here blocks a rendering or input thread.
pub struct SyncEngine<T: DeviceTransport> {
    transport: Arc<T>,
    schema: PropertySchema,
    store: RwLock<PropertyStore>,
    /// Held for the duration of a full load; `try_lock` failure means one
    /// is already in flight.
    load_guard: Mutex<()>,
}

impl<T: DeviceTransport> SyncEngine<T> {
    /// Creates an engine over a transport, validating the builtin schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the builtin property table fails
    /// validation — a programming error surfaced at startup.
    pub fn new(transport: Arc<T>) -> Result<Self, SchemaError> {
        Ok(Self {
            transport,
            schema: PropertySchema::builtin()?,
            store: RwLock::new(PropertyStore::default()),
            load_guard: Mutex::new(()),
        })
    }

    /// The validated schema backing this engine.
    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    /// Performs a full read: one state request, one configuration request,
    /// then an atomic store replacement.
    ///
    /// The state request is issued first (reference behavior — the state
    /// reply independently carries its own history block).
    ///
    /// # Errors
    ///
    /// - [`SyncError::Busy`] when another full load is already in flight.
    /// - [`SyncError::Transport`] / [`SyncError::Decode`] when a request or
    ///   decode fails; the previous store is left untouched in both cases.
    pub async fn load_all(&self) -> Result<(), SyncError> {
        let _guard = self.load_guard.try_lock().map_err(|_| SyncError::Busy)?;

        let state_bytes = self.transport.request(Command::GetState, &[]).await?;
        let config_bytes = self.transport.request(Command::GetConfig, &[]).await?;

        let status = StatusRecord::decode(&mut WireReader::new(&state_bytes))?;
        let config = ConfigurationRecord::decode(&mut WireReader::new(&config_bytes))?;

        let fresh = PropertyStore::from_snapshot(&self.schema, &config, Some(&status));
        debug!(entries = fresh.len(), "full snapshot loaded");

        // Single assignment under the write lock: readers see either the
        // old snapshot or the new one, never a mixture.
        *self.store.write().await = fresh;
        Ok(())
    }

    /// Returns the last-known value for `path` without any network I/O.
    ///
    /// # Errors
    ///
    /// - [`ReadError::UnknownProperty`] when the path is not in the schema.
    /// - [`ReadError::Unloaded`] when no value has arrived yet (no full
    ///   load, and nothing pushed for this path).
    pub async fn read_property(&self, path: &str) -> Result<Value, ReadError> {
        let descriptor = self
            .schema
            .descriptor(path)
            .ok_or_else(|| ReadError::UnknownProperty(path.to_string()))?;

        let store = self.store.read().await;
        if descriptor.is_marker() {
            // Markers have no value of their own; report presence.
            return Ok(Value::Bool(store.is_present(descriptor.path)));
        }
        store
            .get(descriptor.path)
            .cloned()
            .ok_or_else(|| ReadError::Unloaded(path.to_string()))
    }

    /// Whether a property is currently actionable: `true` when it has no
    /// `visible_if` dependency, or when the dependency's variant is active
    /// in the loaded snapshot.
    pub async fn is_applicable(&self, path: &str) -> Result<bool, ReadError> {
        let descriptor = self
            .schema
            .descriptor(path)
            .ok_or_else(|| ReadError::UnknownProperty(path.to_string()))?;

        match descriptor.visible_if {
            Some(target) => Ok(self.store.read().await.is_present(target)),
            None => Ok(true),
        }
    }

    /// Validates, encodes, and issues a single property write.
    ///
    /// On acknowledgement the one store entry for `path` is updated in
    /// place — no full reload. Writes to different paths are independent;
    /// ordering between them is the channel's concern.
    ///
    /// # Errors
    ///
    /// - [`WriteError::UnknownProperty`] — path not in the schema.
    /// - [`WriteError::NotWritable`] — telemetry or marker row.
    /// - [`WriteError::Validation`] — wrong value shape, out-of-bounds
    ///   number, overlong string, or a code outside the property's enum
    ///   list. Resolved locally; no request is issued.
    /// - [`WriteError::NotApplicable`] — the property's `visible_if`
    ///   variant is not currently active. No request is issued.
    /// - [`WriteError::Transport`] — the write itself failed or timed out;
    ///   the store keeps the last device-confirmed value.
    pub async fn write_property(&self, path: &str, value: Value) -> Result<(), WriteError> {
        let descriptor = self
            .schema
            .descriptor(path)
            .ok_or_else(|| WriteError::UnknownProperty(path.to_string()))?;

        let command = match descriptor.command {
            Some(command) if descriptor.writable => command,
            _ => return Err(WriteError::NotWritable(path.to_string())),
        };

        self.validate(descriptor.wire_type, descriptor.bounds, descriptor.enum_list, &value)?;

        if let Some(target) = descriptor.visible_if {
            if !self.store.read().await.is_present(target) {
                return Err(WriteError::NotApplicable {
                    path: path.to_string(),
                    requires: target,
                });
            }
        }

        let payload = value.encode(descriptor.wire_type)?;
        self.transport.request(command, &payload).await?;

        self.store.write().await.set(descriptor.path, value);
        debug!(path, command = command.code(), "property write acknowledged");
        Ok(())
    }

    /// Applies a device-initiated push for a single command.
    ///
    /// Only the entries addressed by the command are touched. Unknown
    /// commands are ignored (a newer firmware may push streams this
    /// console does not know), malformed payloads abort only this push.
    pub async fn apply_push(&self, command: Command, payload: &[u8]) -> Result<(), SyncError> {
        if command == Command::HistoryData {
            let push = HistoryPush::decode(&mut WireReader::new(payload))?;
            self.store.write().await.set_history(HistorySnapshot {
                axis_hints: Some((push.sensor_min, push.sensor_max)),
                log: push.log,
            });
            return Ok(());
        }

        let Some(descriptor) = self.schema.by_command(command) else {
            debug!(command = command.code(), "push for unknown command ignored");
            return Ok(());
        };

        let value = Value::decode(descriptor.wire_type, payload)?;
        self.store.write().await.set(descriptor.path, value);
        Ok(())
    }

    /// Drains a transport push channel into [`apply_push`](Self::apply_push)
    /// until the channel closes.
    pub async fn run_push_loop(&self, mut pushes: mpsc::Receiver<PushEvent>) {
        while let Some((command, payload)) = pushes.recv().await {
            if let Err(error) = self.apply_push(command, &payload).await {
                warn!(command = command.code(), %error, "discarding malformed push");
            }
        }
        debug!("push channel closed");
    }

    /// Clone of the latest history snapshot, if one has arrived.
    pub async fn history(&self) -> Option<HistorySnapshot> {
        self.store.read().await.history().cloned()
    }

    /// Asks the device to reboot.
    ///
    /// The store is left as-is; the session layer observes the disconnect
    /// and the caller performs a fresh [`load_all`](Self::load_all) once
    /// the channel is back.
    pub async fn restart_device(&self) -> Result<(), SyncError> {
        self.transport.request(Command::Restart, &[]).await?;
        Ok(())
    }

    /// Local wire-type, bounds, and enum validation. No I/O.
    fn validate(
        &self,
        wire_type: WireType,
        bounds: Option<(f64, f64)>,
        enum_list: Option<&'static str>,
        value: &Value,
    ) -> Result<(), WriteError> {
        // A dry-run encode catches shape mismatches and field overflows.
        value.encode(wire_type)?;

        if let (Some((min, max)), Some(number)) = (bounds, value.as_f64()) {
            if number < min || number > max {
                return Err(WriteError::Validation(format!(
                    "value {number} outside [{min}, {max}]"
                )));
            }
        }

        if let (Some(list), Value::U8(code)) = (enum_list, value) {
            let known = self
                .schema
                .enum_list(list)
                .is_some_and(|l| l.label(*code).is_some());
            if !known {
                return Err(WriteError::Validation(format!(
                    "code {code} is not in enum list {list}"
                )));
            }
        }

        Ok(())
    }
}

impl From<ValueError> for WriteError {
    fn from(error: ValueError) -> Self {
        WriteError::Validation(error.to_string())
    }
}

impl From<TransportError> for WriteError {
    fn from(error: TransportError) -> Self {
        WriteError::Transport(error)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
