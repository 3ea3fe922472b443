//! The property store: last-known device state, keyed by property path.
//!
//! The store is owned exclusively by the sync engine — there is a single
//! writer. A full load builds a fresh store from one configuration snapshot
//! plus one status snapshot and swaps it in whole, so readers never observe
//! a half-populated state. Individual entries are updated in place when a
//! write is acknowledged or a single-command push arrives.

use std::collections::{HashMap, HashSet};

use pidlink_core::{
    ConfigurationRecord, ControlVariant, HistoryLog, PropertySchema, SensorVariant, StatusRecord,
    Value,
};

/// The latest history block together with its push-envelope axis hints.
///
/// Hints are only carried by the standalone telemetry push; history taken
/// from a full-state reply has none.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    pub axis_hints: Option<(f32, f32)>,
    pub log: HistoryLog,
}

/// Runtime mapping from property path to last-known decoded value.
#[derive(Debug, Default)]
pub struct PropertyStore {
    values: HashMap<&'static str, Value>,
    /// Paths of variant markers currently present (variant active).
    markers: HashSet<&'static str>,
    history: Option<HistorySnapshot>,
}

impl PropertyStore {
    /// Builds a complete store from freshly decoded snapshots.
    ///
    /// This is a pure projection of the decoded records onto the schema's
    /// dotted paths; it performs no I/O and is independently testable.
    pub fn from_snapshot(
        schema: &PropertySchema,
        config: &ConfigurationRecord,
        status: Option<&StatusRecord>,
    ) -> Self {
        let mut store = Self::default();

        store.set("power", Value::Bool(config.power));

        store.set("sensor.type", Value::U8(config.sensor.kind));
        match config.sensor.variant {
            Some(SensorVariant::Analog { pin, resolution }) => {
                store.mark("sensor.analog");
                store.set("sensor.analog.pin", Value::U8(pin));
                store.set("sensor.analog.resolution", Value::U8(resolution));
            }
            Some(SensorVariant::DigitalTemp {
                pin,
                resolution,
                parasite_power,
            }) => {
                store.mark("sensor.digital");
                store.set("sensor.digital.pin", Value::U8(pin));
                store.set("sensor.digital.resolution", Value::U8(resolution));
                store.set("sensor.digital.parasite", Value::Bool(parasite_power));
            }
            None => {}
        }

        store.set("control.type", Value::U8(config.control.kind));
        match config.control.variant {
            Some(ControlVariant::Pwm { pin, period_us }) => {
                store.mark("control.pwm");
                store.set("control.pwm.pin", Value::U8(pin));
                store.set("control.pwm.period", Value::U16(period_us));
            }
            None => {}
        }

        store.set("pid.target", Value::F32(config.pid.target));
        store.set("pid.p", Value::F32(config.pid.p));
        store.set("pid.i", Value::F32(config.pid.i));
        store.set("pid.d", Value::F32(config.pid.d));
        store.set("pid.interval", Value::U16(config.pid.interval_ms));
        store.set("pid.reverse", Value::Bool(config.pid.reverse));

        store.set("night.enabled", Value::Bool(config.night_mode.enabled));
        store.set("night.start", Value::U32(config.night_mode.start_time));
        store.set("night.end", Value::U32(config.night_mode.end_time));

        let system = &config.system;
        store.set("system.mdns_name", Value::Text(system.mdns_name.clone()));
        store.set("system.wifi_mode", Value::U8(system.wifi_mode));
        store.set("system.wifi_ssid", Value::Text(system.wifi_ssid.clone()));
        store.set(
            "system.wifi_password",
            Value::Text(system.wifi_password.clone()),
        );
        store.set(
            "system.wifi_check_interval",
            Value::U32(system.wifi_check_interval_ms),
        );
        store.set(
            "system.wifi_max_retry_interval",
            Value::U32(system.wifi_max_retry_interval_ms),
        );
        store.set("system.time_zone", Value::F32(system.time_zone_offset));
        store.set("system.mqtt_enabled", Value::Bool(system.mqtt_enabled));
        store.set("system.mqtt_host", Value::Text(system.mqtt_host.clone()));
        store.set("system.mqtt_port", Value::U16(system.mqtt_port));
        store.set("system.mqtt_user", Value::Text(system.mqtt_user.clone()));
        store.set(
            "system.mqtt_password",
            Value::Text(system.mqtt_password.clone()),
        );

        if let Some(status) = status {
            store.set("status.sensor_value", Value::F32(status.sensor_value));
            store.set("status.control_value", Value::F32(status.control_value));
            if let Some(log) = &status.history {
                store.history = Some(HistorySnapshot {
                    axis_hints: None,
                    log: log.clone(),
                });
            }
        }

        debug_assert!(
            store.values.keys().all(|p| schema.descriptor(p).is_some()),
            "snapshot projection used a path missing from the schema"
        );

        store
    }

    /// Last-known value for a path, if one has been loaded.
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    /// Whether a variant marker is currently present.
    pub fn is_present(&self, path: &str) -> bool {
        self.markers.contains(path)
    }

    /// The latest history block, if any has arrived.
    pub fn history(&self) -> Option<&HistorySnapshot> {
        self.history.as_ref()
    }

    /// Updates a single entry in place.
    pub(crate) fn set(&mut self, path: &'static str, value: Value) {
        self.values.insert(path, value);
    }

    /// Records a variant marker as present.
    pub(crate) fn mark(&mut self, path: &'static str) {
        self.markers.insert(path);
    }

    /// Replaces the history block.
    pub(crate) fn set_history(&mut self, snapshot: HistorySnapshot) {
        self.history = Some(snapshot);
    }

    /// Number of loaded value entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store has been populated at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
