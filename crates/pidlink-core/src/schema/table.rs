//! The built-in property table for the PID regulator device.
//!
//! One row per externally visible property, in the order the operator
//! console presents them. Variant-scoped rows (`sensor.analog.*`,
//! `sensor.digital.*`, `control.pwm.*`) hang off a command-less marker row
//! through `visible_if`; the marker is present in a loaded snapshot exactly
//! when the device reports that variant active.

use crate::protocol::Command;

use super::{EnumList, PropertyDescriptor, Value, WireType};

const STRING: WireType = WireType::FixedString(crate::wire::CONFIG_STRING_LEN);

/// Plain read-write property.
const fn field(path: &'static str, command: Command, wire_type: WireType) -> PropertyDescriptor {
    PropertyDescriptor {
        path,
        command: Some(command),
        wire_type,
        enum_list: None,
        visible_if: None,
        bounds: None,
        display: None,
        writable: true,
    }
}

/// Device-pushed telemetry, never written by the console.
const fn telemetry(path: &'static str, command: Command, wire_type: WireType) -> PropertyDescriptor {
    PropertyDescriptor {
        writable: false,
        ..field(path, command, wire_type)
    }
}

/// Variant-presence marker: a `visible_if` target with no command.
const fn marker(path: &'static str) -> PropertyDescriptor {
    PropertyDescriptor {
        path,
        command: None,
        wire_type: WireType::Bool,
        enum_list: None,
        visible_if: None,
        bounds: None,
        display: None,
        writable: false,
    }
}

/// Declared enumerated value lists.
pub static ENUM_LISTS: &[EnumList] = &[
    EnumList {
        name: "wifi_mode",
        entries: &[(0, "AP"), (1, "STA")],
    },
    EnumList {
        name: "sensor_type",
        entries: &[(0, "Analog"), (1, "DigitalTemp")],
    },
    EnumList {
        name: "control_type",
        entries: &[(0, "PWM")],
    },
];

/// Every property the console can observe or configure.
pub static PROPERTIES: &[PropertyDescriptor] = &[
    // ── Status ────────────────────────────────────────────────────────────
    PropertyDescriptor {
        display: Some(fmt_reading),
        ..telemetry("status.sensor_value", Command::SensorValue, WireType::F32)
    },
    PropertyDescriptor {
        display: Some(fmt_percent),
        ..telemetry("status.control_value", Command::ControlValue, WireType::F32)
    },
    telemetry("status.history", Command::HistoryData, WireType::Blob),
    // ── General ───────────────────────────────────────────────────────────
    field("power", Command::Power, WireType::Bool),
    // ── Night mode ────────────────────────────────────────────────────────
    field("night.enabled", Command::NightModeEnabled, WireType::Bool),
    PropertyDescriptor {
        display: Some(fmt_clock),
        ..field("night.start", Command::NightModeStart, WireType::U32)
    },
    PropertyDescriptor {
        display: Some(fmt_clock),
        ..field("night.end", Command::NightModeEnd, WireType::U32)
    },
    // ── Sensor ────────────────────────────────────────────────────────────
    PropertyDescriptor {
        enum_list: Some("sensor_type"),
        ..field("sensor.type", Command::SensorType, WireType::U8)
    },
    marker("sensor.analog"),
    PropertyDescriptor {
        visible_if: Some("sensor.analog"),
        ..field("sensor.analog.pin", Command::AnalogPin, WireType::U8)
    },
    PropertyDescriptor {
        visible_if: Some("sensor.analog"),
        bounds: Some((8.0, 14.0)),
        ..field(
            "sensor.analog.resolution",
            Command::AnalogResolution,
            WireType::U8,
        )
    },
    marker("sensor.digital"),
    PropertyDescriptor {
        visible_if: Some("sensor.digital"),
        ..field("sensor.digital.pin", Command::DigitalTempPin, WireType::U8)
    },
    PropertyDescriptor {
        visible_if: Some("sensor.digital"),
        bounds: Some((9.0, 12.0)),
        ..field(
            "sensor.digital.resolution",
            Command::DigitalTempResolution,
            WireType::U8,
        )
    },
    PropertyDescriptor {
        visible_if: Some("sensor.digital"),
        ..field(
            "sensor.digital.parasite",
            Command::DigitalTempParasite,
            WireType::Bool,
        )
    },
    // ── Control ───────────────────────────────────────────────────────────
    PropertyDescriptor {
        enum_list: Some("control_type"),
        ..field("control.type", Command::ControlType, WireType::U8)
    },
    marker("control.pwm"),
    PropertyDescriptor {
        visible_if: Some("control.pwm"),
        ..field("control.pwm.pin", Command::PwmPin, WireType::U8)
    },
    PropertyDescriptor {
        visible_if: Some("control.pwm"),
        ..field("control.pwm.period", Command::PwmPeriod, WireType::U16)
    },
    // ── PID ───────────────────────────────────────────────────────────────
    field("pid.target", Command::PidTarget, WireType::F32),
    field("pid.interval", Command::PidInterval, WireType::U16),
    PropertyDescriptor {
        display: Some(fmt_coefficient),
        ..field("pid.p", Command::PidProportional, WireType::F32)
    },
    PropertyDescriptor {
        display: Some(fmt_coefficient),
        ..field("pid.i", Command::PidIntegral, WireType::F32)
    },
    PropertyDescriptor {
        display: Some(fmt_coefficient),
        ..field("pid.d", Command::PidDerivative, WireType::F32)
    },
    field("pid.reverse", Command::PidReverse, WireType::Bool),
    // ── System ────────────────────────────────────────────────────────────
    field("system.mdns_name", Command::MdnsName, STRING),
    PropertyDescriptor {
        enum_list: Some("wifi_mode"),
        ..field("system.wifi_mode", Command::WifiMode, WireType::U8)
    },
    field("system.wifi_ssid", Command::WifiSsid, STRING),
    field("system.wifi_password", Command::WifiPassword, STRING),
    field(
        "system.wifi_check_interval",
        Command::WifiCheckInterval,
        WireType::U32,
    ),
    field(
        "system.wifi_max_retry_interval",
        Command::WifiMaxRetryInterval,
        WireType::U32,
    ),
    field("system.time_zone", Command::TimeZone, WireType::F32),
    field("system.mqtt_enabled", Command::MqttEnabled, WireType::Bool),
    field("system.mqtt_host", Command::MqttHost, STRING),
    field("system.mqtt_port", Command::MqttPort, WireType::U16),
    field("system.mqtt_user", Command::MqttUser, STRING),
    field("system.mqtt_password", Command::MqttPassword, STRING),
];

// ── Display hooks ─────────────────────────────────────────────────────────────

/// Sensor reading, two decimal places.
fn fmt_reading(value: &Value) -> String {
    match value {
        Value::F32(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

/// Control output as a percentage.
fn fmt_percent(value: &Value) -> String {
    match value {
        Value::F32(v) => format!("{:.0}%", v * 100.0),
        other => other.to_string(),
    }
}

/// PID coefficient: four decimal places with trailing zeros trimmed.
fn fmt_coefficient(value: &Value) -> String {
    let Value::F32(v) = value else {
        return value.to_string();
    };
    let fixed = format!("{v:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Seconds since midnight rendered as HH:MM.
fn fmt_clock(value: &Value) -> String {
    match value {
        Value::U32(seconds) => {
            format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
        }
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
