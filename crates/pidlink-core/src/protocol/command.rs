//! Device command table.
//!
//! Every request, writable property, and telemetry stream is addressed by a
//! single stable one-byte command code. Codes are grouped by range:
//!
//! - `0x01–0x0F` — whole-record requests and device actions
//! - `0x10–0x2F` — configuration properties
//! - `0x40–0x5F` — variant-scoped properties (meaningful only while the
//!   matching sensor/control variant is active)
//! - `0x60–0x6F` — telemetry streams pushed by the device
//!
//! Codes must never be reused or renumbered; the device firmware and the
//! console agree on them byte for byte.

/// All command codes understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Requests and actions (0x01–0x0F)
    GetConfig = 0x01,
    GetState = 0x02,
    Restart = 0x03,

    // Configuration properties (0x10–0x2F)
    Power = 0x10,
    SensorType = 0x11,
    ControlType = 0x12,
    PidTarget = 0x13,
    PidProportional = 0x14,
    PidIntegral = 0x15,
    PidDerivative = 0x16,
    PidInterval = 0x17,
    PidReverse = 0x18,
    NightModeEnabled = 0x19,
    NightModeStart = 0x1A,
    NightModeEnd = 0x1B,
    MdnsName = 0x20,
    WifiMode = 0x21,
    WifiSsid = 0x22,
    WifiPassword = 0x23,
    WifiCheckInterval = 0x24,
    WifiMaxRetryInterval = 0x25,
    TimeZone = 0x26,
    MqttEnabled = 0x27,
    MqttHost = 0x28,
    MqttPort = 0x29,
    MqttUser = 0x2A,
    MqttPassword = 0x2B,

    // Variant-scoped properties (0x40–0x5F)
    AnalogPin = 0x40,
    AnalogResolution = 0x41,
    DigitalTempPin = 0x42,
    DigitalTempResolution = 0x43,
    DigitalTempParasite = 0x44,
    PwmPin = 0x50,
    PwmPeriod = 0x51,

    // Telemetry streams (0x60–0x6F)
    SensorValue = 0x60,
    ControlValue = 0x61,
    HistoryData = 0x62,
}

impl Command {
    /// Wire code for this command.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x01 => Ok(Command::GetConfig),
            0x02 => Ok(Command::GetState),
            0x03 => Ok(Command::Restart),
            0x10 => Ok(Command::Power),
            0x11 => Ok(Command::SensorType),
            0x12 => Ok(Command::ControlType),
            0x13 => Ok(Command::PidTarget),
            0x14 => Ok(Command::PidProportional),
            0x15 => Ok(Command::PidIntegral),
            0x16 => Ok(Command::PidDerivative),
            0x17 => Ok(Command::PidInterval),
            0x18 => Ok(Command::PidReverse),
            0x19 => Ok(Command::NightModeEnabled),
            0x1A => Ok(Command::NightModeStart),
            0x1B => Ok(Command::NightModeEnd),
            0x20 => Ok(Command::MdnsName),
            0x21 => Ok(Command::WifiMode),
            0x22 => Ok(Command::WifiSsid),
            0x23 => Ok(Command::WifiPassword),
            0x24 => Ok(Command::WifiCheckInterval),
            0x25 => Ok(Command::WifiMaxRetryInterval),
            0x26 => Ok(Command::TimeZone),
            0x27 => Ok(Command::MqttEnabled),
            0x28 => Ok(Command::MqttHost),
            0x29 => Ok(Command::MqttPort),
            0x2A => Ok(Command::MqttUser),
            0x2B => Ok(Command::MqttPassword),
            0x40 => Ok(Command::AnalogPin),
            0x41 => Ok(Command::AnalogResolution),
            0x42 => Ok(Command::DigitalTempPin),
            0x43 => Ok(Command::DigitalTempResolution),
            0x44 => Ok(Command::DigitalTempParasite),
            0x50 => Ok(Command::PwmPin),
            0x51 => Ok(Command::PwmPeriod),
            0x60 => Ok(Command::SensorValue),
            0x61 => Ok(Command::ControlValue),
            0x62 => Ok(Command::HistoryData),
            _ => Err(()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
