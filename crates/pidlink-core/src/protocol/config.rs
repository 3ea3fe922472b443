//! Codec for the device's full configuration record.
//!
//! The record is a fixed-layout snapshot of everything persisted on the
//! device: power flag, sensor and control slots (each a discriminant plus a
//! reserved 1024-byte variant block), PID parameters, the night-mode
//! window, and system/network settings. Field order and widths are fixed;
//! there is no framing inside the record.
//!
//! Decoding is a pure structural transform — this module knows nothing
//! about the property schema. Unknown sensor/control types never fail a
//! decode (see [`variant`](super::variant)); a buffer that ends early does,
//! with [`WireError::Truncated`].

use crate::wire::{WireError, WireReader, WireWriter, CONFIG_STRING_LEN};

use super::variant::{decode_tagged, ControlVariant, SensorVariant};

/// Size of each reserved sensor/control variant block on the wire.
pub const VARIANT_BLOCK_LEN: usize = 1024;

/// Exact wire size of a full [`ConfigurationRecord`].
pub const CONFIG_WIRE_LEN: usize = 1                    // power
    + 2 * (1 + VARIANT_BLOCK_LEN)                       // sensor + control slots
    + 4 * 4 + 2 + 1                                     // pid
    + 1 + 4 + 4                                         // night mode
    + 4 * CONFIG_STRING_LEN + 1 + 4 + 4 + 4 + 1 + 2     // system (strings: mdns, ssid,
    + 2 * CONFIG_STRING_LEN;                            //   wifi pass + mqtt host/user/pass)

/// The device's persisted configuration, decoded from a `GetConfig` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationRecord {
    pub power: bool,
    pub sensor: SensorSlot,
    pub control: ControlSlot,
    pub pid: PidSettings,
    pub night_mode: NightMode,
    pub system: SystemSettings,
}

/// Sensor slot: discriminant, reserved raw block, and the parsed variant.
///
/// `raw` always holds the full 1024 wire bytes. Only the leading bytes
/// consumed by the active variant are meaningful; the rest is reserved
/// padding that must be carried through encode unchanged.
#[derive(Clone, PartialEq)]
pub struct SensorSlot {
    pub kind: u8,
    pub raw: [u8; VARIANT_BLOCK_LEN],
    pub variant: Option<SensorVariant>,
}

/// Control slot: discriminant, reserved raw block, and the parsed variant.
#[derive(Clone, PartialEq)]
pub struct ControlSlot {
    pub kind: u8,
    pub raw: [u8; VARIANT_BLOCK_LEN],
    pub variant: Option<ControlVariant>,
}

/// PID regulator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidSettings {
    pub target: f32,
    pub p: f32,
    pub i: f32,
    pub d: f32,
    pub interval_ms: u16,
    pub reverse: bool,
}

/// Daily window during which the regulator is forced off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightMode {
    pub enabled: bool,
    /// Window start, seconds since midnight.
    pub start_time: u32,
    /// Window end, seconds since midnight.
    pub end_time: u32,
}

/// Network and system settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSettings {
    pub mdns_name: String,
    pub wifi_mode: u8,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub wifi_check_interval_ms: u32,
    pub wifi_max_retry_interval_ms: u32,
    pub time_zone_offset: f32,
    pub mqtt_enabled: bool,
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_user: String,
    pub mqtt_password: String,
}

impl ConfigurationRecord {
    /// Decodes a full configuration record, consuming fields strictly in
    /// wire order.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Truncated`] if the buffer ends before the
    /// record does. Unknown variant discriminants are not errors.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            power: reader.read_bool()?,
            sensor: SensorSlot::decode(reader)?,
            control: ControlSlot::decode(reader)?,
            pid: PidSettings::decode(reader)?,
            night_mode: NightMode::decode(reader)?,
            system: SystemSettings::decode(reader)?,
        })
    }

    /// Encodes the record as the exact inverse of [`decode`](Self::decode).
    ///
    /// Re-encoding a decoded record reproduces the input buffer byte for
    /// byte: variant payloads are overlaid onto the retained raw blocks, so
    /// reserved padding survives the round trip while field edits still
    /// reach the wire.
    pub fn encode(&self, writer: &mut WireWriter) {
        writer.write_bool(self.power);
        self.sensor.encode(writer);
        self.control.encode(writer);
        self.pid.encode(writer);
        self.night_mode.encode(writer);
        self.system.encode(writer);
    }

    /// Encodes into a fresh buffer of exactly [`CONFIG_WIRE_LEN`] bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::with_capacity(CONFIG_WIRE_LEN);
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

impl SensorSlot {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        let kind = reader.read_u8()?;
        let mut raw = [0u8; VARIANT_BLOCK_LEN];
        raw.copy_from_slice(reader.read_bytes(VARIANT_BLOCK_LEN)?);
        let variant = decode_tagged("sensor", SensorVariant::REGISTRY, kind, &raw)?;
        Ok(Self { kind, raw, variant })
    }

    fn encode(&self, writer: &mut WireWriter) {
        writer.write_u8(self.kind);
        writer.write_bytes(&overlay(&self.raw, |w| {
            if let Some(variant) = &self.variant {
                variant.encode(w);
            }
        }));
    }

    /// Builds a slot whose raw block holds just the given variant payload.
    pub fn from_variant(variant: SensorVariant) -> Self {
        let mut writer = WireWriter::new();
        variant.encode(&mut writer);
        let mut raw = [0u8; VARIANT_BLOCK_LEN];
        raw[..writer.len()].copy_from_slice(writer.as_slice());
        Self {
            kind: variant.discriminant(),
            raw,
            variant: Some(variant),
        }
    }
}

impl ControlSlot {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        let kind = reader.read_u8()?;
        let mut raw = [0u8; VARIANT_BLOCK_LEN];
        raw.copy_from_slice(reader.read_bytes(VARIANT_BLOCK_LEN)?);
        let variant = decode_tagged("control", ControlVariant::REGISTRY, kind, &raw)?;
        Ok(Self { kind, raw, variant })
    }

    fn encode(&self, writer: &mut WireWriter) {
        writer.write_u8(self.kind);
        writer.write_bytes(&overlay(&self.raw, |w| {
            if let Some(variant) = &self.variant {
                variant.encode(w);
            }
        }));
    }

    /// Builds a slot whose raw block holds just the given variant payload.
    pub fn from_variant(variant: ControlVariant) -> Self {
        let mut writer = WireWriter::new();
        variant.encode(&mut writer);
        let mut raw = [0u8; VARIANT_BLOCK_LEN];
        raw[..writer.len()].copy_from_slice(writer.as_slice());
        Self {
            kind: variant.discriminant(),
            raw,
            variant: Some(variant),
        }
    }
}

/// Copies `raw` and overlays whatever `payload` writes onto its start.
fn overlay(
    raw: &[u8; VARIANT_BLOCK_LEN],
    payload: impl FnOnce(&mut WireWriter),
) -> [u8; VARIANT_BLOCK_LEN] {
    let mut writer = WireWriter::new();
    payload(&mut writer);
    debug_assert!(writer.len() <= VARIANT_BLOCK_LEN);

    let mut block = *raw;
    block[..writer.len()].copy_from_slice(writer.as_slice());
    block
}

impl PidSettings {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            target: reader.read_f32()?,
            p: reader.read_f32()?,
            i: reader.read_f32()?,
            d: reader.read_f32()?,
            interval_ms: reader.read_u16()?,
            reverse: reader.read_bool()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) {
        writer.write_f32(self.target);
        writer.write_f32(self.p);
        writer.write_f32(self.i);
        writer.write_f32(self.d);
        writer.write_u16(self.interval_ms);
        writer.write_bool(self.reverse);
    }
}

impl NightMode {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            enabled: reader.read_bool()?,
            start_time: reader.read_u32()?,
            end_time: reader.read_u32()?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) {
        writer.write_bool(self.enabled);
        writer.write_u32(self.start_time);
        writer.write_u32(self.end_time);
    }
}

impl SystemSettings {
    fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            mdns_name: reader.read_fixed_str(CONFIG_STRING_LEN)?,
            wifi_mode: reader.read_u8()?,
            wifi_ssid: reader.read_fixed_str(CONFIG_STRING_LEN)?,
            wifi_password: reader.read_fixed_str(CONFIG_STRING_LEN)?,
            wifi_check_interval_ms: reader.read_u32()?,
            wifi_max_retry_interval_ms: reader.read_u32()?,
            time_zone_offset: reader.read_f32()?,
            mqtt_enabled: reader.read_bool()?,
            mqtt_host: reader.read_fixed_str(CONFIG_STRING_LEN)?,
            mqtt_port: reader.read_u16()?,
            mqtt_user: reader.read_fixed_str(CONFIG_STRING_LEN)?,
            mqtt_password: reader.read_fixed_str(CONFIG_STRING_LEN)?,
        })
    }

    fn encode(&self, writer: &mut WireWriter) {
        writer.write_fixed_str(&self.mdns_name, CONFIG_STRING_LEN);
        writer.write_u8(self.wifi_mode);
        writer.write_fixed_str(&self.wifi_ssid, CONFIG_STRING_LEN);
        writer.write_fixed_str(&self.wifi_password, CONFIG_STRING_LEN);
        writer.write_u32(self.wifi_check_interval_ms);
        writer.write_u32(self.wifi_max_retry_interval_ms);
        writer.write_f32(self.time_zone_offset);
        writer.write_bool(self.mqtt_enabled);
        writer.write_fixed_str(&self.mqtt_host, CONFIG_STRING_LEN);
        writer.write_u16(self.mqtt_port);
        writer.write_fixed_str(&self.mqtt_user, CONFIG_STRING_LEN);
        writer.write_fixed_str(&self.mqtt_password, CONFIG_STRING_LEN);
    }
}

// The raw blocks are 1 KiB each; the derived Debug would print every byte.
impl std::fmt::Debug for SensorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorSlot")
            .field("kind", &self.kind)
            .field("raw", &format_args!("[u8; {VARIANT_BLOCK_LEN}]"))
            .field("variant", &self.variant)
            .finish()
    }
}

impl std::fmt::Debug for ControlSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSlot")
            .field("kind", &self.kind)
            .field("raw", &format_args!("[u8; {VARIANT_BLOCK_LEN}]"))
            .field("variant", &self.variant)
            .finish()
    }
}

// ── Factory defaults ──────────────────────────────────────────────────────────

impl Default for ConfigurationRecord {
    /// Mirrors the device firmware's factory defaults.
    fn default() -> Self {
        Self {
            power: true,
            sensor: SensorSlot::from_variant(SensorVariant::DigitalTemp {
                pin: 2,
                resolution: 10,
                parasite_power: false,
            }),
            control: ControlSlot::from_variant(ControlVariant::Pwm {
                pin: 0,
                period_us: 500,
            }),
            pid: PidSettings {
                target: 30.0,
                p: 1.0,
                i: 0.05,
                d: 0.0,
                interval_ms: 1000,
                reverse: false,
            },
            night_mode: NightMode {
                enabled: false,
                start_time: 0,
                end_time: 10 * 60 * 60,
            },
            system: SystemSettings {
                mdns_name: "esp_pid".to_string(),
                wifi_mode: 0, // AP
                wifi_ssid: String::new(),
                wifi_password: String::new(),
                wifi_check_interval_ms: 5000,
                wifi_max_retry_interval_ms: 120_000,
                time_zone_offset: 5.0,
                mqtt_enabled: false,
                mqtt_host: String::new(),
                mqtt_port: 1883,
                mqtt_user: String::new(),
                mqtt_password: String::new(),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_len_matches_encoded_default() {
        let bytes = ConfigurationRecord::default().to_bytes();
        assert_eq!(bytes.len(), CONFIG_WIRE_LEN);
        assert_eq!(CONFIG_WIRE_LEN, 2287);
    }

    #[test]
    fn test_default_record_round_trips() {
        let record = ConfigurationRecord::default();
        let bytes = record.to_bytes();
        let decoded = ConfigurationRecord::decode(&mut WireReader::new(&bytes)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_reencode_of_decoded_buffer_is_byte_identical() {
        let mut record = ConfigurationRecord::default();
        record.system.wifi_ssid = "workshop".to_string();
        record.pid.target = 42.5;
        let original = record.to_bytes();

        let decoded = ConfigurationRecord::decode(&mut WireReader::new(&original)).unwrap();
        assert_eq!(decoded.to_bytes(), original);
    }

    #[test]
    fn test_unknown_sensor_type_leaves_variant_empty_and_decodes_rest() {
        let mut bytes = ConfigurationRecord::default().to_bytes();
        bytes[1] = 99; // sensor discriminant

        let decoded = ConfigurationRecord::decode(&mut WireReader::new(&bytes)).unwrap();
        assert_eq!(decoded.sensor.kind, 99);
        assert_eq!(decoded.sensor.variant, None);
        // Everything after the sensor slot still decodes normally.
        assert_eq!(decoded.pid.interval_ms, 1000);
        assert_eq!(decoded.system.mdns_name, "esp_pid");
    }

    #[test]
    fn test_unknown_sensor_type_round_trips_raw_block() {
        // The reserved block must survive encode even when no variant parsed.
        let mut bytes = ConfigurationRecord::default().to_bytes();
        bytes[1] = 99;
        bytes[2] = 0xAB; // first payload byte of the unknown variant

        let decoded = ConfigurationRecord::decode(&mut WireReader::new(&bytes)).unwrap();
        assert_eq!(decoded.to_bytes(), bytes);
    }

    #[test]
    fn test_truncated_buffer_fails_with_truncated() {
        let bytes = ConfigurationRecord::default().to_bytes();
        let result = ConfigurationRecord::decode(&mut WireReader::new(&bytes[..100]));
        assert!(matches!(result, Err(WireError::Truncated { .. })));
    }

    #[test]
    fn test_decode_reads_exactly_the_record_length() {
        let mut bytes = ConfigurationRecord::default().to_bytes();
        bytes.extend_from_slice(&[0xFF; 8]); // trailing bytes of a next record

        let mut reader = WireReader::new(&bytes);
        ConfigurationRecord::decode(&mut reader).unwrap();
        assert_eq!(reader.position(), CONFIG_WIRE_LEN);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn test_variant_edit_reaches_the_wire() {
        let mut record = ConfigurationRecord::default();
        record.sensor.variant = Some(SensorVariant::DigitalTemp {
            pin: 14,
            resolution: 12,
            parasite_power: true,
        });

        let decoded =
            ConfigurationRecord::decode(&mut WireReader::new(&record.to_bytes())).unwrap();
        assert_eq!(
            decoded.sensor.variant,
            Some(SensorVariant::DigitalTemp {
                pin: 14,
                resolution: 12,
                parasite_power: true,
            })
        );
    }

    #[test]
    fn test_default_matches_firmware_factory_settings() {
        let record = ConfigurationRecord::default();
        assert!(record.power);
        assert_eq!(record.sensor.kind, SensorVariant::DIGITAL_TEMP);
        assert_eq!(record.control.kind, ControlVariant::PWM);
        assert_eq!(record.night_mode.end_time, 36_000);
        assert_eq!(record.system.wifi_check_interval_ms, 5000);
    }
}
