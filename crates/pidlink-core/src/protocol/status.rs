//! Codec for the live status record and the history ring buffer.
//!
//! History arrives in two wire shapes that share one reconstruction
//! algorithm:
//!
//! - inside the full-state reply (`GetState`): `capacity`, `write_index`,
//!   then `capacity` samples of two floats each (sensor, control);
//! - as a standalone telemetry push (`HistoryData`): `capacity`, two float
//!   axis hints (sensor min/max), `write_index`, then `capacity` samples of
//!   three floats each (sensor, control, integral).
//!
//! The axis hints are not part of the log itself — they are auxiliary
//! metadata for the consumer that scales a chart axis, surfaced on
//! [`HistoryPush`].
//!
//! Entries are stored in raw ring order. Chronological replay is a pure
//! function over a decoded log ([`HistoryLog::chronological`]), kept out of
//! the decoder so it can be tested independently of the wire format.

use crate::wire::{WireError, WireReader, WireWriter};

/// Live regulator readings, decoded from a `GetState` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    pub sensor_value: f32,
    pub control_value: f32,
    /// Present in the full-state reply; standalone telemetry pushes carry
    /// their scalars and history through separate commands instead.
    pub history: Option<HistoryLog>,
}

/// Bounded circular log of past regulation samples.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    /// Total slot count of the ring.
    pub capacity: u16,
    /// Index of the next slot to be overwritten — i.e. the oldest live
    /// sample.
    pub write_index: u16,
    /// Exactly `capacity` entries, in raw ring order.
    pub entries: Vec<HistorySample>,
}

/// One ring slot. A slot is unfilled until the device has written it; the
/// firmware marks unfilled slots with NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySample {
    pub sensor: f32,
    pub control: f32,
    /// Only the telemetry-push shape carries the integrator term.
    pub integral: Option<f32>,
}

/// Standalone telemetry-push envelope around a [`HistoryLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPush {
    /// Suggested lower bound for the sensor axis.
    pub sensor_min: f32,
    /// Suggested upper bound for the sensor axis.
    pub sensor_max: f32,
    pub log: HistoryLog,
}

impl StatusRecord {
    /// Decodes a full-state reply: the two live scalars followed by the
    /// history ring (two floats per sample).
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        let sensor_value = reader.read_f32()?;
        let control_value = reader.read_f32()?;

        let capacity = reader.read_u16()?;
        let write_index = reader.read_u16()?;
        let entries = decode_samples(reader, capacity, false)?;

        Ok(Self {
            sensor_value,
            control_value,
            history: Some(HistoryLog {
                capacity,
                write_index,
                entries,
            }),
        })
    }

    /// Encodes a full-state reply (used by tests and capture tooling).
    pub fn encode(&self, writer: &mut WireWriter) {
        writer.write_f32(self.sensor_value);
        writer.write_f32(self.control_value);
        if let Some(log) = &self.history {
            writer.write_u16(log.capacity);
            writer.write_u16(log.write_index);
            for entry in &log.entries {
                writer.write_f32(entry.sensor);
                writer.write_f32(entry.control);
            }
        }
    }
}

impl HistoryPush {
    /// Decodes a standalone history push: capacity, axis hints, index, then
    /// three floats per sample.
    pub fn decode(reader: &mut WireReader<'_>) -> Result<Self, WireError> {
        let capacity = reader.read_u16()?;
        let sensor_min = reader.read_f32()?;
        let sensor_max = reader.read_f32()?;
        let write_index = reader.read_u16()?;
        let entries = decode_samples(reader, capacity, true)?;

        Ok(Self {
            sensor_min,
            sensor_max,
            log: HistoryLog {
                capacity,
                write_index,
                entries,
            },
        })
    }

    /// Encodes a history push (used by tests and capture tooling).
    pub fn encode(&self, writer: &mut WireWriter) {
        writer.write_u16(self.log.capacity);
        writer.write_f32(self.sensor_min);
        writer.write_f32(self.sensor_max);
        writer.write_u16(self.log.write_index);
        for entry in &self.log.entries {
            writer.write_f32(entry.sensor);
            writer.write_f32(entry.control);
            writer.write_f32(entry.integral.unwrap_or(f32::NAN));
        }
    }
}

fn decode_samples(
    reader: &mut WireReader<'_>,
    capacity: u16,
    with_integral: bool,
) -> Result<Vec<HistorySample>, WireError> {
    let mut entries = Vec::with_capacity(capacity as usize);
    for _ in 0..capacity {
        entries.push(HistorySample {
            sensor: reader.read_f32()?,
            control: reader.read_f32()?,
            integral: if with_integral {
                Some(reader.read_f32()?)
            } else {
                None
            },
        });
    }
    Ok(entries)
}

impl HistorySample {
    /// A slot is unfilled while either reading is the NaN sentinel.
    pub fn is_filled(&self) -> bool {
        !self.sensor.is_nan() && !self.control.is_nan()
    }
}

impl HistoryLog {
    /// Returns the filled samples in chronological order.
    ///
    /// The oldest live sample sits at `write_index`; replay reads
    /// `capacity` entries from there, wrapping modulo `capacity`, and skips
    /// unfilled slots (they are absent, never zero).
    pub fn chronological(&self) -> Vec<HistorySample> {
        let capacity = self.entries.len();
        if capacity == 0 {
            return Vec::new();
        }

        (0..capacity)
            .map(|i| self.entries[(self.write_index as usize + i) % capacity])
            .filter(HistorySample::is_filled)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
