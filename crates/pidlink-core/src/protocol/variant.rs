//! Discriminant-dispatched decoding of the fixed-size variant blocks.
//!
//! The configuration record reserves a constant 1024-byte block for the
//! sensor settings and another for the control settings, regardless of
//! which hardware variant is active. A discriminant byte read just before
//! the block selects the payload layout; the payload is always smaller than
//! the block and the remainder is reserved padding.
//!
//! Decoding dispatches through a registry of `(discriminant, decoder)`
//! pairs. An unregistered discriminant is **not** an error: a newer
//! firmware revision may introduce sensor or control types this console
//! does not know yet, and the rest of the configuration must still load.
//! Absence is modeled as `None`.

use tracing::debug;

use crate::wire::{WireError, WireReader, WireWriter};

/// Decoder entry: a payload parser registered for one discriminant value.
pub type VariantDecoder<V> = (u8, fn(&mut WireReader<'_>) -> Result<V, WireError>);

/// Dispatches `tag` against `registry` over a raw variant block.
///
/// A fresh reader is constructed over `block` — its cursor starts at
/// offset 0, independent of the enclosing record's cursor — and the decoder
/// registered for `tag` is applied. Unregistered tags yield `Ok(None)`.
pub fn decode_tagged<V>(
    family: &'static str,
    registry: &[VariantDecoder<V>],
    tag: u8,
    block: &[u8],
) -> Result<Option<V>, WireError> {
    match registry.iter().find(|(t, _)| *t == tag) {
        Some((_, decode)) => decode(&mut WireReader::new(block)).map(Some),
        None => {
            debug!("unknown {family} variant discriminant {tag}; leaving variant empty");
            Ok(None)
        }
    }
}

// ── Sensor variants ───────────────────────────────────────────────────────────

/// Sensor hardware configuration, selected by the sensor type discriminant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorVariant {
    /// Analog input sampled through the ADC (type 0).
    Analog { pin: u8, resolution: u8 },
    /// One-wire digital temperature probe (type 1).
    DigitalTemp {
        pin: u8,
        resolution: u8,
        parasite_power: bool,
    },
}

impl SensorVariant {
    pub const ANALOG: u8 = 0;
    pub const DIGITAL_TEMP: u8 = 1;

    /// Registered payload decoders, one per known sensor type.
    pub const REGISTRY: &'static [VariantDecoder<SensorVariant>] = &[
        (Self::ANALOG, |r| {
            Ok(SensorVariant::Analog {
                pin: r.read_u8()?,
                resolution: r.read_u8()?,
            })
        }),
        (Self::DIGITAL_TEMP, |r| {
            Ok(SensorVariant::DigitalTemp {
                pin: r.read_u8()?,
                resolution: r.read_u8()?,
                parasite_power: r.read_bool()?,
            })
        }),
    ];

    /// Discriminant value this variant encodes under.
    pub fn discriminant(&self) -> u8 {
        match self {
            SensorVariant::Analog { .. } => Self::ANALOG,
            SensorVariant::DigitalTemp { .. } => Self::DIGITAL_TEMP,
        }
    }

    /// Writes the variant payload (without the surrounding block padding).
    pub fn encode(&self, writer: &mut WireWriter) {
        match *self {
            SensorVariant::Analog { pin, resolution } => {
                writer.write_u8(pin);
                writer.write_u8(resolution);
            }
            SensorVariant::DigitalTemp {
                pin,
                resolution,
                parasite_power,
            } => {
                writer.write_u8(pin);
                writer.write_u8(resolution);
                writer.write_bool(parasite_power);
            }
        }
    }
}

// ── Control variants ──────────────────────────────────────────────────────────

/// Control output configuration, selected by the control type discriminant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlVariant {
    /// Slow software PWM output (type 0).
    Pwm { pin: u8, period_us: u16 },
}

impl ControlVariant {
    pub const PWM: u8 = 0;

    /// Registered payload decoders, one per known control type.
    pub const REGISTRY: &'static [VariantDecoder<ControlVariant>] = &[(Self::PWM, |r| {
        Ok(ControlVariant::Pwm {
            pin: r.read_u8()?,
            period_us: r.read_u16()?,
        })
    })];

    /// Discriminant value this variant encodes under.
    pub fn discriminant(&self) -> u8 {
        match self {
            ControlVariant::Pwm { .. } => Self::PWM,
        }
    }

    /// Writes the variant payload (without the surrounding block padding).
    pub fn encode(&self, writer: &mut WireWriter) {
        match *self {
            ControlVariant::Pwm { pin, period_us } => {
                writer.write_u8(pin);
                writer.write_u16(period_us);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
