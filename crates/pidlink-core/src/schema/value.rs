//! Wire primitive types and the runtime values that travel through them.

use thiserror::Error;

use crate::wire::{WireError, WireReader, WireWriter};

/// Wire encoding of a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Bool,
    U8,
    U16,
    U32,
    F32,
    /// Fixed `n`-byte text field, null-padded.
    FixedString(usize),
    /// Opaque block of exactly `n` bytes.
    Bytes(usize),
    /// Variable-length telemetry payload decoded by a dedicated codec
    /// (the history stream); not value-encodable.
    Blob,
}

impl WireType {
    /// Whether bounds make sense for this wire type.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            WireType::U8 | WireType::U16 | WireType::U32 | WireType::F32
        )
    }
}

impl std::fmt::Display for WireType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireType::Bool => write!(f, "bool"),
            WireType::U8 => write!(f, "u8"),
            WireType::U16 => write!(f, "u16"),
            WireType::U32 => write!(f, "u32"),
            WireType::F32 => write!(f, "f32"),
            WireType::FixedString(n) => write!(f, "string[{n}]"),
            WireType::Bytes(n) => write!(f, "bytes[{n}]"),
            WireType::Blob => write!(f, "blob"),
        }
    }
}

/// A decoded property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    Text(String),
    Bytes(Vec<u8>),
}

/// Errors from converting a [`Value`] to or from its wire form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// The value's shape does not match the property's wire type.
    #[error("value of type {actual} does not match wire type {expected}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A string is longer than its fixed field.
    #[error("string of {len} bytes exceeds fixed field of {max}")]
    TextTooLong { len: usize, max: usize },

    /// A byte value does not have the field's exact length.
    #[error("byte value of {actual} bytes does not fill field of {expected}")]
    ByteLengthMismatch { expected: usize, actual: usize },
}

impl Value {
    /// Short name of this value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::F32(_) => "f32",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
        }
    }

    /// Numeric reading of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::U8(v) => Some(f64::from(*v)),
            Value::U16(v) => Some(f64::from(*v)),
            Value::U32(v) => Some(f64::from(*v)),
            Value::F32(v) => Some(f64::from(*v)),
            Value::Bool(_) | Value::Text(_) | Value::Bytes(_) => None,
        }
    }

    /// Encodes the value for the wire as `wire_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::TypeMismatch`] when the value's shape does not
    /// match, and the length errors for strings/bytes that do not fit their
    /// field. No coercion between numeric widths is performed.
    pub fn encode(&self, wire_type: WireType) -> Result<Vec<u8>, ValueError> {
        let mut writer = WireWriter::new();
        match (wire_type, self) {
            (WireType::Bool, Value::Bool(v)) => writer.write_bool(*v),
            (WireType::U8, Value::U8(v)) => writer.write_u8(*v),
            (WireType::U16, Value::U16(v)) => writer.write_u16(*v),
            (WireType::U32, Value::U32(v)) => writer.write_u32(*v),
            (WireType::F32, Value::F32(v)) => writer.write_f32(*v),
            (WireType::FixedString(n), Value::Text(s)) => {
                if s.len() > n {
                    return Err(ValueError::TextTooLong {
                        len: s.len(),
                        max: n,
                    });
                }
                writer.write_fixed_str(s, n);
            }
            (WireType::Bytes(n), Value::Bytes(b)) => {
                if b.len() != n {
                    return Err(ValueError::ByteLengthMismatch {
                        expected: n,
                        actual: b.len(),
                    });
                }
                writer.write_bytes(b);
            }
            (expected, actual) => {
                return Err(ValueError::TypeMismatch {
                    expected: wire_type_kind(expected),
                    actual: actual.kind(),
                })
            }
        }
        Ok(writer.into_bytes())
    }

    /// Decodes a value of `wire_type` from a payload.
    pub fn decode(wire_type: WireType, bytes: &[u8]) -> Result<Value, WireError> {
        let mut reader = WireReader::new(bytes);
        Ok(match wire_type {
            WireType::Bool => Value::Bool(reader.read_bool()?),
            WireType::U8 => Value::U8(reader.read_u8()?),
            WireType::U16 => Value::U16(reader.read_u16()?),
            WireType::U32 => Value::U32(reader.read_u32()?),
            WireType::F32 => Value::F32(reader.read_f32()?),
            WireType::FixedString(n) => Value::Text(reader.read_fixed_str(n)?),
            WireType::Bytes(n) => Value::Bytes(reader.read_bytes(n)?.to_vec()),
            WireType::Blob => Value::Bytes(bytes.to_vec()),
        })
    }
}

fn wire_type_kind(wire_type: WireType) -> &'static str {
    match wire_type {
        WireType::Bool => "bool",
        WireType::U8 => "u8",
        WireType::U16 => "u16",
        WireType::U32 => "u32",
        WireType::F32 => "f32",
        WireType::FixedString(_) => "text",
        WireType::Bytes(_) => "bytes",
        WireType::Blob => "blob",
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
