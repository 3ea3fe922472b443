//! Fixed-width writer mirroring [`WireReader`](super::WireReader).

/// Appends typed fields to a growable byte buffer in wire order.
///
/// Every write emits exactly the fixed width of its type, little-endian,
/// so that `WireWriter` output decodes with [`WireReader`](super::WireReader)
/// field for field. Strings are padded or truncated to their declared field
/// length — a variable-length field is never emitted.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with `capacity` bytes preallocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a boolean flag as one byte (0x01 / 0x00).
    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(if value { 0x01 } else { 0x00 });
    }

    /// Writes an unsigned 8-bit integer.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Writes a little-endian unsigned 16-bit integer.
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian unsigned 32-bit integer.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a little-endian IEEE-754 single-precision float.
    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes `s` into a fixed `n`-byte text field.
    ///
    /// Shorter strings are null-padded to `n` bytes; longer strings are
    /// truncated (on a character boundary) so the field is always exactly
    /// `n` bytes.
    pub fn write_fixed_str(&mut self, s: &str, n: usize) {
        let mut end = s.len().min(n);
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.buf.extend_from_slice(&s.as_bytes()[..end]);
        self.buf.resize(self.buf.len() + (n - end), 0);
    }

    /// Writes a raw byte block verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Consumes the writer, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrows the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
