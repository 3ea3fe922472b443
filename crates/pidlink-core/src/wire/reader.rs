//! Cursor-based reader over an immutable byte buffer.

use super::WireError;

/// Sequential reader over a byte slice.
///
/// Each `read_*` method consumes exactly the wire width of its type and
/// advances the cursor. A read that would run past the end of the buffer
/// returns [`WireError::Truncated`] and leaves the cursor unchanged, so a
/// failed decode can be reported with an accurate position.
///
/// [`read_bytes`](WireReader::read_bytes) returns a borrowed view into the
/// underlying buffer; a nested decoder can construct its own `WireReader`
/// over that view, with an independent cursor starting at offset 0. This is
/// how the fixed-size variant blocks are decoded.
///
/// # Examples
///
/// ```rust
/// use pidlink_core::wire::WireReader;
///
/// let mut reader = WireReader::new(&[0x01, 0x34, 0x12]);
/// assert!(reader.read_bool().unwrap());
/// assert_eq!(reader.read_u16().unwrap(), 0x1234);
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current cursor position in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Takes the next `n` bytes, advancing the cursor.
    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self.pos.checked_add(n).ok_or(WireError::Truncated {
            needed: usize::MAX,
            available: self.buf.len(),
        })?;
        if end > self.buf.len() {
            return Err(WireError::Truncated {
                needed: end,
                available: self.buf.len(),
            });
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Reads one byte as a boolean flag (any nonzero value is `true`).
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.take(1)?[0] != 0)
    }

    /// Reads an unsigned 8-bit integer.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian unsigned 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a little-endian unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian IEEE-754 single-precision float.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a fixed `n`-byte text field.
    ///
    /// The field is decoded up to the first null terminator; trailing
    /// padding is discarded. When no null is present all `n` bytes are
    /// text. Always consumes exactly `n` bytes.
    pub fn read_fixed_str(&mut self, n: usize) -> Result<String, WireError> {
        let offset = self.pos;
        let raw = self.take(n)?;
        let text = match raw.iter().position(|&b| b == 0) {
            Some(nul) => &raw[..nul],
            None => raw,
        };
        std::str::from_utf8(text)
            .map(str::to_owned)
            .map_err(|_| WireError::InvalidText { offset })
    }

    /// Reads exactly `n` bytes as a borrowed view, without copying.
    ///
    /// The returned slice is suitable for re-reading with a fresh
    /// `WireReader` whose own cursor starts at offset 0.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        self.take(n)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives_in_sequence() {
        let mut buf = Vec::new();
        buf.push(0x01); // bool
        buf.push(0x2A); // u8
        buf.extend_from_slice(&0xBEEFu16.to_le_bytes());
        buf.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        buf.extend_from_slice(&1.5f32.to_le_bytes());

        let mut reader = WireReader::new(&buf);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_u8().unwrap(), 0x2A);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_f32().unwrap(), 1.5);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_bool_treats_any_nonzero_as_true() {
        assert!(WireReader::new(&[0x01]).read_bool().unwrap());
        assert!(WireReader::new(&[0xFF]).read_bool().unwrap());
        assert!(!WireReader::new(&[0x00]).read_bool().unwrap());
    }

    #[test]
    fn test_multi_byte_reads_are_little_endian() {
        let mut reader = WireReader::new(&[0x34, 0x12]);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);

        let mut reader = WireReader::new(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
    }

    #[test]
    fn test_read_past_end_returns_truncated() {
        let mut reader = WireReader::new(&[0x00]);
        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            WireError::Truncated {
                needed: 4,
                available: 1
            }
        );
    }

    #[test]
    fn test_failed_read_does_not_advance_cursor() {
        let mut reader = WireReader::new(&[0xAB, 0xCD]);
        assert!(reader.read_u32().is_err());
        assert_eq!(reader.position(), 0);
        // A shorter read afterwards still succeeds from the same position.
        assert_eq!(reader.read_u16().unwrap(), 0xCDAB);
    }

    #[test]
    fn test_read_empty_buffer_returns_truncated() {
        let mut reader = WireReader::new(&[]);
        assert!(matches!(
            reader.read_bool(),
            Err(WireError::Truncated { .. })
        ));
    }

    #[test]
    fn test_fixed_str_stops_at_first_null() {
        let mut buf = b"esp_pid\0".to_vec();
        buf.extend_from_slice(&[0xAA; 8]); // garbage padding after the field

        let mut reader = WireReader::new(&buf);
        // Field is 8 bytes; the 0xAA tail belongs to the next field.
        assert_eq!(reader.read_fixed_str(8).unwrap(), "esp_pid");
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn test_fixed_str_without_null_uses_all_bytes() {
        let mut reader = WireReader::new(b"abcd");
        assert_eq!(reader.read_fixed_str(4).unwrap(), "abcd");
    }

    #[test]
    fn test_fixed_str_ignores_bytes_after_null() {
        // Stale bytes after the terminator must not leak into the string.
        let mut reader = WireReader::new(b"ok\0garbage");
        assert_eq!(reader.read_fixed_str(10).unwrap(), "ok");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_fixed_str_rejects_invalid_utf8() {
        let mut reader = WireReader::new(&[0xFF, 0xFE, 0x00, 0x00]);
        assert_eq!(
            reader.read_fixed_str(4).unwrap_err(),
            WireError::InvalidText { offset: 0 }
        );
    }

    #[test]
    fn test_read_bytes_returns_borrowed_view_for_nested_reader() {
        let buf = [0x07u8, 0x34, 0x12, 0x99];
        let mut outer = WireReader::new(&buf);
        outer.read_u8().unwrap();

        let block = outer.read_bytes(2).unwrap();
        let mut inner = WireReader::new(block);
        assert_eq!(inner.position(), 0);
        assert_eq!(inner.read_u16().unwrap(), 0x1234);

        // The outer cursor advanced past the whole block.
        assert_eq!(outer.read_u8().unwrap(), 0x99);
    }

    #[test]
    fn test_read_bytes_too_long_returns_truncated() {
        let mut reader = WireReader::new(&[0u8; 16]);
        assert!(matches!(
            reader.read_bytes(17),
            Err(WireError::Truncated {
                needed: 17,
                available: 16
            })
        ));
    }
}
