//! Sequential byte-level reader and writer for the device wire format.
//!
//! The regulator speaks a fixed-layout binary format: every field has a
//! known width and a known offset, there are no length prefixes inside a
//! record, and all multi-byte values are **little-endian** (the device is a
//! little-endian MCU — this is a compatibility constant, not a choice).
//!
//! [`WireReader`] wraps an immutable byte slice plus a cursor; every typed
//! read advances the cursor by the type's width and fails with
//! [`WireError::Truncated`] instead of ever indexing past the end.
//! [`WireWriter`] mirrors each read with a fixed-width write.

mod reader;
mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;

use thiserror::Error;

/// Length of every fixed string field on the wire (null-padded).
pub const CONFIG_STRING_LEN: usize = 32;

/// Errors produced by the byte-level reader and writer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// A read would pass the end of the buffer.
    #[error("buffer truncated: need {needed} bytes, got {available}")]
    Truncated { needed: usize, available: usize },

    /// A fixed string field does not decode as UTF-8.
    #[error("fixed string field is not valid UTF-8 at offset {offset}")]
    InvalidText { offset: usize },
}
