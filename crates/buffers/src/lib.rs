//! Binary buffer utilities for IDX tensors.
//!
//! This crate provides the big-endian reading and writing primitives the IDX
//! codec is built on.
//!
//! # Overview
//!
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`read_u32_be`] - Reads one big-endian `u32` at an absolute offset
//!
//! # Example
//!
//! ```
//! use idx_buffers::{Reader, Writer};
//!
//! // Write a header
//! let mut writer = Writer::new();
//! writer.u8(0x08);
//! writer.u32(28);
//! let data = writer.flush();
//!
//! // Read it back
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), 0x08);
//! assert_eq!(reader.try_u32(), Ok(28));
//! assert!(reader.try_u8().is_err());
//! ```

mod print_octets;
mod reader;
mod writer;

pub use print_octets::{print_octets, print_octets_at};
pub use reader::{read_u32_be, Reader};
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes the read needed.
        wanted: usize,
    },
    /// Offset arithmetic overflowed `usize`.
    Overflow,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { offset, wanted } => {
                write!(f, "end of buffer: needed {wanted} bytes at offset {offset}")
            }
            BufferError::Overflow => write!(f, "buffer offset overflow"),
        }
    }
}

impl std::error::Error for BufferError {}
