//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// Reads a big-endian `u32` from the 4 bytes starting at `offset`.
///
/// # Example
///
/// ```
/// use idx_buffers::read_u32_be;
///
/// let data = [0x00, 0x00, 0x08, 0x03, 0x00, 0x00, 0x27, 0x10];
/// assert_eq!(read_u32_be(&data, 4), Ok(10_000));
/// assert!(read_u32_be(&data, 6).is_err());
/// ```
pub fn read_u32_be(bytes: &[u8], offset: usize) -> Result<u32, BufferError> {
    let end = offset.checked_add(4).ok_or(BufferError::Overflow)?;
    match bytes.get(offset..end) {
        Some(&[b0, b1, b2, b3]) => Ok(u32::from_be_bytes([b0, b1, b2, b3])),
        _ => Err(BufferError::EndOfBuffer { offset, wanted: 4 }),
    }
}

/// A binary buffer reader that reads data from a byte slice.
///
/// The plain accessors (`u8`, `u32`, ...) index directly and panic when the
/// buffer is exhausted. The `try_*` accessors check bounds first and leave
/// the cursor untouched on failure.
///
/// # Example
///
/// ```
/// use idx_buffers::Reader;
///
/// let data = [0x03, 0x00, 0x00, 0x00, 0x1c];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), 0x03);
/// assert_eq!(reader.u32(), 28);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end.saturating_sub(self.x)
    }

    /// Returns the current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) {
        self.x += length;
    }

    fn ensure(&self, wanted: usize) -> Result<(), BufferError> {
        if self.size() < wanted {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                wanted,
            });
        }
        Ok(())
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> u8 {
        let val = self.uint8[self.x];
        self.x += 1;
        val
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> u32 {
        let val = u32::from_be_bytes([
            self.uint8[self.x],
            self.uint8[self.x + 1],
            self.uint8[self.x + 2],
            self.uint8[self.x + 3],
        ]);
        self.x += 4;
        val
    }

    /// Reads an unsigned 8-bit integer, failing at the end of the buffer.
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.ensure(1)?;
        Ok(self.u8())
    }

    /// Reads a big-endian unsigned 32-bit integer, failing at the end of the buffer.
    pub fn try_u32(&mut self) -> Result<u32, BufferError> {
        self.ensure(4)?;
        Ok(self.u32())
    }

    /// Returns a subarray of the given size and advances the cursor,
    /// failing if fewer than `size` bytes remain.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.ensure(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }
}
