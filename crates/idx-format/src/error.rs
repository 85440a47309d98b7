//! IDX codec error types.

use thiserror::Error;

use crate::header::DataType;

/// Failure to turn a raw buffer into an [`ImageCollection`](crate::ImageCollection).
///
/// Decoding is all-or-nothing: no partial collection is ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer of {len} bytes is too short for an IDX header")]
    TooShort { len: usize },
    #[error("truncated header: size of dimension {dimension} at offset {offset} is past the end of a {len} byte buffer")]
    TruncatedHeader {
        dimension: usize,
        offset: usize,
        len: usize,
    },
    #[error("truncated body: expected {expected} bytes after offset {offset}, found {found}")]
    TruncatedBody {
        offset: usize,
        expected: usize,
        found: usize,
    },
    #[error("dimension sizes {0:?} overflow the addressable size")]
    SizeOverflow(Vec<u32>),
    #[error("bad magic bytes {0:02x} {1:02x}, expected 00 00")]
    BadMagic(u8, u8),
    #[error("unsupported data type {0}")]
    UnsupportedDataType(DataType),
    #[error("border of {border} leaves nothing of a {rows}x{cols} image")]
    CropTooLarge {
        border: usize,
        rows: usize,
        cols: usize,
    },
    #[error("pixel buffer holds {found} bytes, shape needs {expected}")]
    ShapeMismatch { expected: usize, found: usize },
}

/// Failure to write a collection back to IDX bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("dimension size {0} does not fit in 32 bits")]
    DimensionTooLarge(usize),
}

/// An image index that does not exist in the collection.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("image index {index} out of range for a collection of {len} images")]
pub struct LookupError {
    pub index: usize,
    pub len: usize,
}
