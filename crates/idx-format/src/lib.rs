//! IDX tensor codec for 8-bit image datasets.
//!
//! An IDX buffer starts with two reserved bytes, a type byte and a rank byte,
//! followed by one big-endian `u32` per dimension and the row-major data.
//! This crate turns such buffers into an immutable [`ImageCollection`] and
//! writes collections back out.
//!
//! # Example
//!
//! ```
//! use idx_format::{decode, encode, Shape};
//!
//! let bytes = [0, 0, 8, 3, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 2, 0, 64, 128, 255];
//! let images = decode(&bytes).unwrap();
//! assert_eq!(images.shape(), Some(Shape::new(2, 2)));
//! assert_eq!(images.image(0).unwrap().get(1, 1), 255);
//! assert_eq!(encode(&images).unwrap(), bytes);
//! ```

mod collection;
mod decode;
mod encode;
mod error;
mod header;

pub use collection::{Image, ImageCollection, Shape};
pub use decode::{decode, decode_strict};
pub use encode::encode;
pub use error::{DecodeError, EncodeError, LookupError};
pub use header::{DataType, Header};
