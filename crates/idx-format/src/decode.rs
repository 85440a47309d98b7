//! IDX decoder: raw bytes to [`ImageCollection`].

use idx_buffers::Reader;

use crate::collection::{ImageCollection, Shape};
use crate::error::DecodeError;
use crate::header::Header;

/// Decodes an IDX buffer into an image collection.
///
/// The magic and type bytes are not checked. The dimension sizes are read as
/// big-endian `u32`s and the first three are interpreted as
/// `[count, rows, cols]`; shorter shapes are padded with trailing 1s and a
/// rank-0 header yields an empty collection. Exactly `count * rows * cols`
/// pixel bytes are copied in source order; anything after them is ignored.
/// The product of every size, including those past the third, must fit in
/// `usize`.
///
/// ```
/// let data = [0, 0, 8, 3, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 2, 10, 20, 30, 40, 50, 60, 70, 80];
/// let images = idx_format::decode(&data).unwrap();
/// assert_eq!(images.len(), 2);
/// assert_eq!(images.image(1).unwrap().to_rows(), vec![vec![50, 60], vec![70, 80]]);
/// ```
pub fn decode(buffer: &[u8]) -> Result<ImageCollection, DecodeError> {
    let header = Header::parse(buffer)?;
    decode_body(&header, buffer)
}

/// Like [`decode`], but also requires the `00 00 08` magic and type bytes.
pub fn decode_strict(buffer: &[u8]) -> Result<ImageCollection, DecodeError> {
    let header = Header::parse(buffer)?;
    header.validate_strict()?;
    decode_body(&header, buffer)
}

/// Splits the header dimensions into an image count, a per-image shape and
/// the number of pixel bytes they cover. Sizes past the third are not part of
/// the layout.
fn image_layout(header: &Header) -> Result<Option<(usize, Shape, usize)>, DecodeError> {
    if header.dimensions.is_empty() {
        return Ok(None);
    }
    let overflow = || DecodeError::SizeOverflow(header.dimensions.clone());
    let mut sizes = [1usize; 3];
    for (slot, &dim) in sizes.iter_mut().zip(&header.dimensions) {
        *slot = usize::try_from(dim).map_err(|_| overflow())?;
    }
    let [count, rows, cols] = sizes;
    let total = count
        .checked_mul(rows)
        .and_then(|n| n.checked_mul(cols))
        .ok_or_else(overflow)?;
    Ok(Some((count, Shape::new(rows, cols), total)))
}

fn decode_body(header: &Header, buffer: &[u8]) -> Result<ImageCollection, DecodeError> {
    header.element_count()?;
    let Some((count, shape, expected)) = image_layout(header)? else {
        return Ok(ImageCollection::empty());
    };
    let offset = header.byte_len();
    let mut reader = Reader::new(buffer);
    reader.skip(offset);
    let pixels = reader
        .try_buf(expected)
        .map_err(|_| DecodeError::TruncatedBody {
            offset,
            expected,
            found: buffer.len().saturating_sub(offset),
        })?;
    ImageCollection::from_pixels(count, shape, pixels.to_vec())
}
