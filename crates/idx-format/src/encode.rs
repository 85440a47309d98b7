//! IDX encoder: writes a collection as a rank-3 unsigned-byte tensor.

use idx_buffers::Writer;

use crate::collection::ImageCollection;
use crate::error::EncodeError;
use crate::header::DataType;

fn size(n: usize) -> Result<u32, EncodeError> {
    u32::try_from(n).map_err(|_| EncodeError::DimensionTooLarge(n))
}

/// Encodes `images` as `00 00 08 03`, the three sizes, then the pixels.
///
/// A collection without a shape is written as a rank-0 header.
pub fn encode(images: &ImageCollection) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::with_capacity(16 + images.pixels().len());
    writer.buf(&[0, 0, DataType::U8.to_byte()]);
    let Some(shape) = images.shape() else {
        writer.u8(0);
        return Ok(writer.flush());
    };
    writer.u8(3);
    writer.u32(size(images.len())?);
    writer.u32(size(shape.rows)?);
    writer.u32(size(shape.cols)?);
    writer.buf(images.pixels());
    Ok(writer.flush())
}
