//! IDX header: two reserved bytes, a type byte, a rank byte and the sizes.

use std::fmt;

use idx_buffers::{read_u32_be, Reader};

use crate::error::DecodeError;

/// Element type named by the third header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    U8,
    I8,
    I16,
    I32,
    F32,
    F64,
    Unknown(u8),
}

impl DataType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x08 => DataType::U8,
            0x09 => DataType::I8,
            0x0B => DataType::I16,
            0x0C => DataType::I32,
            0x0D => DataType::F32,
            0x0E => DataType::F64,
            other => DataType::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            DataType::U8 => 0x08,
            DataType::I8 => 0x09,
            DataType::I16 => 0x0B,
            DataType::I32 => 0x0C,
            DataType::F32 => 0x0D,
            DataType::F64 => 0x0E,
            DataType::Unknown(other) => other,
        }
    }

    /// Width of one element in bytes, `None` for unknown types.
    pub fn element_size(self) -> Option<usize> {
        match self {
            DataType::U8 | DataType::I8 => Some(1),
            DataType::I16 => Some(2),
            DataType::I32 | DataType::F32 => Some(4),
            DataType::F64 => Some(8),
            DataType::Unknown(_) => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::U8 => write!(f, "u8 (0x08)"),
            DataType::I8 => write!(f, "i8 (0x09)"),
            DataType::I16 => write!(f, "i16 (0x0b)"),
            DataType::I32 => write!(f, "i32 (0x0c)"),
            DataType::F32 => write!(f, "f32 (0x0d)"),
            DataType::F64 => write!(f, "f64 (0x0e)"),
            DataType::Unknown(byte) => write!(f, "unknown (0x{byte:02x})"),
        }
    }
}

/// Parsed IDX header.
///
/// Parsing is permissive: the magic and type bytes are recorded but not
/// checked. [`Header::validate_strict`] applies the stricter checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 2],
    pub data_type: DataType,
    pub dimensions: Vec<u32>,
}

impl Header {
    /// Reads the header at the start of `buffer`.
    ///
    /// ```
    /// use idx_format::Header;
    ///
    /// let header = Header::parse(&[0, 0, 8, 1, 0, 0, 0, 5]).unwrap();
    /// assert_eq!(header.dimensions, vec![5]);
    /// assert_eq!(header.byte_len(), 8);
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = Reader::new(buffer);
        let (Ok(m0), Ok(m1), Ok(ty), Ok(rank)) = (
            reader.try_u8(),
            reader.try_u8(),
            reader.try_u8(),
            reader.try_u8(),
        ) else {
            return Err(DecodeError::TooShort { len: buffer.len() });
        };
        let mut dimensions = Vec::with_capacity(rank as usize);
        for dimension in 0..rank as usize {
            let offset = 4 + 4 * dimension;
            let size = read_u32_be(buffer, offset).map_err(|_| DecodeError::TruncatedHeader {
                dimension,
                offset,
                len: buffer.len(),
            })?;
            dimensions.push(size);
        }
        Ok(Self {
            magic: [m0, m1],
            data_type: DataType::from_byte(ty),
            dimensions,
        })
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Offset of the first data byte.
    pub fn byte_len(&self) -> usize {
        4 + 4 * self.rank()
    }

    /// Product of all dimension sizes; zero for a rank-0 header.
    pub fn element_count(&self) -> Result<usize, DecodeError> {
        if self.dimensions.is_empty() {
            return Ok(0);
        }
        self.dimensions
            .iter()
            .try_fold(1usize, |acc, &dim| {
                usize::try_from(dim).ok().and_then(|dim| acc.checked_mul(dim))
            })
            .ok_or_else(|| DecodeError::SizeOverflow(self.dimensions.clone()))
    }

    /// Bytes the body occupies for the declared type, `None` when the type
    /// byte is unknown.
    ///
    /// ```
    /// use idx_format::Header;
    ///
    /// let header = Header::parse(&[0, 0, 0x0b, 2, 0, 0, 0, 3, 0, 0, 0, 4]).unwrap();
    /// assert_eq!(header.body_len().unwrap(), Some(24));
    /// ```
    pub fn body_len(&self) -> Result<Option<usize>, DecodeError> {
        let count = self.element_count()?;
        let Some(size) = self.data_type.element_size() else {
            return Ok(None);
        };
        count
            .checked_mul(size)
            .map(Some)
            .ok_or_else(|| DecodeError::SizeOverflow(self.dimensions.clone()))
    }

    /// Rejects headers that do not start with `00 00 08`.
    pub fn validate_strict(&self) -> Result<(), DecodeError> {
        if self.magic != [0, 0] {
            return Err(DecodeError::BadMagic(self.magic[0], self.magic[1]));
        }
        if self.data_type != DataType::U8 {
            return Err(DecodeError::UnsupportedDataType(self.data_type));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_dimensions() {
        let data = [0, 0, 8, 3, 0, 0, 0x27, 0x10, 0, 0, 0, 28, 0, 0, 0, 28];
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.magic, [0, 0]);
        assert_eq!(header.data_type, DataType::U8);
        assert_eq!(header.dimensions, vec![10_000, 28, 28]);
        assert_eq!(header.byte_len(), 16);
        assert_eq!(header.element_count(), Ok(10_000 * 28 * 28));
    }

    #[test]
    fn rank_zero_reads_no_sizes() {
        let header = Header::parse(&[0, 0, 8, 0]).unwrap();
        assert!(header.dimensions.is_empty());
        assert_eq!(header.element_count(), Ok(0));
    }

    #[test]
    fn short_buffers_fail() {
        assert_eq!(Header::parse(&[0, 0, 8]), Err(DecodeError::TooShort { len: 3 }));
        assert_eq!(
            Header::parse(&[0, 0, 8, 2, 0, 0, 0, 1, 0, 0]),
            Err(DecodeError::TruncatedHeader {
                dimension: 1,
                offset: 8,
                len: 10
            })
        );
    }

    #[test]
    fn permissive_about_magic() {
        let header = Header::parse(&[0xde, 0xad, 0x0d, 0]).unwrap();
        assert_eq!(header.magic, [0xde, 0xad]);
        assert_eq!(header.data_type, DataType::F32);
        assert_eq!(header.validate_strict(), Err(DecodeError::BadMagic(0xde, 0xad)));
    }

    #[test]
    fn strict_rejects_non_byte_types() {
        let header = Header::parse(&[0, 0, 0x0c, 0]).unwrap();
        assert_eq!(
            header.validate_strict(),
            Err(DecodeError::UnsupportedDataType(DataType::I32))
        );
    }

    #[test]
    fn body_len_scales_by_element_width() {
        let floats = Header::parse(&[0, 0, 0x0d, 3, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 3]).unwrap();
        assert_eq!(floats.element_count(), Ok(18));
        assert_eq!(floats.body_len(), Ok(Some(72)));

        let bytes = Header::parse(&[0, 0, 8, 1, 0, 0, 0, 5]).unwrap();
        assert_eq!(bytes.body_len(), Ok(Some(5)));

        let unknown = Header::parse(&[0, 0, 0x01, 1, 0, 0, 0, 5]).unwrap();
        assert_eq!(unknown.body_len(), Ok(None));
    }

    #[test]
    fn data_type_bytes_roundtrip() {
        for byte in [0x08, 0x09, 0x0b, 0x0c, 0x0d, 0x0e, 0x42] {
            assert_eq!(DataType::from_byte(byte).to_byte(), byte);
        }
        assert_eq!(DataType::F64.element_size(), Some(8));
        assert_eq!(DataType::Unknown(1).element_size(), None);
        assert_eq!(DataType::Unknown(1).to_string(), "unknown (0x01)");
    }
}
