//! Decoded image data: a flat, immutable, row-major pixel store.

use crate::error::{DecodeError, LookupError};

/// Rows and columns shared by every image of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of pixels in one image.
    pub fn area(&self) -> usize {
        self.rows * self.cols
    }
}

/// Ordered, 0-indexed sequence of equally-shaped 8-bit images.
///
/// Built once by the decoder and read-only afterwards. A collection decoded
/// from a rank-0 header has no shape and no images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageCollection {
    shape: Option<Shape>,
    count: usize,
    pixels: Vec<u8>,
}

impl ImageCollection {
    /// The collection with no images and no shape.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps `count` images of `shape` stored back to back in `pixels`.
    pub fn from_pixels(count: usize, shape: Shape, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = count
            .checked_mul(shape.rows)
            .and_then(|n| n.checked_mul(shape.cols))
            .ok_or_else(|| DecodeError::SizeOverflow(Vec::new()))?;
        if pixels.len() != expected {
            return Err(DecodeError::ShapeMismatch {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            shape: Some(shape),
            count,
            pixels,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    /// All pixels in storage order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the image at `index`, or `None` past the end.
    pub fn image(&self, index: usize) -> Option<Image<'_>> {
        let shape = self.shape?;
        if index >= self.count {
            return None;
        }
        let start = index * shape.area();
        Some(Image {
            shape,
            pixels: &self.pixels[start..start + shape.area()],
        })
    }

    /// Like [`ImageCollection::image`], with the failure spelled out.
    pub fn get(&self, index: usize) -> Result<Image<'_>, LookupError> {
        self.image(index).ok_or(LookupError {
            index,
            len: self.count,
        })
    }

    /// Clamps a signed candidate index into `[0, len - 1]`.
    ///
    /// Returns `None` for an empty collection.
    pub fn clamp_index(&self, candidate: i64) -> Option<usize> {
        let last = self.count.checked_sub(1)?;
        if candidate < 0 {
            return Some(0);
        }
        Some(usize::try_from(candidate).map_or(last, |n| n.min(last)))
    }

    pub fn iter(&self) -> impl Iterator<Item = Image<'_>> + '_ {
        (0..self.count).filter_map(move |index| self.image(index))
    }

    /// Removes `border` rows and columns from every edge of every image.
    ///
    /// ```
    /// use idx_format::{ImageCollection, Shape};
    ///
    /// let images = ImageCollection::from_pixels(1, Shape::new(3, 3), (1..=9).collect()).unwrap();
    /// let cropped = images.crop_borders(1).unwrap();
    /// assert_eq!(cropped.pixels(), &[5]);
    /// ```
    pub fn crop_borders(&self, border: usize) -> Result<Self, DecodeError> {
        let Some(shape) = self.shape else {
            return Ok(Self::empty());
        };
        let too_large = DecodeError::CropTooLarge {
            border,
            rows: shape.rows,
            cols: shape.cols,
        };
        let both_edges = border.checked_mul(2);
        let rows = both_edges.and_then(|b| shape.rows.checked_sub(b)).filter(|&n| n > 0);
        let cols = both_edges.and_then(|b| shape.cols.checked_sub(b)).filter(|&n| n > 0);
        let (Some(rows), Some(cols)) = (rows, cols) else {
            return Err(too_large);
        };
        let cropped = Shape::new(rows, cols);
        let mut pixels = Vec::with_capacity(self.count * cropped.area());
        for image in self.iter() {
            for row in image.rows_iter().skip(border).take(rows) {
                pixels.extend_from_slice(&row[border..border + cols]);
            }
        }
        Self::from_pixels(self.count, cropped, pixels)
    }
}

/// Borrowed view of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image<'a> {
    shape: Shape,
    pixels: &'a [u8],
}

impl<'a> Image<'a> {
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Intensity at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the image.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.shape.rows, "row {row} out of range");
        assert!(col < self.shape.cols, "column {col} out of range");
        self.pixels[row * self.shape.cols + col]
    }

    pub fn row(&self, row: usize) -> &'a [u8] {
        let start = row * self.shape.cols;
        &self.pixels[start..start + self.shape.cols]
    }

    pub fn rows_iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.shape.rows).map(move |row| self.row(row))
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Copies the image into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows_iter().map(<[u8]>::to_vec).collect()
    }
}
