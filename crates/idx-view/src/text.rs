//! Plain-text dumps of a single image.

use idx_format::Image;

use crate::color::gray_for;

/// One line per row: `#` for intensities above 127, a space otherwise.
///
/// ```
/// use idx_format::{ImageCollection, Shape};
///
/// let images = ImageCollection::from_pixels(1, Shape::new(2, 2), vec![0, 200, 128, 127]).unwrap();
/// assert_eq!(idx_view::ascii_art(images.image(0).unwrap()), "  #\n#  \n");
/// ```
pub fn ascii_art(image: Image<'_>) -> String {
    let mut out = String::with_capacity(image.rows() * (2 * image.cols() + 1));
    for row in image.rows_iter() {
        let cells: Vec<&str> = row
            .iter()
            .map(|&pixel| if pixel > 127 { "#" } else { " " })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// One line per row of inverted, zero-padded hex values separated by commas.
pub fn csv_row_major(image: Image<'_>) -> String {
    let mut out = String::with_capacity(image.rows() * (3 * image.cols() + 1));
    for row in image.rows_iter() {
        let cells: Vec<String> = row
            .iter()
            .map(|&pixel| format!("{:02x}", gray_for(pixel)))
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}
