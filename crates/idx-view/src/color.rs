//! Grayscale mapping shared by every surface.
//!
//! Intensities are inverted so high values (ink) paint dark on a light
//! background.

/// Inverted gray component for an intensity.
pub fn gray_for(intensity: u8) -> u8 {
    255 - intensity
}

/// Display color for an intensity, as `#rrggbb`.
///
/// ```
/// use idx_view::color_for;
///
/// assert_eq!(color_for(0), "#ffffff");
/// assert_eq!(color_for(255), "#000000");
/// assert_eq!(color_for(250), "#050505");
/// ```
pub fn color_for(intensity: u8) -> String {
    let v = gray_for(intensity);
    format!("#{v:02x}{v:02x}{v:02x}")
}

/// Parses a `#rrggbb` color back into its channels.
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
