//! Hex previews of raw buffers for diagnostics.

/// Formats up to `max` bytes of `octets` as space-separated lower-case hex.
///
/// A truncated preview ends with the count of bytes left out.
///
/// # Example
///
/// ```
/// use idx_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0x00, 0x00, 0x08, 0x03], 16), "00 00 08 03");
/// assert_eq!(print_octets(&[1, 2, 3], 2), "01 02 ... (1 more)");
/// assert_eq!(print_octets(&[], 16), "");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let shown: Vec<String> = octets
        .iter()
        .take(max)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    let mut result = shown.join(" ");
    if octets.len() > max {
        result.push_str(&format!(" ... ({} more)", octets.len() - max));
    }
    result
}

/// Formats the bytes of `octets` starting at `offset`, clamped to the buffer.
///
/// # Example
///
/// ```
/// use idx_buffers::print_octets_at;
///
/// assert_eq!(print_octets_at(&[9, 8, 7, 6], 2, 16), "07 06");
/// assert_eq!(print_octets_at(&[9, 8], 5, 16), "");
/// ```
pub fn print_octets_at(octets: &[u8], offset: usize, max: usize) -> String {
    print_octets(octets.get(offset..).unwrap_or_default(), max)
}
