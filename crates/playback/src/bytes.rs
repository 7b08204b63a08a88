//! Little-endian integer assembly.
//!
//! Binary layouts on the wire (RIFF chunks, the serial header) store numbers
//! least-significant byte first. These helpers assemble them without any
//! alignment assumptions, so a field can start at any byte offset.

/// Assemble up to four bytes into an unsigned integer, least-significant first.
///
/// `value = Σ bytes[i] << (8 * i)`. Returns `None` for an empty slice or one
/// longer than four bytes.
#[allow(clippy::arithmetic_side_effects)] // Safety: at most 4 bytes, so three 8-bit shifts fit in u32
pub fn le_uint(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }
    Some(
        bytes
            .iter()
            .rev()
            .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte)),
    )
}

/// Assemble the `width`-byte field at `offset`, or `None` if it runs past the end.
fn field_at(bytes: &[u8], offset: usize, width: usize) -> Option<u32> {
    let end = offset.checked_add(width)?;
    le_uint(bytes.get(offset..end)?)
}

/// Read a little-endian `u16` at `offset`, or `None` if it runs past the end.
pub fn le_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    u16::try_from(field_at(bytes, offset, 2)?).ok()
}

/// Read a little-endian `u32` at `offset`, or `None` if it runs past the end.
pub fn le_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    field_at(bytes, offset, 4)
}

/// Copy a four-byte tag at `offset`, or `None` if it runs past the end.
pub fn tag_at(bytes: &[u8], offset: usize) -> Option<[u8; 4]> {
    let end = offset.checked_add(4)?;
    bytes.get(offset..end)?.try_into().ok()
}

/// Render a four-byte tag for log output; non-UTF-8 tags show as `"????"`.
pub fn tag_str(tag: &[u8; 4]) -> &str {
    core::str::from_utf8(tag).unwrap_or("????")
}
