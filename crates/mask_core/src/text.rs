//! UTF-8 offset utilities.
//!
//! The engine counts cursor offsets in chars, because a mask slot holds one
//! char. Native text fields usually report byte offsets; these helpers convert
//! between the two and keep byte offsets on char boundaries.

use std::borrow::Cow;

/// Clamp an arbitrary byte index to a valid UTF-8 character boundary.
///
/// Indices past the end clamp to `s.len()`; indices inside a multi-byte char
/// move back to the start of that char.
///
/// ```
/// use mask_core::clamp_to_char_boundary;
///
/// let s = "a€b"; // '€' is 3 bytes
/// assert_eq!(clamp_to_char_boundary(s, 2), 1);
/// assert_eq!(clamp_to_char_boundary(s, 4), 4);
/// assert_eq!(clamp_to_char_boundary(s, 100), 5);
/// ```
#[inline]
pub fn clamp_to_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Number of chars in `s`.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert a byte offset into a char offset (clamping to a boundary first).
///
/// ```
/// use mask_core::byte_to_char_offset;
///
/// assert_eq!(byte_to_char_offset("a€b", 4), 2);
/// assert_eq!(byte_to_char_offset("a€b", 2), 1);
/// ```
pub fn byte_to_char_offset(s: &str, byte: usize) -> usize {
    let byte = clamp_to_char_boundary(s, byte);
    s[..byte].chars().count()
}

/// Convert a char offset into a byte offset; offsets past the end map to `s.len()`.
///
/// ```
/// use mask_core::char_to_byte_offset;
///
/// assert_eq!(char_to_byte_offset("a€b", 2), 4);
/// assert_eq!(char_to_byte_offset("a€b", 9), 5);
/// ```
pub fn char_to_byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// Previous char boundary before byte index `i`; 0 at the start.
pub fn prev_cursor_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    if i == 0 {
        return 0;
    }
    s[..i]
        .char_indices()
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Next char boundary after byte index `i`; `s.len()` at the end.
pub fn next_cursor_boundary(s: &str, i: usize) -> usize {
    let i = clamp_to_char_boundary(s, i);
    if i >= s.len() {
        return s.len();
    }

    let mut it = s[i..].char_indices();
    let _ = it.next();
    it.next().map(|(idx, _)| i + idx).unwrap_or(s.len())
}

/// Strip CR and LF; masked fields are single-line.
///
/// Borrowed when there is nothing to strip.
///
/// ```
/// use mask_core::filter_single_line;
///
/// assert_eq!(filter_single_line("12\r\n34"), "1234");
/// ```
pub fn filter_single_line(s: &str) -> Cow<'_, str> {
    if !s.contains('\n') && !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}
