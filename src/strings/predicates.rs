//! Byte-slice predicates for name strings.
//!
//! Names in the string table are binary strings; nothing here converts
//! them to text.

use memchr::{memchr, memrchr};

/// Characters that only appear in decorated/demangled forms.
pub const BAD_NAME_CHARS: &[u8] = b"\\%+,&/";

/// Printable ASCII, space through tilde.
#[inline]
pub fn is_printable(b: u8) -> bool {
    (32..=126).contains(&b)
}

/// Whether `name` looks like a plain C function name.
pub fn is_function_name(name: &[u8], max_len: usize) -> bool {
    !name.is_empty()
        && name.len() <= max_len
        && name
            .iter()
            .all(|&b| is_printable(b) && !BAD_NAME_CHARS.contains(&b))
}

/// A run of non-null bytes, `[start, end)`; `end` is the terminator
/// position or the image length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSpan {
    pub start: usize,
    pub end: usize,
}

impl StringSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn bytes<'a>(&self, image: &'a [u8]) -> &'a [u8] {
        &image[self.start..self.end]
    }
}

/// The string at or before `offset`, skipping null bytes backwards.
///
/// If `offset` falls inside a string the whole string is returned.
pub fn prev_string(image: &[u8], offset: usize) -> Option<StringSpan> {
    if image.is_empty() {
        return None;
    }
    let offset = offset.min(image.len() - 1);
    let last = image[..=offset].iter().rposition(|&b| b != 0)?;
    let start = memrchr(0, &image[..last]).map_or(0, |p| p + 1);
    let end = memchr(0, &image[last..]).map_or(image.len(), |p| last + p);
    Some(StringSpan { start, end })
}

/// The string at or after `offset`, skipping null bytes forwards.
///
/// If `offset` falls inside a string the span starts at `offset`.
pub fn next_string(image: &[u8], offset: usize) -> Option<StringSpan> {
    let tail = image.get(offset..)?;
    let start = offset + tail.iter().position(|&b| b != 0)?;
    let end = memchr(0, &image[start..]).map_or(image.len(), |p| start + p);
    Some(StringSpan { start, end })
}
