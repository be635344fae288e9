//! Immutable firmware buffer.

use bytes::Bytes;
use std::fmt;

use crate::core::binary::Endianness;

/// A raw, headerless firmware image. All offsets are indices into it.
///
/// Backed by [`Bytes`], so clones share the same allocation and the
/// buffer can never be mutated after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct FirmwareImage {
    data: Bytes,
}

impl FirmwareImage {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Null-terminated byte string starting at `offset`, without the terminator.
    ///
    /// Returns `None` when `offset` is outside the image. A string that runs
    /// to the end of the image without a terminator is returned as-is.
    pub fn c_string_at(&self, offset: usize) -> Option<&[u8]> {
        let tail = self.data.get(offset..)?;
        let end = memchr::memchr(0, tail).unwrap_or(tail.len());
        Some(&tail[..end])
    }
}

impl AsRef<[u8]> for FirmwareImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<Vec<u8>> for FirmwareImage {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for FirmwareImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmwareImage")
            .field("len", &self.data.len())
            .finish()
    }
}

/// Read a 4-byte unsigned word at `offset` from a raw slice.
pub fn read_u32_at(data: &[u8], offset: usize, endian: Endianness) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let word: [u8; 4] = data.get(offset..end)?.try_into().ok()?;
    Some(endian.read_u32(word))
}
