//! Entries of the companion string table.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// One name of the string table.
///
/// `bytes` holds the name without its terminator. `length` is the span
/// from `address` to the start of the next name, so it includes the
/// trailing null padding; this is what a symbol's derived name length
/// measures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringRecord {
    /// Offset of the first byte in the image
    pub address: usize,
    /// Name bytes; never contains a null byte
    pub bytes: Vec<u8>,
    /// Bytes up to the next name (name plus padding)
    pub length: usize,
}

impl StringRecord {
    /// Lossy text view for logging and reports; names are binary strings.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Null bytes following the name inside this record.
    pub fn padding(&self) -> usize {
        self.length.saturating_sub(self.bytes.len())
    }
}
