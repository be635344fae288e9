//! Single-record format check.
//!
//! A record is `reserved(4) | name_address(4) | dest_address(4) | ... |
//! type signature`. The signatures are compared as raw bytes, so the check
//! does not depend on byte order.

use crate::core::VxVersion;

/// VxWorks 5.x trailing type words.
pub const SYMBOL_SIGNATURES_V5: [[u8; 4]; 4] = [
    [0x00, 0x00, 0x05, 0x00], // function
    [0x00, 0x00, 0x07, 0x00], // variable
    [0x00, 0x00, 0x09, 0x00], // variable
    [0x00, 0x00, 0x11, 0x00],
];

/// VxWorks 6.x trailing type double words.
pub const SYMBOL_SIGNATURES_V6: [[u8; 8]; 5] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0x00], // may not be a function name
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00], // function
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00], // variable
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09, 0x00], // variable
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x11, 0x00],
];

const ZERO_WORD: [u8; 4] = [0; 4];

/// Whether `window` plausibly encodes one symbol record.
///
/// `window` must be exactly one record interval long; anything else is
/// rejected.
pub fn matches_record(window: &[u8], version: VxVersion) -> bool {
    if window.len() != version.record_interval() {
        return false;
    }
    if window[0..4] != ZERO_WORD {
        return false;
    }
    if window[4..8] == ZERO_WORD {
        return false;
    }
    let signature = &window[window.len() - version.signature_len()..];
    match version {
        VxVersion::V5 => {
            if window[8..12] == ZERO_WORD {
                return false;
            }
            SYMBOL_SIGNATURES_V5.iter().any(|sig| signature == sig)
        }
        // Some 6.x records legitimately carry a zero destination, so that
        // check is not applied here.
        VxVersion::V6 => SYMBOL_SIGNATURES_V6.iter().any(|sig| signature == sig),
    }
}

/// The record window at `offset`, if it fits and matches.
pub fn matches_at(image: &[u8], offset: usize, version: VxVersion) -> bool {
    let interval = version.record_interval();
    match offset.checked_add(interval) {
        Some(end) if end <= image.len() => matches_record(&image[offset..end], version),
        _ => false,
    }
}
