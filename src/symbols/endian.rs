//! Byte-order detection from the first two records of a table.
//!
//! Name strings of neighbouring symbols usually live in the same 64 KiB
//! segment, so the high half of their name addresses repeats. Where that
//! repeated half sits tells the byte order.

use tracing::{debug, info};

use crate::core::{Endianness, VxVersion};

/// Decide the byte order of the table starting at `start`.
///
/// Equal `[4:6)` halves mean big-endian, equal `[6:8)` halves mean
/// little-endian. When neither repeats the result is little-endian; that
/// fallback is a heuristic default, not an observation.
pub fn detect_endianness(image: &[u8], start: usize, version: VxVersion) -> Endianness {
    let interval = version.record_interval();
    let half = |record: usize, rel: usize| {
        let at = start + record * interval + rel;
        image.get(at..at + 2)
    };

    let (Some(hi0), Some(hi1), Some(lo0), Some(lo1)) = (half(0, 4), half(1, 4), half(0, 6), half(1, 6))
    else {
        debug!(start, "fewer than two records available; assuming little endian");
        return Endianness::Little;
    };

    let endian = if hi0 == hi1 {
        Endianness::Big
    } else if lo0 == lo1 {
        Endianness::Little
    } else {
        debug!("no repeated address half; falling back to little endian");
        Endianness::Little
    };
    info!(endian = %endian, "VxWorks endian");
    endian
}
