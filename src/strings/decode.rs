//! Partitioning of a located string table into records.

use memchr::memchr;
use tracing::debug;

use crate::core::{StringRecord, TableRange};

/// Split `range` into one [`StringRecord`] per name.
///
/// A record runs from its name's first byte to the first byte of the next
/// name, so its length covers the name and the null padding after it. The
/// range ends at the last name's final byte; that record is extended over
/// its terminator when the image has one, which keeps its length measured
/// the same way as the others.
pub fn decode_string_table(image: &[u8], range: TableRange) -> Vec<StringRecord> {
    let end = range.end.min(image.len());
    let mut records = Vec::new();
    let mut cursor = range.start;

    while cursor < end {
        if image[cursor] == 0 {
            cursor += 1;
            continue;
        }
        let address = cursor;
        let name_end = memchr(0, &image[address..end]).map_or(end, |p| address + p);
        let next = image[name_end..end]
            .iter()
            .position(|&b| b != 0)
            .map_or(end, |p| name_end + p);

        let length = if next == end && image.get(end) == Some(&0) {
            end + 1 - address
        } else {
            next - address
        };
        records.push(StringRecord {
            address,
            bytes: image[address..name_end].to_vec(),
            length,
        });
        cursor = next;
    }

    debug!(records = records.len(), "decoded string table");
    records
}
