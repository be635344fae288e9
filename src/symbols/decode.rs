//! Decoding of a located table into typed records.

use tracing::{debug, trace};

use crate::core::image::read_u32_at;
use crate::core::{Endianness, SymbolRecord, TableRange, VxVersion};

/// Decode every record in `range`, sort by name address and derive the
/// name lengths.
///
/// The table stores no length field: a name's length is the distance to
/// the next name address once sorted, which includes the terminator and
/// any padding. The last record has no successor and keeps `None`.
pub fn decode_symbol_table(
    image: &[u8],
    range: TableRange,
    version: VxVersion,
    endian: Endianness,
) -> Vec<SymbolRecord> {
    let interval = version.record_interval();
    let mut records: Vec<SymbolRecord> = range
        .offsets(interval)
        .filter_map(|offset| decode_record(image, offset, interval, endian))
        .collect();

    records.sort_by_key(|r| r.name_address);
    for i in 1..records.len() {
        let next = records[i].name_address;
        let prev = &mut records[i - 1];
        prev.name_length = Some(next - prev.name_address);
    }

    debug!(records = records.len(), "decoded symbol table");
    records
}

fn decode_record(
    image: &[u8],
    offset: usize,
    interval: usize,
    endian: Endianness,
) -> Option<SymbolRecord> {
    let name_address = read_u32_at(image, offset + 4, endian)?;
    let dest_address = read_u32_at(image, offset + 8, endian)?;
    let flags = read_u32_at(image, offset + interval - 4, endian)?;
    let type_code = *image.get(offset + interval - 2)?;
    trace!(
        offset,
        name_address = %format!("{:#x}", name_address),
        dest_address = %format!("{:#x}", dest_address),
        "symbol record"
    );
    Some(SymbolRecord {
        offset,
        name_address,
        dest_address,
        name_length: None,
        flags,
        type_code,
    })
}
