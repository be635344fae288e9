use vxhunter::core::{Outcome, TableRange};
use vxhunter::strings::{decode_string_table, find_anchor, locate_string_table, LocateParams};
use vxhunter::{Endianness, VxVersion};

use crate::common::FirmwareBuilder;

fn params(required: usize) -> LocateParams {
    LocateParams {
        required,
        max_name_len: 255,
        max_gap: 4,
    }
}

const KEY_NAMES: [&str; 3] = ["bzero", "usrInit", "bfill"];

#[test]
fn locates_the_whole_table_from_the_anchor() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big).build();
    let anchor = find_anchor(&fw.image, &KEY_NAMES[..]).unwrap();
    assert_eq!(anchor.offset, fw.name_offsets[110]);
    assert_eq!(anchor.name, "bzero");

    let located = locate_string_table(&fw.image, anchor.offset, &params(100))
        .found()
        .unwrap();
    assert_eq!((located.range.start, located.range.end), fw.string_table);
    assert_eq!(located.names.len(), fw.names.len());
    let starts: Vec<usize> = located.names.iter().map(|s| s.start).collect();
    assert_eq!(starts, fw.name_offsets);
}

#[test]
fn decoded_records_cover_the_range() {
    let fw = FirmwareBuilder::new(VxVersion::V6, Endianness::Little).build();
    let range = TableRange::new(fw.string_table.0, fw.string_table.1);
    let records = decode_string_table(&fw.image, range);
    assert_eq!(records.len(), fw.names.len());

    let last = records.len() - 1;
    for (i, rec) in records.iter().enumerate() {
        assert_eq!(rec.address, fw.name_offsets[i]);
        assert_eq!(rec.name(), fw.names[i]);
        if i < last {
            assert_eq!(rec.length, fw.padded_length(i));
        } else {
            // the final name is closed by its terminator
            assert_eq!(rec.length, fw.names[i].len() + 1);
        }
    }
    let covered: usize = records.iter().map(|r| r.length).sum();
    assert_eq!(covered, range.len() + 1);
}

#[test]
fn required_count_before_the_anchor() {
    // a rejected name at 9 leaves exactly 100 names before the anchor at 110
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .bad_name_at(9)
        .build();
    let anchor = find_anchor(&fw.image, &KEY_NAMES[..]).unwrap();
    let located = locate_string_table(&fw.image, anchor.offset, &params(100))
        .found()
        .unwrap();
    assert_eq!(located.range.start, fw.name_offsets[10]);
    assert_eq!(located.range.end, fw.string_table.1);
    assert_eq!(located.names.len(), 110);

    // one more rejected name and the backward walk stops short
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .bad_name_at(10)
        .build();
    let anchor = find_anchor(&fw.image, &KEY_NAMES[..]).unwrap();
    assert_eq!(
        locate_string_table(&fw.image, anchor.offset, &params(100)),
        Outcome::NotFound
    );
    assert!(locate_string_table(&fw.image, anchor.offset, &params(99)).is_found());
}

#[test]
fn small_tables_need_a_small_count() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .names(12, Some(8))
        .build();
    let anchor = find_anchor(&fw.image, &KEY_NAMES[..]).unwrap();
    // only 8 names precede the anchor
    assert_eq!(
        locate_string_table(&fw.image, anchor.offset, &params(12)),
        Outcome::NotFound
    );
    let located = locate_string_table(&fw.image, anchor.offset, &params(5))
        .found()
        .unwrap();
    assert_eq!((located.range.start, located.range.end), fw.string_table);
}

#[test]
fn anchor_absent() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .without_anchor()
        .build();
    assert!(find_anchor(&fw.image, &KEY_NAMES[..]).is_none());
}
