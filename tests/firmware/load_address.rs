use vxhunter::core::TableRange;
use vxhunter::loader::{check_load_address, probe_known_addresses, resolve_load_address};
use vxhunter::strings::decode_string_table;
use vxhunter::symbols::decode_symbol_table;
use vxhunter::timeout::Deadline;
use vxhunter::{
    quick_probe, Analyzer, Endianness, LoadAddressSource, Outcome, StringRecord, SymbolRecord,
    VxVersion,
};

use crate::common::{FirmwareBuilder, SyntheticFirmware};

const KNOWN: [u32; 6] = [0x8000_2000, 0x1_0000, 0x1000, 0xf200_3fe4, 0x10_0000, 0x10_7fe0];

fn tables(fw: &SyntheticFirmware) -> (Vec<SymbolRecord>, Vec<StringRecord>) {
    let symbols = decode_symbol_table(
        &fw.image,
        TableRange::new(fw.symbol_table.0, fw.symbol_table.1),
        fw.version,
        fw.endian,
    );
    let strings = decode_string_table(
        &fw.image,
        TableRange::new(fw.string_table.0, fw.string_table.1),
    );
    (symbols, strings)
}

#[test]
fn correlation_recovers_every_load() {
    for load in [0x8000_2000, 0x1_0000, 0x2000_0000] {
        for (version, endian) in [
            (VxVersion::V5, Endianness::Big),
            (VxVersion::V6, Endianness::Little),
        ] {
            let fw = FirmwareBuilder::new(version, endian).load(load).build();
            let (symbols, strings) = tables(&fw);
            let found = resolve_load_address(&symbols, &strings, 100, &Deadline::unbounded())
                .unwrap()
                .found();
            assert_eq!(found, Some(load), "{} {} at {:#x}", version, endian, load);

            // every symbol names the string at the same position
            for (sym, s) in symbols.iter().zip(&strings) {
                assert_eq!(sym.name_address - load, s.address as u32);
            }
        }
    }
}

#[test]
fn probe_matches_known_bases_only() {
    for (i, &load) in KNOWN.iter().enumerate().take(2) {
        let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
            .load(load)
            .build();
        let (symbols, _) = tables(&fw);
        assert!(check_load_address(&fw.image, &symbols, load, 100));
        assert_eq!(
            probe_known_addresses(&fw.image, &symbols, &KNOWN, 100),
            Outcome::Found(KNOWN[i])
        );
    }

    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .load(0x2000_0000)
        .build();
    let (symbols, _) = tables(&fw);
    assert_eq!(
        probe_known_addresses(&fw.image, &symbols, &KNOWN, 100),
        Outcome::NotFound
    );
    assert!(check_load_address(&fw.image, &symbols, 0x2000_0000, 100));
}

#[test]
fn quick_probe_uses_the_given_candidates() {
    let fw = FirmwareBuilder::new(VxVersion::V6, Endianness::Big)
        .load(0x2000_0000)
        .build();
    assert_eq!(
        quick_probe(&fw.image, VxVersion::V6, &KNOWN).unwrap(),
        Outcome::NotFound
    );
    assert_eq!(
        quick_probe(&fw.image, VxVersion::V6, &[0x1000, 0x2000_0000]).unwrap(),
        Outcome::Found(0x2000_0000)
    );
}

#[test]
fn analyze_prefers_known_addresses() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Little)
        .load(0x1_0000)
        .build();
    let result = Analyzer::default().analyze(&fw.image).unwrap().found().unwrap();
    assert_eq!(result.load_address, Some(0x1_0000));
    assert_eq!(result.load_address_source, Some(LoadAddressSource::KnownAddress));

    let result = Analyzer::default().scan(&fw.image).unwrap().found().unwrap();
    assert_eq!(result.load_address, Some(0x1_0000));
    assert_eq!(result.load_address_source, Some(LoadAddressSource::Correlated));
}

#[test]
fn analyze_falls_back_to_correlation() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .load(0x2000_0000)
        .build();
    let result = Analyzer::default().analyze(&fw.image).unwrap().found().unwrap();
    assert_eq!(result.load_address, Some(0x2000_0000));
    assert_eq!(result.load_address_source, Some(LoadAddressSource::Correlated));
}

#[test]
fn shifted_string_table_gives_no_load() {
    // the string side starts 60 names later, so no run lines up
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big).build();
    let (symbols, strings) = tables(&fw);
    let found = resolve_load_address(&symbols[..50], &strings[60..], 50, &Deadline::unbounded())
        .unwrap();
    assert_eq!(found, Outcome::NotFound);
}
