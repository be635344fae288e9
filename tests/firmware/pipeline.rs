use vxhunter::core::TableRange;
use vxhunter::{
    scan, AnalysisConfig, Analyzer, Endianness, LoadAddressSource, Outcome, SymbolType,
    VxHunterError, VxVersion,
};

use crate::common::{noise, FirmwareBuilder};

#[test]
fn scan_reports_every_table() {
    for version in [VxVersion::V5, VxVersion::V6] {
        for endian in [Endianness::Big, Endianness::Little] {
            let fw = FirmwareBuilder::new(version, endian).build();
            let result = scan(&fw.image, version).unwrap().found().unwrap();

            assert_eq!(result.version, version);
            assert_eq!(result.endianness, endian);
            assert_eq!(
                result.symbol_table_range,
                TableRange::new(fw.symbol_table.0, fw.symbol_table.1)
            );
            assert_eq!(result.symbol_count(), fw.record_count());
            assert_eq!(
                result.string_table_range,
                Some(TableRange::new(fw.string_table.0, fw.string_table.1))
            );
            assert_eq!(result.string_table.len(), fw.names.len());
            assert_eq!(result.string_table[110].name(), "bzero");
            assert_eq!(
                result.type_counts(),
                vec![(SymbolType::Text, 103), (SymbolType::Data, 17)]
            );
            assert_eq!(result.load_address, Some(fw.load));
            assert_eq!(result.load_address_source, Some(LoadAddressSource::Correlated));
        }
    }
}

#[test]
fn results_are_deterministic() {
    let fw = FirmwareBuilder::new(VxVersion::V6, Endianness::Big)
        .load(0x2000_0000)
        .build();
    let first = scan(&fw.image, VxVersion::V6).unwrap().found().unwrap();
    let second = scan(&fw.image, VxVersion::V6).unwrap().found().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    let mut cfg = AnalysisConfig::for_version(VxVersion::V6);
    cfg.parallel_scan = false;
    let sequential = Analyzer::new(cfg).unwrap().analyze(&fw.image).unwrap();
    let parallel = Analyzer::for_version(VxVersion::V6)
        .analyze(&fw.image)
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn noise_and_short_input() {
    assert_eq!(scan(&noise(8192, 1), VxVersion::V5).unwrap(), Outcome::NotFound);
    assert!(matches!(
        scan(&[0u8; 15], VxVersion::V5),
        Err(VxHunterError::Malformed { .. })
    ));
    // one whole record of zeros is not a table
    assert_eq!(scan(&[0u8; 16], VxVersion::V5).unwrap(), Outcome::NotFound);
}

#[test]
fn missing_anchor_leaves_only_the_probe() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .without_anchor()
        .build();

    let scanned = scan(&fw.image, VxVersion::V5).unwrap().found().unwrap();
    assert_eq!(scanned.symbol_count(), fw.record_count());
    assert_eq!(scanned.string_table_range, None);
    assert!(scanned.string_table.is_empty());
    assert_eq!(scanned.load_address, None);
    assert_eq!(scanned.load_address_source, None);

    let analyzed = Analyzer::default().analyze(&fw.image).unwrap().found().unwrap();
    assert_eq!(analyzed.load_address, Some(0x8000_2000));
    assert_eq!(analyzed.load_address_source, Some(LoadAddressSource::KnownAddress));
}

#[test]
fn unknown_base_without_string_table() {
    // a bad name right before the anchor cuts the backward walk short
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Little)
        .load(0x2000_0000)
        .bad_name_at(10)
        .build();
    let result = Analyzer::default().analyze(&fw.image).unwrap().found().unwrap();
    assert_eq!(result.string_table_range, None);
    assert_eq!(result.load_address, None);
    assert_eq!(result.load_address_source, None);
}

#[test]
fn small_tables_need_a_small_check_count() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .load(0x2000_0000)
        .names(12, Some(8))
        .build();

    let result = Analyzer::default().scan(&fw.image).unwrap().found().unwrap();
    assert_eq!(result.symbol_count(), 12);
    assert_eq!(result.string_table_range, None);
    assert_eq!(result.load_address, None);

    let cfg = AnalysisConfig {
        check_count: 5,
        ..AnalysisConfig::default()
    };
    let result = Analyzer::new(cfg).unwrap().scan(&fw.image).unwrap().found().unwrap();
    assert_eq!(
        result.string_table_range,
        Some(TableRange::new(fw.string_table.0, fw.string_table.1))
    );
    assert_eq!(result.load_address, Some(0x2000_0000));
    assert_eq!(result.load_address_source, Some(LoadAddressSource::Correlated));
}

#[test]
fn configured_byte_order_skips_detection() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big).build();
    let cfg = AnalysisConfig {
        endian: Some(Endianness::Little),
        ..AnalysisConfig::default()
    };
    let result = Analyzer::new(cfg).unwrap().scan(&fw.image).unwrap().found().unwrap();
    assert_eq!(result.endianness, Endianness::Little);
    // the swapped addresses no longer line up with any string
    assert_eq!(result.load_address, None);
}

#[test]
fn zero_budget_exhausts_the_scan() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .prefix_len(0x4000)
        .build();
    for parallel_scan in [false, true] {
        let cfg = AnalysisConfig {
            parallel_scan,
            time_budget_ms: Some(0),
            ..AnalysisConfig::default()
        };
        let err = Analyzer::new(cfg).unwrap().scan(&fw.image).unwrap_err();
        match err {
            VxHunterError::SearchExhausted { operation, .. } => {
                assert_eq!(operation, "symbol_table_scan");
            }
            other => panic!("expected SearchExhausted, got {:?}", other),
        }
    }
}
