use vxhunter::io::{load_image, IOLimits};
use vxhunter::{AnalysisConfig, Analyzer, Endianness, LoadAddressSource, VxHunterError, VxVersion};

use crate::common::test_utils::{create_temp_file, create_temp_file_with_size};
use crate::common::FirmwareBuilder;

#[test]
fn config_file_drives_the_analyzer() {
    let file = create_temp_file(
        br#"{
            "version": "V6",
            "known_addresses": [536870912],
            "parallel_scan": false
        }"#,
    );
    let cfg = AnalysisConfig::from_json_file(file.path()).unwrap();
    assert_eq!(cfg.version, VxVersion::V6);
    assert_eq!(cfg.known_addresses, vec![0x2000_0000]);
    assert_eq!(cfg.anchor_names, vec!["bzero", "usrInit", "bfill"]);

    let fw = FirmwareBuilder::new(VxVersion::V6, Endianness::Little)
        .load(0x2000_0000)
        .build();
    let result = Analyzer::new(cfg)
        .unwrap()
        .analyze(&fw.image)
        .unwrap()
        .found()
        .unwrap();
    assert_eq!(result.load_address, Some(0x2000_0000));
    assert_eq!(result.load_address_source, Some(LoadAddressSource::KnownAddress));
}

#[test]
fn invalid_config_file() {
    let file = create_temp_file(br#"{"check_count": 0}"#);
    assert!(matches!(
        AnalysisConfig::from_json_file(file.path()),
        Err(VxHunterError::InvalidConfig(_))
    ));

    let file = create_temp_file(b"version = 6");
    assert!(matches!(
        AnalysisConfig::from_json_file(file.path()),
        Err(VxHunterError::Serialization(_))
    ));
}

#[test]
fn loaded_image_scans_like_the_bytes() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big).build();
    let file = create_temp_file(&fw.image);
    let image = load_image(file.path(), &IOLimits::default()).unwrap();
    assert_eq!(image.len(), fw.image.len());

    let from_file = vxhunter::scan(image.as_bytes(), VxVersion::V5).unwrap();
    let from_bytes = vxhunter::scan(&fw.image, VxVersion::V5).unwrap();
    assert_eq!(from_file, from_bytes);
    assert_eq!(from_file.found().and_then(|r| r.load_address), Some(fw.load));
}

#[test]
fn oversized_file_is_refused() {
    let file = create_temp_file_with_size(4096, 0xff);
    let limits = IOLimits { max_file_size: 1024 };
    match load_image(file.path(), &limits) {
        Err(VxHunterError::FileTooLarge { limit, found }) => {
            assert_eq!(limit, 1024);
            assert_eq!(found, 4096);
        }
        other => panic!("expected FileTooLarge, got {:?}", other.map(|i| i.len())),
    }
}
