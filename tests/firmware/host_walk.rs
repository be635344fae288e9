use vxhunter::{
    apply_symbols, Analyzer, ApplySummary, Disassembler, Endianness, FirmwareImage, Result,
    VxHunterError, VxVersion,
};

use crate::common::FirmwareBuilder;

#[derive(Default)]
struct MockHost {
    base: Option<u32>,
    functions: Vec<(u32, String)>,
    labels: Vec<(u32, String)>,
    comments: usize,
}

impl Disassembler for MockHost {
    fn rebase(&mut self, load_address: u32) -> Result<()> {
        if self.base.is_some() {
            return Err(VxHunterError::Host("rebased twice".into()));
        }
        self.base = Some(load_address);
        Ok(())
    }

    fn create_function(&mut self, address: u32, name: &str) -> Result<()> {
        self.functions.push((address, name.to_string()));
        Ok(())
    }

    fn create_label(&mut self, address: u32, name: &str) -> Result<()> {
        self.labels.push((address, name.to_string()));
        Ok(())
    }

    fn set_comment(&mut self, _address: u32, _comment: &str) -> Result<()> {
        self.comments += 1;
        Ok(())
    }
}

#[test]
fn replays_the_recovered_table() {
    for (version, endian) in [
        (VxVersion::V5, Endianness::Little),
        (VxVersion::V6, Endianness::Big),
    ] {
        let fw = FirmwareBuilder::new(version, endian).build();
        let result = Analyzer::for_version(version)
            .analyze(&fw.image)
            .unwrap()
            .found()
            .unwrap();
        let image = FirmwareImage::from_slice(&fw.image);
        let mut host = MockHost::default();
        let summary = apply_symbols(&result, &image, &mut host).unwrap();

        assert_eq!(host.base, Some(fw.load));
        assert_eq!(
            summary,
            ApplySummary {
                functions: 103,
                labels: 17,
                skipped: 0,
                failed: 0
            }
        );
        // none of the synthetic names are mangled
        assert_eq!(host.comments, 0);

        let mut expected_functions = Vec::new();
        let mut expected_labels = Vec::new();
        for (slot, &k) in fw.record_names.iter().enumerate() {
            let entry = (fw.load + 0x8000 + slot as u32 * 4, fw.names[k].clone());
            if k % 7 == 3 {
                expected_labels.push(entry);
            } else {
                expected_functions.push(entry);
            }
        }
        assert_eq!(host.functions, expected_functions);
        assert_eq!(host.labels, expected_labels);
    }
}

#[test]
fn boxed_hosts_work_too() {
    let fw = FirmwareBuilder::new(VxVersion::V5, Endianness::Big)
        .names(20, Some(4))
        .build();
    let cfg = vxhunter::AnalysisConfig {
        check_count: 10,
        ..vxhunter::AnalysisConfig::default()
    };
    let result = Analyzer::new(cfg)
        .unwrap()
        .analyze(&fw.image)
        .unwrap()
        .found()
        .unwrap();
    let image = FirmwareImage::from_slice(&fw.image);
    let mut host: Box<dyn Disassembler> = Box::new(MockHost::default());
    let summary = apply_symbols(&result, &image, host.as_mut()).unwrap();
    assert_eq!(summary.functions + summary.labels, 20);
}
