//! End-to-end analysis of one firmware image.
//!
//! Two independent chains meet here: symbol table scan, byte order and
//! decode on one side; anchor, string-table bounds and decode on the
//! other. The load address is then found by probing known bases or by
//! correlating the two tables.
//!
//! Every call is a pure function of the image bytes and the
//! configuration; an [`Analyzer`] holds nothing else and can be reused
//! across images and threads.

use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::core::{
    AnalysisResult, Endianness, LoadAddressSource, Outcome, StringRecord, SymbolRecord,
    TableRange, VxVersion,
};
use crate::error::Result;
use crate::loader::{probe_known_addresses, resolve_load_address};
use crate::strings::{decode_string_table, find_anchor, locate_string_table, LocateParams};
use crate::symbols::{decode_symbol_table, detect_endianness, find_symbol_table};
use crate::timeout::Deadline;

/// How the load address is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadStrategy {
    /// Full correlation only
    Correlate,
    /// Known addresses first, correlation as fallback
    ProbeThenCorrelate,
}

/// Decoded symbol side of an analysis.
struct SymbolSide {
    range: TableRange,
    endianness: Endianness,
    records: Vec<SymbolRecord>,
}

/// Reusable analysis driver bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn for_version(version: VxVersion) -> Self {
        Self {
            config: AnalysisConfig::for_version(version),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Locate and decode both tables and correlate them for the load
    /// address.
    ///
    /// `NotFound` means no symbol table. A result whose `load_address` is
    /// `None` means the tables were found but could not be aligned.
    pub fn scan(&self, image: &[u8]) -> Result<Outcome<AnalysisResult>> {
        self.run(image, LoadStrategy::Correlate)
    }

    /// Like [`Analyzer::scan`], but tries the configured known addresses
    /// before falling back to correlation.
    pub fn analyze(&self, image: &[u8]) -> Result<Outcome<AnalysisResult>> {
        self.run(image, LoadStrategy::ProbeThenCorrelate)
    }

    /// Only the known-address probe.
    pub fn quick_probe(&self, image: &[u8], candidates: &[u32]) -> Result<Outcome<u32>> {
        let span = crate::span_trace!("quick_probe", version = %self.config.version);
        let _guard = span.enter();

        let deadline = Deadline::from_millis(self.config.time_budget_ms);
        let Outcome::Found(symbols) = self.symbol_side(image, &deadline)? else {
            return Ok(Outcome::NotFound);
        };
        let count = self.config.required_count(symbols.records.len());
        Ok(probe_known_addresses(image, &symbols.records, candidates, count))
    }

    fn run(&self, image: &[u8], strategy: LoadStrategy) -> Result<Outcome<AnalysisResult>> {
        let span = crate::span_trace!(
            "analyze",
            version = %self.config.version,
            size = image.len()
        );
        let _guard = span.enter();

        let deadline = Deadline::from_millis(self.config.time_budget_ms);
        let Outcome::Found(symbols) = self.symbol_side(image, &deadline)? else {
            return Ok(Outcome::NotFound);
        };
        let count = self.config.required_count(symbols.records.len());

        let (string_table_range, string_table) = match self.string_side(image, count) {
            Outcome::Found((range, records)) => (Some(range), records),
            Outcome::NotFound => (None, Vec::new()),
        };

        let mut load = Outcome::NotFound;
        let mut source = None;
        if strategy == LoadStrategy::ProbeThenCorrelate {
            load = probe_known_addresses(
                image,
                &symbols.records,
                &self.config.known_addresses,
                count,
            );
            if load.is_found() {
                source = Some(LoadAddressSource::KnownAddress);
            }
        }
        if !load.is_found() && !string_table.is_empty() {
            load = resolve_load_address(&symbols.records, &string_table, count, &deadline)?;
            if load.is_found() {
                source = Some(LoadAddressSource::Correlated);
            }
        }

        let load_address = load.found();
        match load_address {
            Some(addr) => info!(load_address = %format!("{:#x}", addr), ?source, "analysis complete"),
            None => warn!("load address not found"),
        }

        Ok(Outcome::Found(AnalysisResult {
            version: self.config.version,
            symbol_table_range: symbols.range,
            endianness: symbols.endianness,
            symbol_table: symbols.records,
            string_table_range,
            string_table,
            load_address,
            load_address_source: source,
        }))
    }

    fn symbol_side(&self, image: &[u8], deadline: &Deadline) -> Result<Outcome<SymbolSide>> {
        let version = self.config.version;
        let Outcome::Found(range) = find_symbol_table(image, &self.config, deadline)? else {
            return Ok(Outcome::NotFound);
        };
        let endianness = match self.config.endian {
            Some(e) => {
                info!(endian = %e, "using configured byte order");
                e
            }
            None => detect_endianness(image, range.start, version),
        };
        let records = decode_symbol_table(image, range, version, endianness);
        Ok(Outcome::Found(SymbolSide {
            range,
            endianness,
            records,
        }))
    }

    fn string_side(&self, image: &[u8], required: usize) -> Outcome<(TableRange, Vec<StringRecord>)> {
        let Some(anchor) = find_anchor(image, &self.config.anchor_names[..]) else {
            return Outcome::NotFound;
        };
        let params = LocateParams {
            required,
            max_name_len: self.config.max_name_len,
            max_gap: self.config.max_string_gap,
        };
        locate_string_table(image, anchor.offset, &params).map(|located| {
            let records = decode_string_table(image, located.range);
            (located.range, records)
        })
    }
}

/// Recover the symbol table, byte order, string table and load address
/// with default settings for `version`.
pub fn scan(image: &[u8], version: VxVersion) -> Result<Outcome<AnalysisResult>> {
    Analyzer::for_version(version).scan(image)
}

/// Test `candidates` as load addresses against the image's symbol table.
pub fn quick_probe(image: &[u8], version: VxVersion, candidates: &[u32]) -> Result<Outcome<u32>> {
    Analyzer::for_version(version).quick_probe(image, candidates)
}
