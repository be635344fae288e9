//! Analysis outcomes.

use serde::{Deserialize, Serialize};

use crate::core::binary::{Endianness, VxVersion};
use crate::core::string_literal::StringRecord;
use crate::core::symbol::{SymbolRecord, SymbolType};

/// Result of a search that may legitimately find nothing.
///
/// Faults travel separately as [`crate::error::VxHunterError`], so an
/// operation returning `Result<Outcome<T>>` distinguishes found, not
/// found, and malformed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Found(T),
    NotFound,
}

impl<T> Outcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(v) => Some(v),
            Outcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(v) => Outcome::Found(f(v)),
            Outcome::NotFound => Outcome::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Found(v),
            None => Outcome::NotFound,
        }
    }
}

/// Half-open byte range `[start, end)` inside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRange {
    pub start: usize,
    pub end: usize,
}

impl TableRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, offset: usize) -> bool {
        (self.start..self.end).contains(&offset)
    }

    /// Record offsets at a fixed stride.
    pub fn offsets(&self, interval: usize) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(interval.max(1))
    }
}

/// How the load address was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadAddressSource {
    /// One of the historically common addresses passed the quick probe
    KnownAddress,
    /// Symbol name lengths were correlated against the string table
    Correlated,
}

/// Everything recovered from one image by one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub version: VxVersion,
    pub symbol_table_range: TableRange,
    pub endianness: Endianness,
    /// Sorted by `name_address`
    pub symbol_table: Vec<SymbolRecord>,
    /// Bounds of the located string table, `end` exclusive of the final terminator
    pub string_table_range: Option<TableRange>,
    /// Sorted by `address`
    pub string_table: Vec<StringRecord>,
    pub load_address: Option<u32>,
    pub load_address_source: Option<LoadAddressSource>,
}

impl AnalysisResult {
    pub fn symbol_count(&self) -> usize {
        self.symbol_table.len()
    }

    /// Record count per symbol class, in first-seen order.
    pub fn type_counts(&self) -> Vec<(SymbolType, usize)> {
        let mut counts: Vec<(SymbolType, usize)> = Vec::new();
        for record in &self.symbol_table {
            let kind = record.symbol_type();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
    }

    /// Symbol records in on-disk (offset) order, as the host walks them.
    pub fn records_in_table_order(&self) -> Vec<&SymbolRecord> {
        let mut records: Vec<&SymbolRecord> = self.symbol_table.iter().collect();
        records.sort_by_key(|r| r.offset);
        records
    }
}
