//! Configuration for firmware analysis.
//!
//! Centralises the heuristic thresholds with defaults matching common
//! VxWorks images, and loads overrides from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{Endianness, VxVersion};
use crate::error::{Result, VxHunterError};

/// `default_check_count`: how many entries the string-table locator,
/// the load-address correlation and the quick probe insist on.
pub const DEFAULT_CHECK_COUNT: usize = 100;

/// Consecutive matching records required to accept a symbol table.
pub const DEFAULT_MIN_TABLE_RUN: usize = 10;

/// Historically observed load addresses tried by the quick probe.
pub const KNOWN_LOAD_ADDRESSES: [u32; 6] =
    [0x8000_2000, 0x1_0000, 0x1000, 0xf200_3fe4, 0x10_0000, 0x10_7fe0];

/// libc-style names used to find one in-image occurrence of the string table.
pub const FUNCTION_NAME_KEY_WORDS: [&str; 3] = ["bzero", "usrInit", "bfill"];

/// Master configuration for an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Symbol record layout
    pub version: VxVersion,
    /// Pre-known byte order; skips endianness detection when set
    pub endian: Option<Endianness>,
    /// Consecutive records the symbol-table scanner requires (default: 10)
    pub min_table_run: usize,
    /// Required run length, capped by the symbol count (default: 100)
    pub check_count: usize,
    /// Longest accepted function name (default: 255)
    pub max_name_len: usize,
    /// Largest null gap between adjacent names (default: 4)
    pub max_string_gap: usize,
    /// Candidates for the quick probe, tried in order
    pub known_addresses: Vec<u32>,
    /// Key function names, tried in order
    pub anchor_names: Vec<String>,
    /// Split the symbol-table offset search across rayon workers
    pub parallel_scan: bool,
    /// Wall-clock bound for the nested searches; `None` is unbounded
    pub time_budget_ms: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: VxVersion::V5,
            endian: None,
            min_table_run: DEFAULT_MIN_TABLE_RUN,
            check_count: DEFAULT_CHECK_COUNT,
            max_name_len: 255,
            max_string_gap: 4,
            known_addresses: KNOWN_LOAD_ADDRESSES.to_vec(),
            anchor_names: FUNCTION_NAME_KEY_WORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            parallel_scan: true,
            time_budget_ms: None,
        }
    }
}

impl AnalysisConfig {
    /// Defaults for the given record layout.
    pub fn for_version(version: VxVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the heuristics cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.min_table_run < 2 {
            return Err(VxHunterError::InvalidConfig(format!(
                "min_table_run must be at least 2 (got {})",
                self.min_table_run
            )));
        }
        if self.check_count == 0 {
            return Err(VxHunterError::InvalidConfig(
                "check_count must be non-zero".to_string(),
            ));
        }
        if self.anchor_names.iter().all(|n| n.is_empty()) {
            return Err(VxHunterError::InvalidConfig(
                "anchor_names must contain at least one name".to_string(),
            ));
        }
        Ok(())
    }

    /// `min(symbol_count, check_count)`
    pub fn required_count(&self, symbol_count: usize) -> usize {
        symbol_count.min(self.check_count)
    }
}
