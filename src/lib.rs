//! Recovery of the embedded symbol table, byte order and load address of
//! raw VxWorks firmware images.

#[cfg(feature = "python-ext")]
use pyo3::prelude::*;

/// Core data types module
pub mod core;

pub mod analysis;
pub mod config;
pub mod demangle;
pub mod error;
pub mod host;
pub mod io;
pub mod loader;
pub mod logging;
pub mod strings;
pub mod symbols;
pub mod timeout;

#[cfg(feature = "python-ext")]
mod python_bindings;

pub use analysis::{quick_probe, scan, Analyzer};
pub use config::AnalysisConfig;
pub use core::{
    AnalysisResult, Endianness, FirmwareImage, LoadAddressSource, Outcome, StringRecord,
    SymbolRecord, SymbolType, TableRange, VxVersion,
};
pub use error::{Result, VxHunterError};
pub use host::{apply_symbols, ApplySummary, Disassembler};

/// A Python module implemented in Rust.
#[cfg(feature = "python-ext")]
#[pymodule]
fn vxhunter(m: &Bound<'_, PyModule>) -> PyResult<()> {
    python_bindings::register_python_bindings(m.py(), m)
}
