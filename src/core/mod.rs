//! Core data types for VxWorks firmware analysis.
//!
//! Everything here is a plain value computed from a read-only
//! [`FirmwareImage`]; nothing holds a back-reference into mutable state.

pub mod binary;
pub mod image;
pub mod result;
pub mod string_literal;
pub mod symbol;

pub use binary::{Endianness, VxVersion};
pub use image::FirmwareImage;
pub use result::{AnalysisResult, LoadAddressSource, Outcome, TableRange};
pub use string_literal::StringRecord;
pub use symbol::{SymbolRecord, SymbolType};
