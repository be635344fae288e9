//! # Symbols Module
//!
//! Locates and decodes the symbol table embedded in a raw VxWorks image:
//! per-record format check, table scan, byte-order detection, decoding.

pub mod decode;
pub mod endian;
pub mod format;
pub mod scan;

pub use decode::decode_symbol_table;
pub use endian::detect_endianness;
pub use format::{matches_record, SYMBOL_SIGNATURES_V5, SYMBOL_SIGNATURES_V6};
pub use scan::{find_symbol_table, is_table_start};
