//! Decoded symbol-table records.

#[cfg(feature = "python-ext")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flag words the host turns into functions rather than labels.
///
/// These are the same on-disk bytes (`00 00 05 00`) read big- and
/// little-endian respectively.
pub const FUNCTION_FLAGS: [u32; 2] = [0x0500, 0x05_0000];

/// Symbol class from the record's type byte.
///
/// Codes follow the a.out convention: the low bit marks a global symbol,
/// the rest selects the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "python-ext", pyclass(eq, eq_int))]
pub enum SymbolType {
    /// Undefined symbol (0)
    Undefined,
    /// Absolute symbol (2/3)
    Absolute,
    /// `.text` symbol (4/5)
    Text,
    /// Data symbol (6/7)
    Data,
    /// BSS symbol (8/9)
    Bss,
    /// Any other code seen in a matching record (e.g. 0x11)
    Other,
}

impl SymbolType {
    pub fn from_code(code: u8) -> Self {
        match code & !1 {
            0 => SymbolType::Undefined,
            2 => SymbolType::Absolute,
            4 => SymbolType::Text,
            6 => SymbolType::Data,
            8 => SymbolType::Bss,
            _ => SymbolType::Other,
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolType::Undefined => write!(f, "undefined"),
            SymbolType::Absolute => write!(f, "absolute"),
            SymbolType::Text => write!(f, "text"),
            SymbolType::Data => write!(f, "data"),
            SymbolType::Bss => write!(f, "bss"),
            SymbolType::Other => write!(f, "other"),
        }
    }
}

/// One decoded record of the embedded symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Position of the record in the image
    pub offset: usize,
    /// Absolute virtual address of the symbol name string
    pub name_address: u32,
    /// Absolute virtual address the symbol refers to
    pub dest_address: u32,
    /// Distance to the next name address after sorting; `None` for the last record
    pub name_length: Option<u32>,
    /// Trailing 4 bytes of the record in image byte order
    pub flags: u32,
    /// Raw type byte (second to last byte of the record)
    pub type_code: u8,
}

impl SymbolRecord {
    pub fn symbol_type(&self) -> SymbolType {
        SymbolType::from_code(self.type_code)
    }

    pub fn is_global(&self) -> bool {
        self.type_code & 1 == 1
    }

    /// Whether the host should create a function (rather than a label).
    pub fn is_function(&self) -> bool {
        FUNCTION_FLAGS.contains(&self.flags)
    }
}
