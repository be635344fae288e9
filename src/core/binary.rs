//! Record layout selector and byte order.

#[cfg(feature = "python-ext")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main VxWorks release line; fixes the symbol record layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "python-ext", pyclass(eq, eq_int))]
pub enum VxVersion {
    /// VxWorks 5.x, 16-byte records
    #[default]
    V5,
    /// VxWorks 6.x, 20-byte records
    V6,
}

impl VxVersion {
    /// Byte stride between consecutive symbol records.
    pub const fn record_interval(self) -> usize {
        match self {
            VxVersion::V5 => 16,
            VxVersion::V6 => 20,
        }
    }

    /// Width of the trailing type signature.
    pub const fn signature_len(self) -> usize {
        match self {
            VxVersion::V5 => 4,
            VxVersion::V6 => 8,
        }
    }

    /// Parse the major version number used on the command line (5 or 6).
    pub fn from_major(major: u8) -> Option<Self> {
        match major {
            5 => Some(VxVersion::V5),
            6 => Some(VxVersion::V6),
            _ => None,
        }
    }

    pub fn major(self) -> u8 {
        match self {
            VxVersion::V5 => 5,
            VxVersion::V6 => 6,
        }
    }
}

impl fmt::Display for VxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VxWorks {}.x", self.major())
    }
}

/// Byte order of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "python-ext", pyclass(eq, eq_int))]
pub enum Endianness {
    /// Little-endian byte order
    Little,
    /// Big-endian byte order
    Big,
}

impl Endianness {
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        }
    }

    pub fn write_u32(self, value: u32) -> [u8; 4] {
        match self {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little"),
            Endianness::Big => write!(f, "big"),
        }
    }
}

impl std::str::FromStr for Endianness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endianness::Little),
            "big" | "be" => Ok(Endianness::Big),
            other => Err(format!("unknown endianness '{}'", other)),
        }
    }
}
