//! Error types for the vxhunter firmware analysis library.
//!
//! Faults live here. Expected negative outcomes (no symbol table, no
//! string table, no load address) are not errors; they are reported as
//! [`crate::core::Outcome::NotFound`].

use thiserror::Error;

/// Main error type for vxhunter operations.
#[derive(Debug, Error)]
pub enum VxHunterError {
    /// Input cannot be analysed at all
    #[error("Malformed input: {reason}")]
    Malformed { reason: String },

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The optional search budget ran out before the search finished
    #[error("Search exhausted in {operation} after {iterations} iterations ({elapsed_ms}ms)")]
    SearchExhausted {
        operation: String,
        iterations: usize,
        elapsed_ms: u64,
    },

    /// Firmware file larger than the configured limit
    #[error("File size of {found} bytes exceeds the maximum allowed size of {limit} bytes")]
    FileTooLarge { limit: u64, found: u64 },

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failure reported by the host disassembler collaborator
    #[error("Host error: {0}")]
    Host(String),
}

impl VxHunterError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        VxHunterError::Malformed {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for VxHunterError {
    fn from(err: serde_json::Error) -> Self {
        VxHunterError::Serialization(err.to_string())
    }
}

/// Result type alias for vxhunter operations
pub type Result<T> = std::result::Result<T, VxHunterError>;

/// Convert vxhunter errors to PyO3 exceptions
#[cfg(feature = "python-ext")]
impl From<VxHunterError> for pyo3::PyErr {
    fn from(err: VxHunterError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyException, PyIOError, PyTimeoutError, PyValueError};

        match err {
            VxHunterError::Io(e) => PyIOError::new_err(e.to_string()),
            VxHunterError::SearchExhausted { .. } => PyTimeoutError::new_err(err.to_string()),
            VxHunterError::Malformed { .. } | VxHunterError::InvalidConfig(_) => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyException::new_err(err.to_string()),
        }
    }
}
