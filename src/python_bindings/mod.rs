//! Python bindings for vxhunter.

pub mod analysis;

use pyo3::prelude::*;

/// Register all Python bindings with the module.
pub fn register_python_bindings(py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<crate::core::binary::VxVersion>()?;
    m.add_class::<crate::core::binary::Endianness>()?;
    m.add_class::<crate::core::symbol::SymbolType>()?;

    analysis::register_analysis_bindings(py, m)?;

    Ok(())
}
