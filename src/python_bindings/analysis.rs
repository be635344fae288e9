//! Python bindings for firmware analysis.
//!
//! Results cross the boundary as JSON so the Python side does not depend
//! on the Rust type layout.

use pyo3::prelude::*;

use crate::core::VxVersion;

/// Register analysis-related Python bindings.
pub fn register_analysis_bindings(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(scan_bytes_py, m)?)?;
    m.add_function(wrap_pyfunction!(quick_probe_py, m)?)?;
    Ok(())
}

fn version_from_py(vx_version: u8) -> PyResult<VxVersion> {
    VxVersion::from_major(vx_version).ok_or_else(|| {
        pyo3::exceptions::PyValueError::new_err(format!(
            "unsupported VxWorks version {} (expected 5 or 6)",
            vx_version
        ))
    })
}

/// Recover the symbol table and load address from raw firmware bytes.
///
/// Returns the analysis as a JSON string, or None when the image has no
/// symbol table.
#[pyfunction]
#[pyo3(name = "scan_bytes")]
#[pyo3(signature = (data, vx_version=5))]
fn scan_bytes_py(data: &[u8], vx_version: u8) -> PyResult<Option<String>> {
    let version = version_from_py(vx_version)?;
    match crate::analysis::scan(data, version)?.found() {
        Some(result) => Ok(Some(serde_json::to_string(&result).map_err(
            crate::error::VxHunterError::from,
        )?)),
        None => Ok(None),
    }
}

/// Test candidate load addresses against the image's symbol table.
#[pyfunction]
#[pyo3(name = "quick_probe")]
#[pyo3(signature = (data, vx_version=5, candidates=None))]
fn quick_probe_py(
    data: &[u8],
    vx_version: u8,
    candidates: Option<Vec<u32>>,
) -> PyResult<Option<u32>> {
    let version = version_from_py(vx_version)?;
    let candidates =
        candidates.unwrap_or_else(|| crate::config::KNOWN_LOAD_ADDRESSES.to_vec());
    Ok(crate::analysis::quick_probe(data, version, &candidates)?.found())
}
