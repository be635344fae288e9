//! Host collaborator interface.
//!
//! The recovery itself never touches a disassembler. A host analysis tool
//! implements [`Disassembler`], and [`apply_symbols`] replays an
//! [`AnalysisResult`] onto it: rebase once, then one function or label per
//! symbol record.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{AnalysisResult, FirmwareImage, SymbolRecord};
use crate::demangle::{demangle_gnu, Signature};
use crate::error::{Result, VxHunterError};

/// Side effects a host analysis tool performs for recovered symbols.
///
/// Addresses are virtual, i.e. already based at the load address.
pub trait Disassembler {
    /// Move the image so that offset 0 sits at `load_address`
    fn rebase(&mut self, load_address: u32) -> Result<()>;

    /// Disassemble at `address` and create a function named `name`
    fn create_function(&mut self, address: u32, name: &str) -> Result<()>;

    /// Create a label named `name` at `address`
    fn create_label(&mut self, address: u32, name: &str) -> Result<()>;

    /// Attach a plate comment at `address`
    fn set_comment(&mut self, address: u32, comment: &str) -> Result<()>;

    /// Demangle a recovered name; the default uses the GNU demangler.
    fn demangle(&self, name: &str) -> Option<Signature> {
        demangle_gnu(name)
    }
}

/// What [`apply_symbols`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub functions: usize,
    pub labels: usize,
    /// Records with a zero destination or an unreadable name
    pub skipped: usize,
    /// Records the host refused
    pub failed: usize,
}

/// Walk the symbol table in on-disk order and create one function or
/// label per record.
///
/// Host failures on a single record are logged and counted; only a
/// missing load address or a failed rebase abort the walk.
pub fn apply_symbols<D: Disassembler + ?Sized>(
    result: &AnalysisResult,
    image: &FirmwareImage,
    host: &mut D,
) -> Result<ApplySummary> {
    let load = result.load_address.ok_or_else(|| {
        VxHunterError::malformed("cannot apply symbols without a load address")
    })?;
    host.rebase(load)?;
    info!(load_address = %format!("{:#x}", load), "rebased image");

    let mut summary = ApplySummary::default();
    for record in result.records_in_table_order() {
        if record.dest_address == 0 {
            summary.skipped += 1;
            continue;
        }
        let Some(name) = read_name(image, record, load) else {
            debug!(
                name_address = %format!("{:#x}", record.name_address),
                "symbol name not readable"
            );
            summary.skipped += 1;
            continue;
        };

        match apply_one(host, record, &name) {
            Ok(true) => summary.functions += 1,
            Ok(false) => summary.labels += 1,
            Err(e) => {
                warn!(
                    name = %name,
                    dest = %format!("{:#x}", record.dest_address),
                    error = %e,
                    "Create function failed"
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        functions = summary.functions,
        labels = summary.labels,
        skipped = summary.skipped,
        failed = summary.failed,
        "applied symbols"
    );
    Ok(summary)
}

// Ok(true) for a function, Ok(false) for a label.
fn apply_one<D: Disassembler + ?Sized>(
    host: &mut D,
    record: &SymbolRecord,
    name: &str,
) -> Result<bool> {
    let dest = record.dest_address;
    let signature = host.demangle(name);
    if record.is_function() {
        let fn_name = signature.as_ref().map_or(name, |s| s.name.as_str());
        host.create_function(dest, fn_name)?;
        if let Some(sig) = &signature {
            host.set_comment(dest, &sig.full)?;
        }
        Ok(true)
    } else {
        debug!(name, kind = %record.symbol_type(), "creating label");
        host.create_label(dest, name)?;
        if let Some(sig) = &signature {
            host.set_comment(dest, &sig.full)?;
        }
        Ok(false)
    }
}

fn read_name(image: &FirmwareImage, record: &SymbolRecord, load: u32) -> Option<String> {
    let offset = record.name_address.checked_sub(load)? as usize;
    let bytes = image.c_string_at(offset)?;
    if bytes.is_empty() || bytes.len() == image.len() - offset {
        // empty, or no terminator before the end of the image
        return None;
    }
    Some(String::from_utf8_lossy(bytes).into_owned())
}
