//! Quick probe of historically common load addresses.

use tracing::{debug, info};

use crate::core::{Outcome, SymbolRecord};
use crate::strings::predicates::is_printable;

/// Whether every one of the first `count` records points at the start of a
/// printable string when the image is based at `candidate`.
///
/// "Start" means the byte at the offset is printable; a name that begins
/// mid-string still passes, as the probe only samples the first byte.
pub fn check_load_address(
    image: &[u8],
    symbols: &[SymbolRecord],
    candidate: u32,
    count: usize,
) -> bool {
    if symbols.is_empty() {
        return false;
    }
    symbols.iter().take(count).all(|sym| {
        sym.name_address
            .checked_sub(candidate)
            .and_then(|offset| image.get(offset as usize))
            .is_some_and(|&b| is_printable(b))
    })
}

/// Try `candidates` in order and return the first that passes
/// [`check_load_address`].
pub fn probe_known_addresses(
    image: &[u8],
    symbols: &[SymbolRecord],
    candidates: &[u32],
    count: usize,
) -> Outcome<u32> {
    for &candidate in candidates {
        if check_load_address(image, symbols, candidate, count) {
            info!(load_address = %format!("{:#x}", candidate), "known load address matches");
            return Outcome::Found(candidate);
        }
        debug!(candidate = %format!("{:#x}", candidate), "load address is not a match");
    }
    Outcome::NotFound
}
