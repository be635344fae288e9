//! Load-address recovery by correlating name lengths.
//!
//! Once sorted, the symbol table's derived name lengths and the string
//! table's record lengths describe the same sequence of names. Aligning
//! the two sequences gives a pair `(symbol, string)` naming the same
//! string, and the difference of their addresses is the load address.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::core::{Outcome, StringRecord, SymbolRecord};
use crate::error::Result;
use crate::timeout::Deadline;

/// Find the first `(symbol, string)` alignment whose lengths agree over
/// `count` consecutive entries and return the implied load address.
///
/// Pairs are tried symbol-major, string-minor, so the lowest symbol index
/// wins, then the lowest string index. The last symbol has no derived
/// length and matches any string inside a run, but can never start one.
/// Alignments whose subtraction would underflow are skipped.
pub fn resolve_load_address(
    symbols: &[SymbolRecord],
    strings: &[StringRecord],
    count: usize,
    deadline: &Deadline,
) -> Result<Outcome<u32>> {
    if symbols.is_empty() || strings.is_empty() || count == 0 {
        warn!("We didn't find load address in this firmware");
        return Ok(Outcome::NotFound);
    }

    // string indices by record length, ascending
    let mut by_length: HashMap<usize, Vec<usize>> = HashMap::new();
    for (i, rec) in strings.iter().enumerate() {
        by_length.entry(rec.length).or_default().push(i);
    }

    let mut timeout = deadline.iterations("load_address_resolve");
    for (si, sym) in symbols.iter().enumerate() {
        let Some(length) = sym.name_length else {
            continue;
        };
        let Some(candidates) = by_length.get(&(length as usize)) else {
            continue;
        };
        for &ti in candidates {
            crate::check_timeout!(timeout);
            if !run_matches(symbols, strings, si, ti, count) {
                continue;
            }
            let Ok(string_address) = u32::try_from(strings[ti].address) else {
                continue;
            };
            let Some(load) = sym.name_address.checked_sub(string_address) else {
                debug!(si, ti, "alignment implies a negative load address");
                continue;
            };
            info!(
                load_address = %format!("{:#x}", load),
                symbol_index = si,
                string_index = ti,
                "load address found"
            );
            return Ok(Outcome::Found(load));
        }
    }

    warn!(
        pairs = timeout.iterations(),
        "We didn't find load address in this firmware"
    );
    Ok(Outcome::NotFound)
}

fn run_matches(
    symbols: &[SymbolRecord],
    strings: &[StringRecord],
    si: usize,
    ti: usize,
    count: usize,
) -> bool {
    if si + count > symbols.len() || ti + count > strings.len() {
        return false;
    }
    symbols[si..si + count]
        .iter()
        .zip(&strings[ti..ti + count])
        .all(|(sym, rec)| match sym.name_length {
            Some(length) => length as usize == rec.length,
            None => true,
        })
}
