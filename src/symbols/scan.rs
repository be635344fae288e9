//! Symbol-table location by sliding the record check over the image.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::core::{Outcome, TableRange, VxVersion};
use crate::error::{Result, VxHunterError};
use crate::symbols::format::matches_at;
use crate::timeout::Deadline;

/// Candidate offsets handed to one rayon task.
const SCAN_BLOCK: usize = 64 * 1024;

/// How often a parallel block reads the clock.
const DEADLINE_STRIDE: usize = 4096;

/// Whether a run of `min_run` records starts at `offset`.
///
/// For 5.x the name-address words must also show one stable 16-bit half
/// across the run (`[4:6]` for big-endian, `[6:8]` for little-endian);
/// runs where both or neither half is stable are rejected.
pub fn is_table_start(image: &[u8], offset: usize, version: VxVersion, min_run: usize) -> bool {
    let interval = version.record_interval();
    for i in 0..min_run {
        let Some(at) = i.checked_mul(interval).and_then(|d| offset.checked_add(d)) else {
            return false;
        };
        if !matches_at(image, at, version) {
            return false;
        }
    }
    match version {
        VxVersion::V5 => {
            let big = half_is_stable(image, offset, interval, min_run, 4);
            let little = half_is_stable(image, offset, interval, min_run, 6);
            big ^ little
        }
        VxVersion::V6 => true,
    }
}

// Callers have already bounds-checked every record of the run.
fn half_is_stable(image: &[u8], offset: usize, interval: usize, min_run: usize, rel: usize) -> bool {
    let half = |i: usize| {
        let at = offset + i * interval + rel;
        &image[at..at + 2]
    };
    (1..min_run).all(|i| half(i) == half(i - 1))
}

/// Extend a confirmed run one record at a time; returns the first
/// offset that no longer matches.
pub fn table_end(image: &[u8], start: usize, version: VxVersion) -> usize {
    let interval = version.record_interval();
    let mut end = start;
    while matches_at(image, end, version) {
        end += interval;
    }
    end
}

/// Find the first run of matching records and its extent.
///
/// An image shorter than one record is malformed; an image with no run
/// is a normal `NotFound`.
pub fn find_symbol_table(
    image: &[u8],
    cfg: &AnalysisConfig,
    deadline: &Deadline,
) -> Result<Outcome<TableRange>> {
    let version = cfg.version;
    let interval = version.record_interval();
    if image.len() < interval {
        return Err(VxHunterError::malformed(format!(
            "image is {} bytes, shorter than one {}-byte record",
            image.len(),
            interval
        )));
    }

    let span = interval.saturating_mul(cfg.min_table_run);
    if image.len() < span {
        debug!(
            len = image.len(),
            span, "image too small to hold a symbol table run"
        );
        return Ok(Outcome::NotFound);
    }
    // inclusive upper bound for a run start
    let last = image.len() - span;

    let start = if cfg.parallel_scan {
        find_start_parallel(image, version, cfg.min_table_run, last, deadline)?
    } else {
        find_start_sequential(image, version, cfg.min_table_run, last, deadline)?
    };

    match start {
        Some(start) => {
            let end = table_end(image, start, version);
            info!(
                start = %format!("{:#x}", start),
                end = %format!("{:#x}", end),
                records = (end - start) / interval,
                "found symbol table"
            );
            Ok(Outcome::Found(TableRange::new(start, end)))
        }
        None => {
            warn!("didn't find symbol table in this image");
            Ok(Outcome::NotFound)
        }
    }
}

fn find_start_sequential(
    image: &[u8],
    version: VxVersion,
    min_run: usize,
    last: usize,
    deadline: &Deadline,
) -> Result<Option<usize>> {
    let mut timeout = deadline.iterations("symbol_table_scan");
    for offset in 0..=last {
        crate::check_timeout!(timeout);
        if is_table_start(image, offset, version, min_run) {
            return Ok(Some(offset));
        }
    }
    Ok(None)
}

// Blocks are searched speculatively, but `find_first` keeps the result of
// the lowest block that produced one, so the reported table is the same
// as the sequential scan's.
fn find_start_parallel(
    image: &[u8],
    version: VxVersion,
    min_run: usize,
    last: usize,
    deadline: &Deadline,
) -> Result<Option<usize>> {
    let candidates = last + 1;
    let blocks: Vec<(usize, usize)> = (0..candidates)
        .step_by(SCAN_BLOCK)
        .map(|s| (s, (s + SCAN_BLOCK).min(candidates)))
        .collect();
    debug!(blocks = blocks.len(), "parallel symbol table scan");

    let deadline = *deadline;
    let first = blocks
        .par_iter()
        .map(|&(s, e)| scan_block(image, version, min_run, s, e, &deadline))
        .find_first(|r| !matches!(r, Ok(None)));

    first.unwrap_or(Ok(None))
}

fn scan_block(
    image: &[u8],
    version: VxVersion,
    min_run: usize,
    start: usize,
    end: usize,
    deadline: &Deadline,
) -> Result<Option<usize>> {
    let mut timeout = deadline
        .iterations("symbol_table_scan")
        .with_check_interval(DEADLINE_STRIDE);
    for offset in start..end {
        crate::check_timeout!(timeout);
        if is_table_start(image, offset, version, min_run) {
            return Ok(Some(offset));
        }
    }
    Ok(None)
}
