//! String-table bounds, grown outward from an anchor name.
//!
//! Names are accepted while they pass [`is_function_name`] and sit at most
//! `max_gap` null bytes apart. The walk runs backward from the anchor, then
//! forward through it. Each direction stops at the first gap or bad name;
//! stopping with fewer than `required` accepted names fails the whole
//! locate.

use tracing::{debug, info, warn};

use crate::core::{Outcome, TableRange};
use crate::strings::predicates::{is_function_name, next_string, prev_string, StringSpan};

/// Tunables for [`locate_string_table`].
#[derive(Debug, Clone, Copy)]
pub struct LocateParams {
    /// Names that must be accumulated before a direction may stop
    pub required: usize,
    pub max_name_len: usize,
    pub max_gap: usize,
}

/// Bounds of a located string table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTable {
    /// `[first name start, last name end)`
    pub range: TableRange,
    /// Accepted names sorted by address
    pub names: Vec<StringSpan>,
}

/// Bound the string table around the name starting at `anchor`.
pub fn locate_string_table(
    image: &[u8],
    anchor: usize,
    params: &LocateParams,
) -> Outcome<LocatedTable> {
    let mut names: Vec<StringSpan> = Vec::new();

    // backward, starting with the name before the anchor
    let mut cursor = anchor.checked_sub(1);
    let mut last_start: Option<usize> = None;
    while let Some(pos) = cursor {
        let Some(span) = prev_string(image, pos) else {
            break;
        };
        let gap_ok = last_start.map_or(true, |ls| ls - span.end <= params.max_gap);
        if !gap_ok || !accept(image, span, &mut names, params) {
            if !enough(&names, params, "backward") {
                return Outcome::NotFound;
            }
            break;
        }
        last_start = Some(span.start);
        cursor = span.start.checked_sub(1);
    }

    // forward, starting with the anchor itself
    let mut cursor = anchor;
    let mut last_end: Option<usize> = None;
    while let Some(span) = next_string(image, cursor) {
        let gap_ok = last_end.map_or(true, |le| span.start - le <= params.max_gap);
        if !gap_ok || !accept(image, span, &mut names, params) {
            if !enough(&names, params, "forward") {
                return Outcome::NotFound;
            }
            break;
        }
        last_end = Some(span.end);
        cursor = span.end;
    }

    // the walk may also end at an image boundary without a stop
    if !enough(&names, params, "image boundary") {
        return Outcome::NotFound;
    }

    names.sort_by_key(|s| s.start);
    let (Some(first), Some(last)) = (names.first(), names.last()) else {
        return Outcome::NotFound;
    };
    let range = TableRange::new(first.start, last.end);
    info!(
        start = %format!("{:#x}", range.start),
        end = %format!("{:#x}", range.end),
        names = names.len(),
        "found a string table"
    );
    Outcome::Found(LocatedTable { range, names })
}

fn accept(
    image: &[u8],
    span: StringSpan,
    names: &mut Vec<StringSpan>,
    params: &LocateParams,
) -> bool {
    if is_function_name(span.bytes(image), params.max_name_len) {
        names.push(span);
        true
    } else {
        debug!(start = span.start, "not a function name");
        false
    }
}

fn enough(names: &[StringSpan], params: &LocateParams, direction: &str) -> bool {
    if names.len() >= params.required {
        return true;
    }
    warn!(
        found = names.len(),
        required = params.required,
        direction,
        "Can't find any string table with key index"
    );
    false
}
