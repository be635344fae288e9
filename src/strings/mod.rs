//! String-table recovery.
//!
//! The symbol table only stores absolute name addresses; the names live in
//! a companion table of null-terminated strings. This module finds an
//! anchor name, bounds the table around it, and partitions it into
//! records whose lengths can be correlated against the symbol table.

pub mod anchor;
pub mod decode;
pub mod locate;
pub mod predicates;

pub use anchor::{find_anchor, Anchor};
pub use decode::decode_string_table;
pub use locate::{locate_string_table, LocateParams, LocatedTable};
pub use predicates::{is_function_name, is_printable, next_string, prev_string, StringSpan};
