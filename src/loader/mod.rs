//! Load-address recovery: a cheap probe of known bases and the full
//! name-length correlation it falls back to.

pub mod probe;
pub mod resolve;

pub use probe::{check_load_address, probe_known_addresses};
pub use resolve::resolve_load_address;
