//! Anchor lookup: one in-image occurrence of a well-known function name.

use memchr::memmem;
use tracing::{debug, info};

/// Position of a key function name inside the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Offset of the first byte of the name
    pub offset: usize,
    pub name: String,
}

/// Find the first `\0<name>\0` occurrence, trying `names` in order.
pub fn find_anchor<S: AsRef<str>>(image: &[u8], names: &[S]) -> Option<Anchor> {
    for name in names {
        let name = name.as_ref();
        if name.is_empty() {
            continue;
        }
        let mut needle = Vec::with_capacity(name.len() + 2);
        needle.push(0);
        needle.extend_from_slice(name.as_bytes());
        needle.push(0);

        if let Some(pos) = memmem::find(image, &needle) {
            info!(name, offset = %format!("{:#x}", pos + 1), "found key function name");
            return Some(Anchor {
                offset: pos + 1,
                name: name.to_string(),
            });
        }
        debug!(name, "key function name not present");
    }
    info!("This firmware didn't contain any key function name");
    None
}
