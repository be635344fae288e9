//! Bounded firmware loading.
//!
//! Firmware files are memory-mapped and copied once into an immutable
//! [`FirmwareImage`]. A size limit keeps a hostile or mistaken input from
//! exhausting memory before analysis starts.

use bytes::Bytes;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::core::FirmwareImage;
use crate::error::{Result, VxHunterError};

/// Default cap on the firmware file size (256MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Defines the resource limits for firmware loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IOLimits {
    /// The absolute maximum file size that can be opened.
    pub max_file_size: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// A read-only memory map of a firmware file, checked against `IOLimits`.
pub struct SafeReader {
    path: PathBuf,
    // None when the file size is zero; memmap cannot map empty files.
    mmap: Option<Mmap>,
    file_size: u64,
}

impl SafeReader {
    /// Opens and maps a file.
    ///
    /// Fails with `FileTooLarge` when the file exceeds `limits.max_file_size`.
    pub fn open<P: AsRef<Path>>(path: P, limits: &IOLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = limits.max_file_size,
            "Opening firmware"
        );

        if file_size > limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "File is too large"
            );
            return Err(VxHunterError::FileTooLarge {
                limit: limits.max_file_size,
                found: file_size,
            });
        }

        let mmap = if file_size == 0 {
            None
        } else {
            // Safety: read-only map of a regular file; the data is copied out
            // before the map is dropped.
            Some(unsafe { Mmap::map(&file)? })
        };

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
            file_size,
        })
    }

    pub fn size(&self) -> u64 {
        self.file_size
    }

    /// Copy `len` bytes at `offset`, truncated at end of file.
    pub fn read_at(&self, offset: u64, len: u64) -> Bytes {
        let Some(map) = &self.mmap else {
            return Bytes::new();
        };
        let offset = offset as usize;
        if offset >= map.len() {
            return Bytes::new();
        }
        let end = offset.saturating_add(len as usize).min(map.len());
        trace!(
            path = %self.path.display(),
            offset,
            len = end - offset,
            "Performed read"
        );
        Bytes::copy_from_slice(&map[offset..end])
    }
}

/// Load a whole firmware file into memory.
pub fn load_image<P: AsRef<Path>>(path: P, limits: &IOLimits) -> Result<FirmwareImage> {
    let reader = SafeReader::open(path, limits)?;
    Ok(FirmwareImage::new(reader.read_at(0, reader.size())))
}
