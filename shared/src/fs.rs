//! Filesystem helpers shared across Kiln runtimes.
//!
//! ROM, BIOS, and save data all arrive as plain byte buffers; callers get
//! typed failures they can report without aborting (a missing BIOS leaves
//! the machine paused, it does not kill the process).

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Maximum file size read into memory. Largest supported cartridge images
/// are well under this.
pub const MAX_ASSET_BYTES: u64 = 64 * 1024 * 1024; // 64 MiB

/// Typed failure for byte-buffer loading and saving.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("{path}: expected {expected} bytes, got {got}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        got: u64,
    },
    #[error("file too large: {path} ({got} bytes, max {max})")]
    TooLarge { path: PathBuf, got: u64, max: u64 },
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path, source: io::Error) -> FileError {
    if source.kind() == io::ErrorKind::NotFound {
        FileError::NotFound(path.to_path_buf())
    } else {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a file into memory with a size cap.
pub fn read_file(path: &Path) -> Result<Vec<u8>, FileError> {
    let metadata = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
    let len = metadata.len();
    if len > MAX_ASSET_BYTES {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            got: len,
            max: MAX_ASSET_BYTES,
        });
    }
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    info!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Read a file that must be exactly `expected` bytes (BIOS images, fixed
/// save formats).
pub fn read_file_exact(path: &Path, expected: u64) -> Result<Vec<u8>, FileError> {
    let metadata = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
    let len = metadata.len();
    if len != expected {
        return Err(FileError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            got: len,
        });
    }
    read_file(path)
}

/// Persist a byte buffer. Serialization format is the caller's concern.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    std::fs::write(path, bytes).map_err(|e| io_err(path, e))?;
    info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
