//! Kiln Shared - helpers used across the Kiln emulator runtime
//!
//! Filesystem access with typed failures and the path split/join rules
//! used to derive save, BIOS, and log locations from a ROM path.

pub mod fs;
pub mod path;

pub use fs::{FileError, MAX_ASSET_BYTES, read_file, read_file_exact, write_file};
pub use path::{PathParts, has_extension, join_path, split_path};
