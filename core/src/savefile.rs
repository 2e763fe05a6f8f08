//! Save, BIOS, and companion-log path derivation.
//!
//! All of these locations hang off the loaded ROM's identity. The save
//! file path is never stored independently: it is re-derived from the
//! base save-data directory plus the ROM stem whenever the ROM changes,
//! so a stale path can never outlive a cartridge swap.

use kiln_shared::fs::{self, FileError};
use kiln_shared::path::{join_path, split_path};
use tracing::{info, warn};

/// Extension used for battery-backed save data.
const SAVE_EXT: &str = "sav";

/// Path configuration derived from the base save-data directory and the
/// currently loaded ROM.
#[derive(Debug, Clone, Default)]
pub struct SavePaths {
    /// Explicit save-data directory; when `None`, saves land beside the
    /// ROM.
    base_dir: Option<String>,
    rom_path: String,
    save_path: String,
}

impl SavePaths {
    pub fn new(base_dir: Option<String>) -> Self {
        Self {
            base_dir,
            rom_path: String::new(),
            save_path: String::new(),
        }
    }

    /// Re-derive all paths for a newly loaded ROM.
    pub fn set_rom(&mut self, rom_path: &str) {
        let parts = split_path(rom_path);
        let base = self.base_dir.as_deref().unwrap_or(&parts.dir);
        self.rom_path = rom_path.to_string();
        self.save_path = join_path(base, &parts.stem, Some(SAVE_EXT));
    }

    pub fn rom_path(&self) -> &str {
        &self.rom_path
    }

    /// Save-file path for the loaded ROM; empty until a ROM is set.
    pub fn save_path(&self) -> &str {
        &self.save_path
    }

    /// Resolve a BIOS image that sits in the same directory as the ROM.
    pub fn bios_path(&self, file_name: &str) -> String {
        let parts = split_path(&self.rom_path);
        join_path(&parts.dir, file_name, None)
    }

    /// Companion file beside the ROM sharing its stem, e.g. a trace log:
    /// `roms/tetris.gb` with suffix `"log"` gives `roms/tetris.log`.
    pub fn companion_path(&self, suffix: &str) -> String {
        let parts = split_path(&self.rom_path);
        join_path(&parts.dir, &parts.stem, Some(suffix))
    }

    /// Load a fixed-size BIOS image from beside the ROM.
    ///
    /// Failure is non-fatal to the caller: the machine stays in
    /// Reset/Pause until the asset is supplied.
    pub fn load_bios(&self, name: &str, file_name: &str, expected_size: u64) -> Result<Vec<u8>, FileError> {
        let path = self.bios_path(file_name);
        match fs::read_file_exact(path.as_ref(), expected_size) {
            Ok(data) => {
                info!("Loaded {} from {}", name, path);
                Ok(data)
            }
            Err(e) => {
                warn!("Could not load {}: {}", name, e);
                Err(e)
            }
        }
    }

    /// Persist save data at the derived save path.
    pub fn write_save(&self, data: &[u8]) -> Result<(), FileError> {
        fs::write_file(self.save_path.as_ref(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_path_re_derives_from_rom_identity() {
        let mut paths = SavePaths::new(None);
        paths.set_rom("roms/tetris.gb");
        assert_eq!(paths.save_path(), "roms/tetris.sav");

        // Swapping cartridges must move the save path with it.
        paths.set_rom("other/kirby.gbc");
        assert_eq!(paths.save_path(), "other/kirby.sav");
    }

    #[test]
    fn explicit_base_dir_overrides_the_rom_dir() {
        let mut paths = SavePaths::new(Some("saves".to_string()));
        paths.set_rom("roms/tetris.gb");
        assert_eq!(paths.save_path(), "saves/tetris.sav");
    }

    #[test]
    fn rom_without_directory_gets_no_leading_separator() {
        let mut paths = SavePaths::new(None);
        paths.set_rom("tetris.gb");
        assert_eq!(paths.save_path(), "tetris.sav");
    }

    #[test]
    fn bios_resolves_beside_the_rom() {
        let mut paths = SavePaths::new(Some("saves".to_string()));
        paths.set_rom("roms/game.gba");
        assert_eq!(paths.bios_path("gba_bios.bin"), "roms/gba_bios.bin");
    }

    #[test]
    fn companion_path_shares_the_rom_stem() {
        let mut paths = SavePaths::new(None);
        paths.set_rom("roms/game.gb");
        assert_eq!(paths.companion_path("log"), "roms/game.log");
        assert_eq!(paths.companion_path(".txt"), "roms/game.txt");
    }

    #[test]
    fn bios_size_mismatch_is_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let rom = dir.path().join("game.gba");
        let bios = dir.path().join("gba_bios.bin");
        std::fs::write(&rom, b"rom").unwrap();
        std::fs::write(&bios, [0u8; 16]).unwrap();

        let mut paths = SavePaths::new(None);
        paths.set_rom(rom.to_str().unwrap());
        match paths.load_bios("GBA BIOS", "gba_bios.bin", 16384) {
            Err(FileError::SizeMismatch { expected, got, .. }) => {
                assert_eq!(expected, 16384);
                assert_eq!(got, 16);
            }
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn write_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let rom = dir.path().join("game.gb");
        std::fs::write(&rom, b"rom").unwrap();

        let mut paths = SavePaths::new(None);
        paths.set_rom(rom.to_str().unwrap());
        paths.write_save(&[9, 8, 7]).unwrap();

        let saved = std::fs::read(dir.path().join("game.sav")).unwrap();
        assert_eq!(saved, vec![9, 8, 7]);
    }
}
