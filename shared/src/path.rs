//! Path decomposition and joining rules.
//!
//! Save files, BIOS images, and companion logs are all located relative to
//! the loaded ROM, so the split/join rules live here as pure functions.
//! Both `/` and `\` are accepted as directory separators on input; joins
//! always emit `/`.

/// A path decomposed into directory, file stem, and extension.
///
/// All components are owned and may be empty. `dir` carries no trailing
/// separator and `ext` no leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathParts {
    pub dir: String,
    pub stem: String,
    pub ext: String,
}

/// Split a path into (directory, stem, extension).
///
/// The extension starts at the last `.` of the file name; the directory
/// ends at the last separator. A dotless name has an empty extension, a
/// bare file name an empty directory.
pub fn split_path(path: &str) -> PathParts {
    let (dir, name) = match path.rfind(['/', '\\']) {
        Some(sep) => (&path[..sep], &path[sep + 1..]),
        None => ("", path),
    };
    let (stem, ext) = match name.rfind('.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => (name, ""),
    };
    PathParts {
        dir: dir.to_string(),
        stem: stem.to_string(),
        ext: ext.to_string(),
    }
}

/// Join a directory, file stem, and optional extension back into a path.
///
/// A directory separator is inserted only when `dir` is non-empty, and an
/// extension separator only when `ext` does not already start with one.
pub fn join_path(dir: &str, stem: &str, ext: Option<&str>) -> String {
    let sep = if dir.is_empty() { "" } else { "/" };
    match ext {
        Some(ext) => {
            let dot = if ext.starts_with('.') { "" } else { "." };
            format!("{dir}{sep}{stem}{dot}{ext}")
        }
        None => format!("{dir}{sep}{stem}"),
    }
}

/// ASCII case-insensitive extension check (`has_extension("x.GB", "gb")`).
pub fn has_extension(path: &str, ext: &str) -> bool {
    let (path, ext) = (path.as_bytes(), ext.as_bytes());
    path.len() >= ext.len() && path[path.len() - ext.len()..].eq_ignore_ascii_case(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_full_path() {
        let parts = split_path("roms/gb/tetris.gb");
        assert_eq!(parts.dir, "roms/gb");
        assert_eq!(parts.stem, "tetris");
        assert_eq!(parts.ext, "gb");
    }

    #[test]
    fn split_handles_backslashes() {
        let parts = split_path(r"C:\roms\tetris.gbc");
        assert_eq!(parts.dir, r"C:\roms");
        assert_eq!(parts.stem, "tetris");
        assert_eq!(parts.ext, "gbc");
    }

    #[test]
    fn split_bare_name_without_extension() {
        let parts = split_path("gba_bios");
        assert_eq!(parts.dir, "");
        assert_eq!(parts.stem, "gba_bios");
        assert_eq!(parts.ext, "");
    }

    #[test]
    fn split_takes_last_dot() {
        let parts = split_path("dir/save.v2.sav");
        assert_eq!(parts.stem, "save.v2");
        assert_eq!(parts.ext, "sav");
    }

    #[test]
    fn join_skips_separator_for_empty_dir() {
        assert_eq!(join_path("", "tetris", Some("sav")), "tetris.sav");
        assert_eq!(join_path("saves", "tetris", Some("sav")), "saves/tetris.sav");
    }

    #[test]
    fn join_does_not_double_the_dot() {
        assert_eq!(join_path("d", "rom", Some(".log")), "d/rom.log");
        assert_eq!(join_path("d", "rom", Some("log")), "d/rom.log");
    }

    #[test]
    fn join_without_extension() {
        assert_eq!(join_path("d", "gb_bios", None), "d/gb_bios");
    }

    #[test]
    fn split_join_round_trip() {
        let parts = split_path("roms/tetris.gb");
        let joined = join_path(&parts.dir, &parts.stem, Some(&parts.ext));
        assert_eq!(joined, "roms/tetris.gb");
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_extension("TETRIS.GB", "gb"));
        assert!(has_extension("tetris.gb", ".GB"));
        assert!(!has_extension("tetris.gba", ".gb"));
        assert!(!has_extension("gb", "tetris.gb"));
    }
}
