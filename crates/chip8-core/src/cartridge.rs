//! Loading and saving ROM files.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::error::CResult;
use crate::types::C8Byte;

const ROM_MAX_SIZE: usize = 4096 - 0x200;
const EMPTY_ROM_TITLE: &str = "<EMPTY>";

/// A ROM's raw bytes plus a display title derived from its file name.
pub struct Cartridge {
    title: String,
    data: Vec<C8Byte>,
}

impl Cartridge {
    /// An empty cartridge, useful as a placeholder before a ROM is loaded.
    pub fn new_empty() -> Self {
        Self {
            title: String::from(EMPTY_ROM_TITLE),
            data: vec![],
        }
    }

    /// Load a ROM from a file path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> CResult<Cartridge> {
        let mut file = File::open(path.as_ref())?;
        let mut data = Vec::with_capacity(ROM_MAX_SIZE);
        file.read_to_end(&mut data)?;

        Ok(Self {
            title: Self::title_from_path(path.as_ref()),
            data,
        })
    }

    /// Wrap an in-memory byte buffer as a cartridge, for tests and the
    /// assembler's output.
    pub fn load_from_bytes(title: &str, bytes: &[C8Byte]) -> Cartridge {
        Self {
            title: title.to_string(),
            data: bytes.to_vec(),
        }
    }

    /// Write this cartridge's bytes to a file path.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> CResult {
        let mut file = File::create(path)?;
        file.write_all(&self.data)?;
        Ok(())
    }

    fn title_from_path(path: &Path) -> String {
        match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_uppercase().replace('_', " "),
            None => String::from(EMPTY_ROM_TITLE),
        }
    }

    /// Display title, derived from the file stem.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw ROM bytes.
    pub fn data(&self) -> &[C8Byte] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_bytes() {
        let cartridge = Cartridge::load_from_bytes("TEST", &[0x00, 0xE0]);
        assert_eq!(cartridge.data(), &[0x00, 0xE0]);
        assert_eq!(cartridge.title(), "TEST");
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(
            Cartridge::title_from_path(Path::new("PONG.ch8")),
            "PONG"
        );
        assert_eq!(
            Cartridge::title_from_path(Path::new("games/space_invaders.ch8")),
            "SPACE INVADERS"
        );
        assert_eq!(Cartridge::title_from_path(Path::new("")), EMPTY_ROM_TITLE);
    }

    #[test]
    fn test_new_empty() {
        let cartridge = Cartridge::new_empty();
        assert!(cartridge.data().is_empty());
        assert_eq!(cartridge.title(), EMPTY_ROM_TITLE);
    }
}
