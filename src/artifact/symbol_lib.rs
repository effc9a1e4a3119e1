//! Shared KiCad symbol library file.
//!
//! The library is written in three steps: [`SymbolLibrary::begin`] truncates the file
//! and writes the preamble, [`SymbolLibrary::append`] adds one symbol block at a time,
//! and [`SymbolLibrary::finish`] writes the closing token. `finish` consumes the
//! library so the file is closed exactly once.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::artifact::files::{save_file, WriteMode};

/// S-expression format version written to the library header.
pub const SYMBOL_LIB_VERSION: u32 = 20_231_120;

/// Editor version the generated library targets.
pub const GENERATOR_VERSION: &str = "8.0";

/// Token that closes the library.
pub const CLOSING_TOKEN: &str = ")\n";

/// Library header naming `generator`.
#[must_use]
pub fn preamble(generator: &str) -> String {
    format!(
        "(kicad_symbol_lib\n\t(version {SYMBOL_LIB_VERSION})\n\t(generator \"{generator}\")\n\t(generator_version \"{GENERATOR_VERSION}\")\n"
    )
}

/// An open symbol library.
#[derive(Debug)]
pub struct SymbolLibrary {
    path: PathBuf,
    entries: usize,
}

impl SymbolLibrary {
    /// Truncates `path` and writes `preamble`.
    ///
    /// Returns `None` (the failure is logged) if the file cannot be written.
    #[must_use]
    pub fn begin(path: &Path, preamble: &str) -> Option<Self> {
        if !save_file(preamble, path, WriteMode::Truncate) {
            return None;
        }
        debug!(path = %path.display(), "Symbol library started");
        Some(Self {
            path: path.to_path_buf(),
            entries: 0,
        })
    }

    /// Appends one symbol block. Empty blocks are ignored.
    ///
    /// Returns `true` if the block was written.
    pub fn append(&mut self, block: &str) -> bool {
        if block.is_empty() {
            return false;
        }
        let written = save_file(block, &self.path, WriteMode::Append);
        if written {
            self.entries += 1;
        }
        written
    }

    /// Number of symbol blocks written so far.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Library path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the closing token.
    ///
    /// Returns the number of symbols in the library, or `None` if the closing token
    /// could not be written.
    pub fn finish(self) -> Option<usize> {
        if save_file(CLOSING_TOKEN, &self.path, WriteMode::Append) {
            info!(
                path = %self.path.display(),
                symbols = self.entries,
                "Symbol library closed"
            );
            Some(self.entries)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preamble_format() {
        assert_eq!(
            preamble("gen"),
            "(kicad_symbol_lib\n\t(version 20231120)\n\t(generator \"gen\")\n\t(generator_version \"8.0\")\n"
        );
    }

    #[test]
    fn begin_append_finish() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lib.kicad_sym");
        std::fs::write(&path, "stale content").unwrap();

        let mut library = SymbolLibrary::begin(&path, "HEAD\n").unwrap();
        assert!(library.append("\t(symbol \"A\")\n"));
        assert!(!library.append(""));
        assert!(library.append("\t(symbol \"B\")\n"));
        assert_eq!(library.entries(), 2);
        assert_eq!(library.finish(), Some(2));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "HEAD\n\t(symbol \"A\")\n\t(symbol \"B\")\n)\n");
    }

    #[test]
    fn begin_fails_for_unwritable_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no").join("lib.kicad_sym");
        assert!(SymbolLibrary::begin(&path, "HEAD\n").is_none());
    }
}
