//! File helpers for generated artifacts.
//!
//! Write failures are logged and reported as `false`; they never abort a run.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::error;

/// How [`save_file`] opens its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create or truncate.
    Truncate,
    /// Create or append.
    Append,
}

/// Returns `true` if `name` exists inside `directory`.
#[must_use]
pub fn file_exists(name: &str, directory: &Path) -> bool {
    directory.join(name).exists()
}

/// Writes `content` to `path`.
///
/// Returns `false` (after logging the error) if the file cannot be opened or written.
pub fn save_file(content: &str, path: &Path, mode: WriteMode) -> bool {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Truncate => options.write(true).truncate(true),
        WriteMode::Append => options.append(true),
    };

    let result = options
        .open(path)
        .and_then(|mut file| file.write_all(content.as_bytes()));

    match result {
        Ok(()) => true,
        Err(e) => {
            error!(
                path = %path.display(),
                mode = ?mode,
                error = %e,
                "Could not write file"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn truncate_then_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        assert!(save_file("one", &path, WriteMode::Truncate));
        assert!(save_file("two", &path, WriteMode::Append));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "onetwo");

        assert!(save_file("three", &path, WriteMode::Truncate));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "three");
    }

    #[test]
    fn existence_check() {
        let dir = tempdir().unwrap();
        assert!(!file_exists("a.kicad_mod", dir.path()));
        std::fs::write(dir.path().join("a.kicad_mod"), "").unwrap();
        assert!(file_exists("a.kicad_mod", dir.path()));
    }

    #[test]
    fn write_into_missing_directory_fails_softly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(!save_file("x", &path, WriteMode::Truncate));
    }
}
