//! File helpers for reading sources and writing compiled output.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Read a source file, replacing invalid UTF-8 sequences with the replacement character.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write compiled output, creating parent directories as needed.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let wrap = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    atomic_write(path, contents.as_bytes()).map_err(wrap)
}

/// Atomically write bytes to a file by writing to a temp file then renaming.
///
/// The file will either have the old contents or the new contents, never a
/// partial write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));

    // Same directory, so the rename stays on one filesystem
    let mut temp_path = parent.to_path_buf();
    temp_path.push(format!(
        ".{}.tmp.{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file"),
        std::process::id()
    ));

    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    match fs::rename(&temp_path, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            // On Windows, rename can fail if target exists.
            if cfg!(windows) {
                fs::copy(&temp_path, path)?;
                let _ = fs::remove_file(&temp_path);
                Ok(())
            } else {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_source_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x3c, 0x70, 0x2f, 0x3e, 0x80]).unwrap();
        file.flush().unwrap();

        let content = read_source(file.path()).unwrap();
        assert!(content.starts_with("<p/>"));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_source_missing() {
        let dir = tempdir().unwrap();
        let err = read_source(&dir.path().join("missing.moon")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_write_output_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dist/views/app.js");

        write_output(&path, "a").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a");

        write_output(&path, "b").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "b");
    }

    #[test]
    fn test_atomic_write_no_temp_left_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.js");

        atomic_write(&path, b"content").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].as_ref().unwrap().file_name().to_str().unwrap(),
            "app.js"
        );
    }
}
