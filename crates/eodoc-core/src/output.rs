use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{EodocError, Result};

/// Create `dir` and its parents. Existing directories are not an error.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| EodocError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write `contents` to `path`, creating parent directories.
///
/// Atomic: write to a temp file in the same directory, then rename, so a
/// failed run never leaves a half-written page behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    ensure_dir(dir)?;

    let write_err = |source: std::io::Error| EodocError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
