//! Whole-file writes that never leave a partial file behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::IoError;

/// Writes `contents` to a temporary file in the target's directory, then
/// renames it over `path`.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), IoError> {
    let to_io_err = |source| IoError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(to_io_err)?;
    tmp.write_all(contents).map_err(to_io_err)?;
    tmp.as_file().sync_all().map_err(to_io_err)?;
    tmp.persist(path).map_err(|e| to_io_err(e.error))?;
    Ok(())
}
