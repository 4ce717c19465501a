//! Directions output file: one formatted direction per line.

use std::path::Path;

use tracing::info;

use crate::atomic::write_atomic;
use crate::error::IoError;

/// Writes one line per direction, replacing any previous file.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be written.
pub fn write_directions<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<(), IoError> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), n = lines.len(), "directions written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_per_direction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catDirections.txt");
        write_directions(&path, &["(1 0 0.000000)", "(0 -1 0.000000)"]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "(1 0 0.000000)\n(0 -1 0.000000)\n"
        );
    }

    #[test]
    fn empty_list_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catDirections.txt");
        write_directions::<String>(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
