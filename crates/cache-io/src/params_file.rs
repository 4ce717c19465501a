//! Calibrated-parameters file: a JSON array of numbers.

use std::path::Path;

use tracing::info;

use crate::atomic::write_atomic;
use crate::error::IoError;

/// Reads a flat parameter vector.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::MissingParams`] | `path` does not exist |
/// | [`IoError::Io`] | the file cannot be read |
/// | [`IoError::Json`] | the content is not an array of numbers |
pub fn read_params(path: &Path) -> Result<Vec<f64>, IoError> {
    if !path.exists() {
        return Err(IoError::MissingParams {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| IoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Writes a flat parameter vector, replacing any previous file.
///
/// # Errors
///
/// Returns [`IoError::Json`] for non-finite values and [`IoError::Io`] if
/// the file cannot be written.
pub fn write_params(path: &Path, params: &[f64]) -> Result<(), IoError> {
    if let Some(index) = params.iter().position(|v| !v.is_finite()) {
        return Err(IoError::Json {
            path: path.to_path_buf(),
            reason: format!("parameter {index} is not finite"),
        });
    }
    let mut text = serde_json::to_string(params).map_err(|e| IoError::Json {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    text.push('\n');
    write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), n = params.len(), "parameters written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_missing_params() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_params(&dir.path().join("params.json")).unwrap_err();
        assert!(matches!(err, IoError::MissingParams { .. }));
    }

    #[test]
    fn written_values_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let values = vec![1.0, 0.25, -0.7312, 0.0];
        write_params(&path, &values).unwrap();
        assert_eq!(read_params(&path).unwrap(), values);
    }

    #[test]
    fn non_numeric_content_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, "[1.0, \"a\"]").unwrap();
        assert!(matches!(read_params(&path), Err(IoError::Json { .. })));
    }

    #[test]
    fn non_finite_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        assert!(write_params(&path, &[1.0, f64::NAN]).is_err());
        assert!(!path.exists());
    }
}
