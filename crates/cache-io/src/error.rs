//! Error types for catdist-io.

use std::path::PathBuf;

use catdist_codec::CodecError;

/// Error type for all fallible operations in the catdist-io crate.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when neighbor ranking is requested before calibration.
    #[error("calibrated parameters file not found: {}", path.display())]
    MissingParams {
        /// Expected location of the parameters file.
        path: PathBuf,
    },

    /// Wraps an operating-system I/O failure.
    #[error("{}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Returned when a header line lacks its `label:` marker or the file
    /// ends before all header lines were read.
    #[error("line {line}: missing '{section}' section")]
    MissingSection {
        /// 1-based line number.
        line: usize,
        /// Expected section.
        section: &'static str,
    },

    /// Returned when a cache line cannot be parsed.
    #[error("line {line} ({section}): {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Section or record kind being parsed.
        section: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when one or more consistency checks on the cache header fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when both frame points are undefined.
    #[error("no current point: feasible and infeasible frame points are undefined")]
    NoCurrentPoint,

    /// Returned when the parameters file is not a JSON array of numbers.
    #[error("invalid parameters file {}: {reason}", path.display())]
    Json {
        /// Path to the parameters file.
        path: PathBuf,
        /// Description of the decoding failure.
        reason: String,
    },

    /// Wraps a variable specification failure.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/cachePts.txt"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/cachePts.txt");
    }

    #[test]
    fn display_missing_params() {
        let err = IoError::MissingParams {
            path: PathBuf::from("params.json"),
        };
        assert_eq!(
            err.to_string(),
            "calibrated parameters file not found: params.json"
        );
    }

    #[test]
    fn display_parse() {
        let err = IoError::Parse {
            line: 3,
            section: "lower bounds",
            reason: "invalid number 'x'".to_string(),
        };
        assert_eq!(err.to_string(), "line 3 (lower bounds): invalid number 'x'");
    }

    #[test]
    fn display_missing_section() {
        let err = IoError::MissingSection {
            line: 9,
            section: "neighbor count",
        };
        assert_eq!(err.to_string(), "line 9: missing 'neighbor count' section");
    }

    #[test]
    fn display_validation() {
        let err = IoError::Validation {
            count: 2,
            details: "a; b".to_string(),
        };
        assert_eq!(err.to_string(), "2 validation error(s): a; b");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<IoError>();
    }
}
