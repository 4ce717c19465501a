//! Accumulated validation of cache header consistency.

use crate::error::IoError;

/// Gathers validation messages and turns them into one
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Records a message when `got != expected`.
    pub(crate) fn check_len(&mut self, what: &str, expected: usize, got: usize) {
        if expected != got {
            self.push(format!("{what}: expected {expected} entries, got {got}"));
        }
    }

    /// `Ok(())` if nothing was recorded, otherwise every message joined with
    /// `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}
