//! Accumulated validation of signal values and IMF tables.
//!
//! [`ValidationCollector`] gathers every problem found in one pass and turns
//! them into a single [`IoError::Validation`], so a user fixing an input file
//! sees all offending rows at once.

use crate::error::IoError;

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins all messages with `"; "`.
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

/// Check that every value is finite.
///
/// Records one message per offending value, with 1-based row numbers.
pub(crate) fn validate_finite(values: &[f64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            c.push(format!("non-finite value at row {}: {v}", i + 1));
        }
    }
    c
}

/// Check that a table to be written has at least one row of components.
pub(crate) fn validate_table_shape(n_rows: usize) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    if n_rows == 0 {
        c.push("IMF table has no rows");
    }
    c
}
