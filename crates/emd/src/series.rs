//! Validated signal wrapper.

use crate::error::EmdError;

/// A validated one-dimensional signal of finite `f64` values.
///
/// Any length is accepted, including empty and single-sample signals; those
/// decompose trivially into themselves.
///
/// # Example
///
/// ```
/// use sift_emd::Signal;
///
/// let signal = Signal::new(vec![1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(signal.len(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Signal {
    data: Vec<f64>,
}

impl Signal {
    /// Creates a new `Signal` after validating the data.
    ///
    /// # Errors
    ///
    /// Returns [`EmdError::NonFiniteData`] if any element is NaN or infinite.
    pub fn new(data: Vec<f64>) -> Result<Self, EmdError> {
        if !data.iter().all(|v| v.is_finite()) {
            return Err(EmdError::NonFiniteData);
        }
        Ok(Self { data })
    }

    /// Creates a `Signal` by copying a slice.
    ///
    /// # Errors
    ///
    /// Returns [`EmdError::NonFiniteData`] if any element is NaN or infinite.
    pub fn from_slice(data: &[f64]) -> Result<Self, EmdError> {
        Self::new(data.to_vec())
    }

    /// Returns the signal as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the signal has no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the signal and returns the underlying samples.
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

impl TryFrom<Vec<f64>> for Signal {
    type Error = EmdError;

    fn try_from(data: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid_signal() {
        let signal = Signal::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(signal.len(), 3);
        assert!(!signal.is_empty());
        assert_eq!(signal.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn new_empty_allowed() {
        let signal = Signal::new(vec![]).unwrap();
        assert!(signal.is_empty());
    }

    #[test]
    fn new_nan_rejected() {
        let err = Signal::new(vec![1.0, f64::NAN, 3.0]).unwrap_err();
        assert_eq!(err, EmdError::NonFiniteData);
    }

    #[test]
    fn new_infinity_rejected() {
        let err = Signal::from_slice(&[f64::NEG_INFINITY, 1.0]).unwrap_err();
        assert_eq!(err, EmdError::NonFiniteData);
    }

    #[test]
    fn try_from_and_into_inner() {
        let signal = Signal::try_from(vec![4.0, 5.0]).unwrap();
        let slice: &[f64] = signal.as_ref();
        assert_eq!(slice, &[4.0, 5.0]);
        assert_eq!(signal.into_inner(), vec![4.0, 5.0]);
    }

    #[test]
    fn signal_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<Signal>();
    }
}
