//! Single-trial EMD: repeated sifting into IMFs and a residual.

use tracing::trace;

use crate::config::StoppingCriteria;
use crate::error::EmdError;
use crate::sift::{SiftReport, Sifter};

/// Returns the natural number of output rows (IMFs plus residual) for a
/// signal of length `n`.
///
/// `0` for an empty signal, `1` for lengths 1 to 3, and `floor(log2(n))`
/// otherwise.
///
/// # Example
///
/// ```
/// use sift_emd::num_imfs;
///
/// assert_eq!(num_imfs(0), 0);
/// assert_eq!(num_imfs(5), 2);
/// assert_eq!(num_imfs(10), 3);
/// assert_eq!(num_imfs(16), 4);
/// ```
pub fn num_imfs(n: usize) -> usize {
    if n == 0 { 0 } else { (n.ilog2() as usize).max(1) }
}

/// Like [`num_imfs`] for a signed length.
///
/// # Errors
///
/// Returns [`EmdError::NegativeLength`] if `n < 0`.
pub fn try_num_imfs(n: i64) -> Result<usize, EmdError> {
    usize::try_from(n)
        .map(num_imfs)
        .map_err(|_| EmdError::NegativeLength { len: n })
}

/// Reusable workspace for decomposing signals of one length.
///
/// Each worker thread owns its own engine.
#[derive(Debug, Clone)]
pub(crate) struct EmdEngine {
    sifter: Sifter,
    residual: Vec<f64>,
}

impl EmdEngine {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            sifter: Sifter::new(n),
            residual: Vec::with_capacity(n),
        }
    }

    /// Decomposes `input` into `m` rows written row-major into `out`.
    ///
    /// `out` must hold `m * input.len()` values and `m >= 1`. Returns one
    /// report per extracted IMF.
    pub(crate) fn decompose_into(
        &mut self,
        input: &[f64],
        m: usize,
        criteria: StoppingCriteria,
        out: &mut [f64],
    ) -> Result<Vec<SiftReport>, EmdError> {
        let n = input.len();
        debug_assert!(m >= 1);
        debug_assert_eq!(out.len(), m * n);

        self.residual.clear();
        self.residual.extend_from_slice(input);
        let mut reports = Vec::with_capacity(m - 1);

        for (k, row) in out.chunks_exact_mut(n.max(1)).take(m - 1).enumerate() {
            row.copy_from_slice(&self.residual);
            let report = self.sifter.sift(row, criteria)?;
            trace!(
                imf = k + 1,
                siftings = report.siftings,
                outcome = ?report.outcome,
                "IMF extracted"
            );
            for (r, &v) in self.residual.iter_mut().zip(row.iter()) {
                *r -= v;
            }
            reports.push(report);
        }
        out[(m - 1) * n..].copy_from_slice(&self.residual);
        Ok(reports)
    }

    /// Extracts only the first IMF of `input` into `out`.
    pub(crate) fn first_imf(
        &mut self,
        input: &[f64],
        criteria: StoppingCriteria,
        out: &mut [f64],
    ) -> Result<SiftReport, EmdError> {
        out.copy_from_slice(input);
        self.sifter.sift(out, criteria)
    }
}
