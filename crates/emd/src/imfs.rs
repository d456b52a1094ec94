//! Decomposition result: IMF rows plus the residual.

use crate::sift::SiftReport;

/// The rows produced by a decomposition.
///
/// Stored row-major as `n_rows` rows of `len` samples. Rows `0..n_rows - 1`
/// are the IMFs from finest to coarsest; the last row is the residual. The
/// column sums reproduce the input up to floating-point accumulation error.
#[derive(Clone, Debug, PartialEq)]
pub struct Imfs {
    data: Vec<f64>,
    n_rows: usize,
    len: usize,
    sift_reports: Vec<SiftReport>,
}

impl Imfs {
    /// Creates a new `Imfs` (crate-internal constructor).
    pub(crate) fn new(data: Vec<f64>, n_rows: usize, len: usize) -> Self {
        debug_assert_eq!(data.len(), n_rows * len);
        Self {
            data,
            n_rows,
            len,
            sift_reports: Vec::new(),
        }
    }

    pub(crate) fn with_sift_reports(mut self, reports: Vec<SiftReport>) -> Self {
        self.sift_reports = reports;
        self
    }

    /// Returns the number of rows (IMFs plus residual).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of IMF rows, excluding the residual.
    pub fn n_imfs(&self) -> usize {
        self.n_rows.saturating_sub(1)
    }

    /// Returns the number of samples per row.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the rows hold no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns row `i` (IMFs first, residual last), or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.n_rows).then(|| &self.data[i * self.len..(i + 1) * self.len])
    }

    /// Returns IMF `i` (0-indexed, finest first), or `None` if out of range.
    ///
    /// The residual is not an IMF; use [`residual`](Self::residual).
    pub fn imf(&self, i: usize) -> Option<&[f64]> {
        if i < self.n_imfs() { self.row(i) } else { None }
    }

    /// Returns the residual (last row).
    pub fn residual(&self) -> &[f64] {
        match self.n_rows {
            0 => &[],
            n => &self.data[(n - 1) * self.len..],
        }
    }

    /// Returns an iterator over all rows, residual last.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_rows).map(move |i| &self.data[i * self.len..(i + 1) * self.len])
    }

    /// Returns the row-major backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the result and returns the row-major buffer.
    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }

    /// Copies the rows into one vector per row.
    pub fn to_matrix(&self) -> Vec<Vec<f64>> {
        self.rows().map(|r| r.to_vec()).collect()
    }

    /// Returns the column sums, which reproduce the decomposed signal.
    pub fn reconstruct(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.len];
        for row in self.rows() {
            for (o, &v) in out.iter_mut().zip(row) {
                *o += v;
            }
        }
        out
    }

    /// Returns the maximum absolute difference between `input` and the
    /// reconstruction.
    ///
    /// Returns `f64::INFINITY` if the lengths differ.
    pub fn reconstruction_error(&self, input: &[f64]) -> f64 {
        if input.len() != self.len {
            return f64::INFINITY;
        }
        self.reconstruct()
            .iter()
            .zip(input)
            .map(|(r, x)| (r - x).abs())
            .fold(0.0, f64::max)
    }

    /// Returns each row's sample variance as a fraction of the variance of
    /// the reconstructed signal (N-1 denominator).
    ///
    /// All fractions are `0.0` when the signal is constant.
    pub fn variance_fractions(&self) -> Vec<f64> {
        let total = variance(&self.reconstruct());
        self.rows()
            .map(|r| if total > 0.0 { variance(r) / total } else { 0.0 })
            .collect()
    }

    /// Returns the per-IMF sifting reports.
    ///
    /// Only single-trial EMD records these; ensemble results return an empty
    /// slice.
    pub fn sift_reports(&self) -> &[SiftReport] {
        &self.sift_reports
    }
}

/// Computes sample variance (N-1 denominator) of a data slice.
pub(crate) fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let mean = data.iter().sum::<f64>() / n as f64;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1) as f64
}

/// Computes sample standard deviation (N-1 denominator).
pub(crate) fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sift::SiftOutcome;
    use approx::assert_abs_diff_eq;

    fn sample() -> Imfs {
        // two IMFs + residual, length 3
        Imfs::new(vec![1.0, -1.0, 1.0, 0.5, 0.0, -0.5, 2.0, 2.0, 2.0], 3, 3)
    }

    #[test]
    fn accessors() {
        let imfs = sample();
        assert_eq!(imfs.n_rows(), 3);
        assert_eq!(imfs.n_imfs(), 2);
        assert_eq!(imfs.len(), 3);
        assert!(!imfs.is_empty());
        assert_eq!(imfs.imf(0).unwrap(), &[1.0, -1.0, 1.0]);
        assert_eq!(imfs.imf(1).unwrap(), &[0.5, 0.0, -0.5]);
        assert!(imfs.imf(2).is_none());
        assert_eq!(imfs.row(2).unwrap(), &[2.0, 2.0, 2.0]);
        assert!(imfs.row(3).is_none());
        assert_eq!(imfs.residual(), &[2.0, 2.0, 2.0]);
        assert!(imfs.sift_reports().is_empty());
    }

    #[test]
    fn rows_and_matrix() {
        let imfs = sample();
        assert_eq!(imfs.rows().count(), 3);
        let m = imfs.to_matrix();
        assert_eq!(m[1], vec![0.5, 0.0, -0.5]);
        assert_eq!(imfs.clone().into_inner(), imfs.as_slice().to_vec());
    }

    #[test]
    fn reconstruct_sums_columns() {
        let imfs = sample();
        assert_eq!(imfs.reconstruct(), vec![3.5, 1.0, 2.5]);
        assert_abs_diff_eq!(imfs.reconstruction_error(&[3.5, 1.0, 2.5]), 0.0);
        assert_abs_diff_eq!(imfs.reconstruction_error(&[3.5, 1.5, 2.5]), 0.5);
        assert!(imfs.reconstruction_error(&[1.0]).is_infinite());
    }

    #[test]
    fn variance_fractions_relative_to_signal() {
        let imfs = sample();
        let fractions = imfs.variance_fractions();
        // signal [3.5, 1, 2.5]: mean 7/3, var = (49/36 + 64/36 + 1/36) / 2 = 19/12
        assert_abs_diff_eq!(fractions[0], (4.0 / 3.0) / (19.0 / 12.0), epsilon = 1e-12);
        assert_abs_diff_eq!(fractions[1], 0.25 / (19.0 / 12.0), epsilon = 1e-12);
        assert_abs_diff_eq!(fractions[2], 0.0);
    }

    #[test]
    fn variance_fractions_constant_signal() {
        let imfs = Imfs::new(vec![0.0, 0.0, 1.0, 1.0], 2, 2);
        assert_eq!(imfs.variance_fractions(), vec![0.0, 0.0]);
    }

    #[test]
    fn empty_rows() {
        let imfs = Imfs::new(vec![], 1, 0);
        assert!(imfs.is_empty());
        assert_eq!(imfs.residual(), &[] as &[f64]);
        assert!(imfs.reconstruct().is_empty());
    }

    #[test]
    fn sift_reports_attached() {
        let report = SiftReport {
            outcome: SiftOutcome::Converged,
            siftings: 3,
        };
        let imfs = sample().with_sift_reports(vec![report, report]);
        assert_eq!(imfs.sift_reports().len(), 2);
        assert_eq!(imfs.sift_reports()[0].siftings, 3);
    }

    #[test]
    fn variance_helpers() {
        assert_abs_diff_eq!(variance(&[1.0, 2.0, 3.0, 4.0]), 5.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(variance(&[5.0]), 0.0);
        assert_abs_diff_eq!(std_dev(&[2.0, 4.0]), 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn imfs_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<Imfs>();
    }
}
