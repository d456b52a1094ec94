//! The sifting loop that extracts a single IMF.

use tracing::warn;

use crate::config::StoppingCriteria;
use crate::error::EmdError;
use crate::extrema::{ExtremumSet, count_zero_crossings};
use crate::spline::{SplineWorkspace, evaluate_spline_into};

/// Why a sifting loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiftOutcome {
    /// The S-number criterion was met, or too few extrema remained for an
    /// envelope.
    Converged,
    /// The sifting limit was reached first.
    MaxSiftsReached,
}

/// Summary of one sifting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiftReport {
    /// How the loop terminated.
    pub outcome: SiftOutcome,
    /// Number of envelope-mean subtractions performed.
    pub siftings: usize,
}

/// Per-IMF bookkeeping for the stopping criteria.
///
/// A fresh state is used for every IMF.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoppingState {
    siftings: usize,
    prev_count: Option<usize>,
    streak: usize,
}

impl StoppingState {
    /// Records one S-number observation and returns the updated streak.
    ///
    /// An iteration is stable when the extrema are good and the count of
    /// extrema plus zero crossings differs from the previous one by at most
    /// one.
    fn observe(&mut self, extrema_good: bool, count: usize) -> usize {
        let stable = extrema_good
            && self
                .prev_count
                .is_some_and(|prev| prev.abs_diff(count) <= 1);
        self.streak = if stable { self.streak + 1 } else { 0 };
        self.prev_count = Some(count);
        self.streak
    }
}

/// Scratch buffers for repeated sifting of signals of one length.
#[derive(Debug, Clone)]
pub(crate) struct Sifter {
    extrema: ExtremumSet,
    upper: Vec<f64>,
    lower: Vec<f64>,
    spline: SplineWorkspace,
}

impl Sifter {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            extrema: ExtremumSet::with_capacity(n),
            upper: vec![0.0; n],
            lower: vec![0.0; n],
            spline: SplineWorkspace::with_capacity(n),
        }
    }

    /// Sifts `x` in place until a stopping criterion fires.
    ///
    /// On return `x` holds the extracted IMF. With only the S-number
    /// criterion enabled the loop has no upper bound.
    pub(crate) fn sift(
        &mut self,
        x: &mut [f64],
        criteria: StoppingCriteria,
    ) -> Result<SiftReport, EmdError> {
        let n = x.len();
        if self.upper.len() != n {
            self.upper.resize(n, 0.0);
            self.lower.resize(n, 0.0);
        }

        let s_number = criteria.s_number();
        let max_siftings = criteria.num_siftings();
        let mut state = StoppingState::default();

        loop {
            if max_siftings > 0 && state.siftings >= max_siftings {
                return Ok(SiftReport {
                    outcome: SiftOutcome::MaxSiftsReached,
                    siftings: state.siftings,
                });
            }

            let good = self.extrema.find_into(x);
            // Boundary points are in both sets, so this only stops signals of
            // length 0 or 1; a monotone residual still gets sifted.
            if self.extrema.n_maxima() < 2 || self.extrema.n_minima() < 2 {
                return Ok(SiftReport {
                    outcome: SiftOutcome::Converged,
                    siftings: state.siftings,
                });
            }

            if s_number > 0 {
                let count = self.extrema.n_interior() + count_zero_crossings(x);
                if state.observe(good, count) >= s_number {
                    return Ok(SiftReport {
                        outcome: SiftOutcome::Converged,
                        siftings: state.siftings,
                    });
                }
            }

            evaluate_spline_into(
                self.extrema.maxima_x(),
                self.extrema.maxima_y(),
                &mut self.upper,
                &mut self.spline,
            )?;
            evaluate_spline_into(
                self.extrema.minima_x(),
                self.extrema.minima_y(),
                &mut self.lower,
                &mut self.spline,
            )?;
            for ((v, &u), &l) in x.iter_mut().zip(&self.upper).zip(&self.lower) {
                *v -= 0.5 * (u + l);
            }
            state.siftings += 1;
        }
    }
}

/// Emits the advisory for criteria that leave sifting unbounded.
pub(crate) fn warn_if_unbounded(criteria: StoppingCriteria) {
    if !criteria.is_bounded() {
        warn!(
            s_number = criteria.s_number(),
            "num_siftings disabled; sifting relies on the S-number alone and may not terminate"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_tone(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                (t * 0.5).sin() + 0.5 * (t * 0.04).sin()
            })
            .collect()
    }

    #[test]
    fn state_streak_counts_stable_iterations() {
        let mut state = StoppingState::default();
        assert_eq!(state.observe(true, 10), 0);
        assert_eq!(state.observe(true, 11), 1);
        assert_eq!(state.observe(true, 10), 2);
        assert_eq!(state.observe(true, 14), 0);
        assert_eq!(state.observe(true, 14), 1);
        assert_eq!(state.observe(false, 14), 0);
    }

    #[test]
    fn fixed_siftings_runs_exact_count() {
        let mut x = two_tone(128);
        let mut sifter = Sifter::new(x.len());
        let criteria = StoppingCriteria::new(0, 7).unwrap();
        let report = sifter.sift(&mut x, criteria).unwrap();
        assert_eq!(report.outcome, SiftOutcome::MaxSiftsReached);
        assert_eq!(report.siftings, 7);
    }

    #[test]
    fn linear_signal_sifts_to_zero() {
        let mut x: Vec<f64> = (0..50).map(|i| i as f64 * 0.3).collect();
        let mut sifter = Sifter::new(x.len());
        let report = sifter
            .sift(&mut x, StoppingCriteria::new(0, 5).unwrap())
            .unwrap();
        assert_eq!(report.siftings, 5);
        for &v in &x {
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn single_sample_converges_without_sifting() {
        let mut x = vec![3.0];
        let mut sifter = Sifter::new(1);
        let report = sifter.sift(&mut x, StoppingCriteria::default()).unwrap();
        assert_eq!(report.outcome, SiftOutcome::Converged);
        assert_eq!(report.siftings, 0);
        assert_eq!(x, vec![3.0]);
    }

    #[test]
    fn s_number_converges_before_limit() {
        let mut x = two_tone(256);
        let mut sifter = Sifter::new(x.len());
        let criteria = StoppingCriteria::new(4, 1000).unwrap();
        let report = sifter.sift(&mut x, criteria).unwrap();
        assert_eq!(report.outcome, SiftOutcome::Converged);
        assert!(report.siftings >= 4, "siftings = {}", report.siftings);
        assert!(report.siftings < 1000);
    }

    #[test]
    fn sifted_result_tracks_fast_component() {
        let n = 400;
        let mut x = two_tone(n);
        let mut sifter = Sifter::new(n);
        sifter
            .sift(&mut x, StoppingCriteria::new(0, 20).unwrap())
            .unwrap();
        // away from the edges the first IMF should be close to sin(0.5 t)
        let err: f64 = (50..n - 50)
            .map(|i| (x[i] - (i as f64 * 0.5).sin()).abs())
            .fold(0.0, f64::max);
        assert!(err < 0.25, "max deviation = {err}");
    }

    #[test]
    fn zero_signal_stays_zero() {
        let mut x = vec![0.0; 32];
        let mut sifter = Sifter::new(32);
        let report = sifter.sift(&mut x, StoppingCriteria::default()).unwrap();
        assert_eq!(report.outcome, SiftOutcome::Converged);
        for &v in &x {
            assert_abs_diff_eq!(v, 0.0);
        }
    }

    #[test]
    fn sifter_adapts_to_new_length() {
        let mut sifter = Sifter::new(16);
        let mut x = two_tone(64);
        let report = sifter
            .sift(&mut x, StoppingCriteria::new(0, 3).unwrap())
            .unwrap();
        assert_eq!(report.siftings, 3);
    }
}
