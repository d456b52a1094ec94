//! Local extrema detection with boundary extrapolation.

/// Direction of the most recent non-flat step while scanning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slope {
    Up,
    Down,
    None,
}

/// Local maxima and minima of a signal, including synthetic boundary points.
///
/// Both sequences are stored as parallel position/value slices so they can be
/// handed to [`evaluate_spline`](crate::evaluate_spline) directly. For a
/// signal of length `N >= 1` the first and last entries of each sequence sit
/// at positions `0` and `N - 1`; everything in between is a genuine extremum.
/// Positions are strictly increasing.
///
/// A flat plateau between a rise and a fall counts as one extremum at the
/// plateau midpoint, so positions may be fractional.
///
/// # Example
///
/// ```
/// use sift_emd::find_extrema;
///
/// let extrema = find_extrema(&[2.0, -1.0, 5.0]);
/// assert!(extrema.extrema_good());
/// assert_eq!(extrema.maxima_x(), &[0.0, 2.0]);
/// assert_eq!(extrema.minima_y(), &[2.0, -1.0, 5.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExtremumSet {
    max_x: Vec<f64>,
    max_y: Vec<f64>,
    min_x: Vec<f64>,
    min_y: Vec<f64>,
    extrema_good: bool,
}

impl ExtremumSet {
    /// Creates an empty set with room for a signal of `n` samples.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            max_x: Vec::with_capacity(n),
            max_y: Vec::with_capacity(n),
            min_x: Vec::with_capacity(n),
            min_y: Vec::with_capacity(n),
            extrema_good: true,
        }
    }

    /// Recomputes the extrema of `x` in place, reusing the allocations.
    ///
    /// Returns the `extrema_good` flag: `true` iff every genuine maximum is
    /// positive and every genuine minimum is negative.
    pub fn find_into(&mut self, x: &[f64]) -> bool {
        self.max_x.clear();
        self.max_y.clear();
        self.min_x.clear();
        self.min_y.clear();
        self.extrema_good = true;

        let n = x.len();
        if n == 0 {
            return true;
        }

        self.max_x.push(0.0);
        self.max_y.push(x[0]);
        self.min_x.push(0.0);
        self.min_y.push(x[0]);
        if n == 1 {
            return true;
        }

        let mut previous = Slope::None;
        let mut flat = 0usize;
        for i in 0..n - 1 {
            if x[i + 1] > x[i] {
                if previous == Slope::Down {
                    self.min_x.push(i as f64 - flat as f64 / 2.0);
                    self.min_y.push(x[i]);
                    if x[i] >= 0.0 {
                        self.extrema_good = false;
                    }
                }
                previous = Slope::Up;
                flat = 0;
            } else if x[i + 1] < x[i] {
                if previous == Slope::Up {
                    self.max_x.push(i as f64 - flat as f64 / 2.0);
                    self.max_y.push(x[i]);
                    if x[i] <= 0.0 {
                        self.extrema_good = false;
                    }
                }
                previous = Slope::Down;
                flat = 0;
            } else {
                flat += 1;
            }
        }

        let last = (n - 1) as f64;
        self.max_x.push(last);
        self.max_y.push(x[n - 1]);
        self.min_x.push(last);
        self.min_y.push(x[n - 1]);

        // Boundary values move outward only when the line through the two
        // nearest genuine extrema is more extreme than the data end point.
        let nmax = self.max_x.len();
        if nmax >= 4 {
            let left = linear_extrapolate(
                self.max_x[1],
                self.max_y[1],
                self.max_x[2],
                self.max_y[2],
                0.0,
            );
            if left > self.max_y[0] {
                self.max_y[0] = left;
            }
            let right = linear_extrapolate(
                self.max_x[nmax - 3],
                self.max_y[nmax - 3],
                self.max_x[nmax - 2],
                self.max_y[nmax - 2],
                last,
            );
            if right > self.max_y[nmax - 1] {
                self.max_y[nmax - 1] = right;
            }
        }
        let nmin = self.min_x.len();
        if nmin >= 4 {
            let left = linear_extrapolate(
                self.min_x[1],
                self.min_y[1],
                self.min_x[2],
                self.min_y[2],
                0.0,
            );
            if left < self.min_y[0] {
                self.min_y[0] = left;
            }
            let right = linear_extrapolate(
                self.min_x[nmin - 3],
                self.min_y[nmin - 3],
                self.min_x[nmin - 2],
                self.min_y[nmin - 2],
                last,
            );
            if right < self.min_y[nmin - 1] {
                self.min_y[nmin - 1] = right;
            }
        }

        self.extrema_good
    }

    /// Returns `true` iff the genuine extrema satisfy the IMF sign property.
    pub fn extrema_good(&self) -> bool {
        self.extrema_good
    }

    /// Returns the positions of the maxima, boundary points included.
    pub fn maxima_x(&self) -> &[f64] {
        &self.max_x
    }

    /// Returns the values of the maxima, boundary points included.
    pub fn maxima_y(&self) -> &[f64] {
        &self.max_y
    }

    /// Returns the positions of the minima, boundary points included.
    pub fn minima_x(&self) -> &[f64] {
        &self.min_x
    }

    /// Returns the values of the minima, boundary points included.
    pub fn minima_y(&self) -> &[f64] {
        &self.min_y
    }

    /// Returns an iterator over `(position, value)` pairs of the maxima.
    pub fn maxima(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.max_x.iter().copied().zip(self.max_y.iter().copied())
    }

    /// Returns an iterator over `(position, value)` pairs of the minima.
    pub fn minima(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.min_x.iter().copied().zip(self.min_y.iter().copied())
    }

    /// Returns the number of maxima, boundary points included.
    pub fn n_maxima(&self) -> usize {
        self.max_x.len()
    }

    /// Returns the number of minima, boundary points included.
    pub fn n_minima(&self) -> usize {
        self.min_x.len()
    }

    /// Returns the number of genuine (non-boundary) maxima and minima.
    pub fn n_interior(&self) -> usize {
        self.max_x.len().saturating_sub(2) + self.min_x.len().saturating_sub(2)
    }
}

/// Finds the local extrema of `x`, including the synthetic boundary points.
///
/// See [`ExtremumSet`] for the conventions. Empty input yields empty
/// sequences; a single sample is both the only maximum and the only minimum.
pub fn find_extrema(x: &[f64]) -> ExtremumSet {
    let mut set = ExtremumSet::with_capacity(x.len());
    set.find_into(x);
    set
}

/// Counts sign changes between consecutive non-zero samples of `x`.
///
/// Exact zeros are skipped, so a signal touching zero without crossing it
/// contributes nothing.
pub fn count_zero_crossings(x: &[f64]) -> usize {
    let mut count = 0;
    let mut last_positive: Option<bool> = None;
    for &v in x {
        if v == 0.0 {
            continue;
        }
        let positive = v > 0.0;
        if let Some(prev) = last_positive
            && prev != positive
        {
            count += 1;
        }
        last_positive = Some(positive);
    }
    count
}

/// Evaluates at `x` the line through `(x0, y0)` and `(x1, y1)`.
fn linear_extrapolate(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    debug_assert!(x1 != x0);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
